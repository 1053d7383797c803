use super::Canvas;
use crate::{
    color::Color,
    draw::{DrawingContext, Font, FontSpec},
    error::fatal_error,
    outputs::OutputGeometry,
    rectangle::Rectangle,
    x::{Display, PropertyValue, Window},
};
use std::sync::Arc;
use xcb::x::{EventMask, ATOM_WM_CLASS};

const WINDOW_NAME: &str = "tinybar";

/// Returns the geometry of the bar window for each output, in output order.
pub fn plan_windows(outputs: &[OutputGeometry], height: u16) -> Vec<Rectangle> {
    outputs
        .iter()
        .map(|output| Rectangle::new(output.x, output.y, output.width, height))
        .collect()
}

/// `_NET_WM_STRUT_PARTIAL` value reserving `height` pixels at the top of the
/// given output.
pub fn strut_partial(output: &OutputGeometry, height: u16) -> [u32; 12] {
    let start = output.x.max(0) as u32;
    let end = start + output.width as u32 - 1;
    [0, 0, height as u32, 0, 0, 0, 0, 0, start, end, 0, 0]
}

/// Legacy `_NET_WM_STRUT` value for window managers without partial strut
/// support.
pub fn strut(height: u16) -> [u32; 4] {
    [0, 0, height as u32, 0]
}

pub struct BarWindow {
    window: Window,
    geometry: Rectangle,
}

impl BarWindow {
    fn create(
        display: &Arc<Display>,
        output: &OutputGeometry,
        geometry: Rectangle,
        background: Color,
    ) -> Self {
        let height = geometry.height;
        let window = Window::builder(display.clone())
            .geometry(geometry)
            .attributes(|attributes| {
                attributes
                    .override_redirect(true)
                    .background_pixel(background.pack())
                    .event_mask(EventMask::EXPOSURE);
            })
            .build();
        let atoms = &display.atoms;
        window.set_property(
            atoms.net_wm_window_type,
            PropertyValue::Atom(atoms.net_wm_window_type_dock),
        );
        window.set_property(
            atoms.net_wm_strut_partial,
            PropertyValue::CardinalList(strut_partial(output, height).to_vec()),
        );
        window.set_property(
            atoms.net_wm_strut,
            PropertyValue::CardinalList(strut(height).to_vec()),
        );
        window.set_property(
            ATOM_WM_CLASS,
            PropertyValue::Latin1(format!("{WINDOW_NAME}\0{WINDOW_NAME}\0")),
        );
        window.set_property(
            atoms.net_wm_name,
            PropertyValue::String(WINDOW_NAME.to_string()),
        );
        window.map();
        log::info!("Created bar window {window} at {geometry}");
        Self { window, geometry }
    }

    pub fn geometry(&self) -> Rectangle {
        self.geometry
    }
}

/// All bar windows together with the drawing context they share.
pub struct BarSet {
    display: Arc<Display>,
    windows: Vec<BarWindow>,
    dc: DrawingContext,
    width: u16,
}

impl BarSet {
    pub fn create(
        display: Arc<Display>,
        outputs: &[OutputGeometry],
        height: u16,
        background: Color,
    ) -> Self {
        let windows: Vec<_> = outputs
            .iter()
            .zip(plan_windows(outputs, height))
            .map(|(output, geometry)| BarWindow::create(&display, output, geometry, background))
            .collect();
        let width = outputs.iter().map(|o| o.width).max().unwrap_or(1).max(1);
        let dc = DrawingContext::create(display.clone(), (width, height.max(1)));
        dc.fill_rect(Rectangle::new(0, 0, width, height), background);
        display.flush();
        Self {
            display,
            windows,
            dc,
            width,
        }
    }

    /// Loads a font, exiting if it is not available.
    pub fn load_font(&self, spec: &FontSpec) -> Font {
        self.dc
            .load_font(spec)
            .unwrap_or_else(|| fatal_error(format!("Failed to load font: {spec}")))
    }

    pub fn windows(&self) -> &[BarWindow] {
        &self.windows
    }

    pub fn destroy(&self) {
        for bar in self.windows.iter() {
            bar.window.destroy();
        }
        self.dc.destroy();
        self.display.flush();
    }
}

impl Canvas for BarSet {
    fn target_count(&self) -> usize {
        self.windows.len()
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        self.dc.fill_rect(rect, color);
    }

    fn text_width(&mut self, text: &str, font: &Font) -> u16 {
        self.dc.text_width(text, font)
    }

    fn draw_text(&mut self, text: &str, font: &Font, x: i16, baseline: i16, color: Color) {
        self.dc
            .text(text, font)
            .at_baseline(x, baseline)
            .color(color)
            .draw();
    }

    fn present(&mut self, target: usize, area: Rectangle) {
        let right = (area.right_edge() as i32).min(self.width as i32);
        let width = (right - area.x as i32).max(0) as u16;
        if let Some(bar) = self.windows.get(target) {
            self.dc
                .render(&bar.window, Rectangle::new(area.x, area.y, width, area.height));
        }
    }

    fn flush(&mut self) {
        self.display.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(x: i16, width: u16) -> OutputGeometry {
        OutputGeometry {
            x,
            y: 0,
            width,
            height: 1080,
        }
    }

    #[test]
    fn one_window_per_output() {
        let outputs = [output(0, 1920), output(1920, 1280)];
        assert_eq!(
            plan_windows(&outputs, 40),
            vec![
                Rectangle::new(0, 0, 1920, 40),
                Rectangle::new(1920, 0, 1280, 40),
            ]
        );
        assert!(plan_windows(&[], 40).is_empty());
    }

    #[test]
    fn struts() {
        assert_eq!(
            strut_partial(&output(1920, 1280), 40),
            [0, 0, 40, 0, 0, 0, 0, 0, 1920, 3199, 0, 0]
        );
        assert_eq!(
            strut_partial(&output(0, 1920), 24),
            [0, 0, 24, 0, 0, 0, 0, 0, 0, 1919, 0, 0]
        );
        assert_eq!(strut(40), [0, 0, 40, 0]);
    }

    #[test]
    fn strut_left_of_origin() {
        let strut = strut_partial(&output(-1280, 1280), 40);
        assert_eq!(strut[8], 0);
        assert_eq!(strut[9], 1279);
    }
}
