use super::{BarLayout, Content, Slot};
use crate::{
    color::Color,
    draw::{Font, FontMetrics},
    rectangle::Rectangle,
};

/// Something widgets can be drawn onto. Drawing happens once per widget and
/// is then presented to every target window.
pub trait Canvas {
    /// Number of windows a slot is presented to.
    fn target_count(&self) -> usize;

    fn fill_rect(&mut self, rect: Rectangle, color: Color);

    fn text_width(&mut self, text: &str, font: &Font) -> u16;

    fn draw_text(&mut self, text: &str, font: &Font, x: i16, baseline: i16, color: Color);

    /// Copies `area` of the drawing to the same position on the given target.
    fn present(&mut self, target: usize, area: Rectangle);

    fn flush(&mut self);
}

/// Returns the left edge and the baseline for text of the given width
/// centered in `area`.
pub fn text_position(area: Rectangle, text_width: u16, metrics: &FontMetrics) -> (i16, i16) {
    let x = area.x as i32 + (area.width as i32 - text_width as i32) / 2;
    let baseline =
        area.y + metrics.ascent as i16 + (area.height as i16 - metrics.height() as i16) / 2;
    (x.clamp(i16::MIN as i32, i16::MAX as i32) as i16, baseline)
}

/// Returns the area covered by `slot` and by text starting at `text_x`.
/// Overflowing text extends the area, which never reaches left of zero.
fn covered_area(slot: Rectangle, text_x: i16, text_width: u16) -> Rectangle {
    let text_right = Rectangle::new(text_x, 0, text_width, 0).right_edge();
    let left = slot.x.min(text_x).max(0);
    let right = slot.right_edge().max(text_right);
    Rectangle::new(left, slot.y, (right as i32 - left as i32).max(0) as u16, slot.height)
}

pub struct Renderer {
    layout: BarLayout,
}

impl Renderer {
    pub fn new(layout: BarLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    /// Draws the content of the widget at `index` and presents it on every
    /// target.
    pub fn draw_widget(&self, canvas: &mut impl Canvas, index: usize, font: &Font, content: &Content) {
        let slot = match self.layout.slot(index) {
            Some(slot) => slot,
            None => {
                log::warn!("render: no slot for widget {index}");
                return;
            }
        };
        let area = Self::paint(canvas, slot, font, content);
        for target in 0..canvas.target_count() {
            canvas.present(target, area);
        }
        canvas.flush();
    }

    /// Draws the widget and returns the area that changed.
    fn paint(canvas: &mut impl Canvas, slot: &Slot, font: &Font, content: &Content) -> Rectangle {
        let inner = slot.inner();
        canvas.fill_rect(slot.rect, content.colors.border);
        canvas.fill_rect(inner, content.colors.background);
        let text_width = canvas.text_width(&content.text, font);
        let (x, baseline) = text_position(inner, text_width, font.metrics());
        canvas.draw_text(&content.text, font, x, baseline, content.colors.foreground);
        covered_area(slot.rect, x, text_width)
    }
}
