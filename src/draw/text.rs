use crate::color::Color;
use cairo::Context;
use pango::Layout;

pub struct TextBuilder<'a> {
    context: &'a Context,
    layout: &'a Layout,
    x: i16,
    y: i16,
    color: Option<Color>,
}

impl<'a> TextBuilder<'a> {
    pub(super) fn new(text: &str, context: &'a Context, layout: &'a Layout) -> Self {
        layout.set_text(text);
        Self {
            context,
            layout,
            x: 0,
            y: 0,
            color: None,
        }
    }

    /// Places the left edge at `x` and the first line on `baseline`.
    pub fn at_baseline(&mut self, x: i16, baseline: i16) -> &mut Self {
        self.x = x;
        self.y = baseline - (self.layout.baseline() / pango::SCALE) as i16;
        self
    }

    /// The cairo source keeps this color after drawing.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = Some(color);
        self
    }

    pub fn draw(&mut self) {
        self.context.move_to(self.x as f64, self.y as f64);
        if let Some(color) = self.color {
            let (r, g, b, a) = color.components();
            self.context.set_source_rgba(r, g, b, a);
        }
        pangocairo::show_layout(self.context, self.layout);
    }
}
