mod context;
mod font;
mod text;

pub use context::DrawingContext;
pub use font::{Font, FontMetrics, FontSpec};
pub use text::TextBuilder;
