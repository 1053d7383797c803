use super::{Font, FontMetrics, FontSpec, TextBuilder};
use crate::{
    color::Color,
    error::{fatal_error, LogNone, OrFatal},
    rectangle::Rectangle,
    x::{Display, Window},
};
use cairo::{Context, Operator, XCBConnection, XCBDrawable, XCBSurface, XCBVisualType};
use pango::{prelude::*, Layout};
use std::{ptr::NonNull, sync::Arc};
use xcb::{
    x::{
        ChangeGc, CopyArea, CreateGc, Drawable, FreeGc, Gc, Gcontext, Pixmap, PolyFillRectangle,
        Visualid, Visualtype,
    },
    Xid,
};

fn find_visual_type(display: &Display, visual: Visualid, depth: u8) -> *mut Visualtype {
    for screen in display.connection().get_setup().roots() {
        for allowed in screen.allowed_depths().filter(|d| d.depth() == depth) {
            for visual_type in allowed.visuals() {
                if visual_type.visual_id() == visual {
                    // cairo wants a `NonNull` which requires a mutable pointer
                    return visual_type as *const Visualtype as *mut Visualtype;
                }
            }
        }
    }
    fatal_error(format!("Could not find root visual with id {visual}"));
}

/// Off-screen drawing surface shared by all bar windows. Everything is drawn
/// into a pixmap which is then copied to the windows.
pub struct DrawingContext {
    display: Arc<Display>,
    pixmap: Pixmap,
    gc: Gcontext,
    surface: XCBSurface,
    context: Context,
    layout: Layout,
}

impl DrawingContext {
    /// Creates a new drawing context using the root visual of the display.
    pub fn create(display: Arc<Display>, (width, height): (u16, u16)) -> Self {
        log::trace!("draw: creating context: width={width} height={height}");
        let (visual, depth) = {
            let screen = display.screen();
            (screen.root_visual(), screen.root_depth())
        };
        let pixmap = display.create_pixmap(depth, width, height);
        let surface = unsafe {
            // According to this issue in the xcb crate you're supposed to just
            // cast these like this:
            // https://github.com/rust-x-bindings/rust-xcb/issues/200
            use cairo_sys::{xcb_connection_t, xcb_visualtype_t};
            let connection = display.connection().get_raw_conn();
            let connection = NonNull::new(connection as *mut xcb_connection_t).unwrap_unchecked();
            let visual_type = find_visual_type(&display, visual, depth);
            let visual_type = NonNull::new(visual_type as *mut xcb_visualtype_t).unwrap_unchecked();
            XCBSurface::create(
                &XCBConnection(connection),
                &XCBDrawable(pixmap.resource_id()),
                &XCBVisualType(visual_type),
                width as i32,
                height as i32,
            )
            .unwrap_or_fatal()
        };
        let context = Context::new(&surface).unwrap_or_fatal();
        context.set_operator(Operator::Source);
        let layout = pangocairo::create_layout(&context);
        let gc = display.connection().generate_id();
        display
            .try_void_request(&CreateGc {
                cid: gc,
                drawable: Drawable::Pixmap(pixmap),
                value_list: &[],
            })
            .or_fatal();
        display.flush();
        Self {
            display,
            pixmap,
            gc,
            surface,
            context,
            layout,
        }
    }

    pub fn destroy(&self) {
        log::trace!("draw: destroying context");
        self.surface.finish();
        self.display.void_request(&FreeGc { gc: self.gc });
        self.display.free_pixmap(self.pixmap);
    }

    /// Loads the font described by `spec` and measures it. Returns `None` if
    /// pango cannot provide any font for it.
    pub fn load_font(&self, spec: &FontSpec) -> Option<Font> {
        let description = spec.description();
        let pango_context = self.layout.context();
        let loaded = pango_context
            .load_font(&description)
            .log_none(&format!("draw: no font available for '{spec}'"))?;
        let actual = loaded.describe();
        if let Some(family) = actual.family() {
            if !family.eq_ignore_ascii_case(&spec.family) {
                log::warn!(
                    "draw: font '{}' not found, using '{}' instead",
                    spec.family,
                    family
                );
            }
        }
        let metrics = pango_context.metrics(Some(&description), None);
        let metrics = FontMetrics {
            ascent: (metrics.ascent() / pango::SCALE) as u16,
            descent: (metrics.descent() / pango::SCALE) as u16,
            advance: ((metrics.approximate_char_width() / pango::SCALE) as u16).max(1),
        };
        log::trace!("draw: loaded font '{spec}': {metrics:?}");
        Some(Font::new(spec, metrics))
    }

    /// Fills the given rectangle with the given color without using cairo.
    pub fn fill_rect(&self, rect: Rectangle, color: Color) {
        self.surface.flush();
        self.display.void_request(&ChangeGc {
            gc: self.gc,
            value_list: &[Gc::Foreground(color.pack())],
        });
        self.display.void_request(&PolyFillRectangle {
            drawable: Drawable::Pixmap(self.pixmap),
            gc: self.gc,
            rectangles: &[rect.into_xcb()],
        });
        self.surface.mark_dirty();
    }

    /// Returns the width of the given text in the given font.
    pub fn text_width(&self, text: &str, font: &Font) -> u16 {
        self.layout.set_font_description(Some(font.description()));
        self.layout.set_text(text);
        (self.layout.size().0 / pango::SCALE) as u16
    }

    /// Creates a `TextBuilder` for the given string in the given font.
    pub fn text(&self, text: &str, font: &Font) -> TextBuilder {
        self.layout.set_font_description(Some(font.description()));
        TextBuilder::new(text, &self.context, &self.layout)
    }

    /// Copies `rect` of the pixmap to the same position in the given window.
    pub fn render(&self, to: &Window, rect: Rectangle) {
        let (x, y, width, height) = rect.into_parts();
        self.surface.flush();
        self.display.void_request(&CopyArea {
            src_drawable: Drawable::Pixmap(self.pixmap),
            dst_drawable: Drawable::Window(to.handle()),
            gc: self.gc,
            src_x: x,
            src_y: y,
            dst_x: x,
            dst_y: y,
            width,
            height,
        });
    }
}
