use super::{Display, Window, WindowAttributes, XcbWindow};
use crate::{error::OrFatal, rectangle::Rectangle};
use std::sync::Arc;
use xcb::x::{CreateWindow, WindowClass, COPY_FROM_PARENT};

pub struct WindowBuilder {
    display: Arc<Display>,
    parent: XcbWindow,
    geometry: Rectangle,
    attributes: WindowAttributes,
}

impl WindowBuilder {
    pub fn new(display: Arc<Display>) -> Self {
        let parent = display.root();
        Self {
            display,
            parent,
            geometry: Rectangle::new(0, 0, 1, 1),
            attributes: WindowAttributes::new(),
        }
    }

    pub fn geometry(mut self, rect: Rectangle) -> Self {
        self.geometry = rect;
        self
    }

    pub fn attributes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut WindowAttributes),
    {
        f(&mut self.attributes);
        self
    }

    pub fn build(mut self) -> Window {
        let wid = self.display.connection.generate_id();
        let (x, y, width, height) = self.geometry.into_parts();
        log::trace!("Creating window {wid:?} at {}", self.geometry);
        let value_list = self.attributes.value_list();
        self.display
            .try_void_request(&CreateWindow {
                depth: COPY_FROM_PARENT as u8,
                wid,
                parent: self.parent,
                x,
                y,
                width,
                height,
                border_width: 0,
                class: WindowClass::InputOutput,
                visual: COPY_FROM_PARENT,
                value_list,
            })
            .or_fatal();
        Window::from_handle(self.display, wid)
    }
}
