use super::{Display, PropertyValue, SetProperty, WindowBuilder, XcbWindow};
use std::sync::Arc;
use xcb::{
    x::{Atom, DestroyWindow, MapWindow},
    Xid,
};

pub struct Window {
    handle: XcbWindow,
    display: Arc<Display>,
}

impl Window {
    pub fn from_handle(display: Arc<Display>, handle: XcbWindow) -> Self {
        Self { handle, display }
    }

    pub fn builder(display: Arc<Display>) -> WindowBuilder {
        WindowBuilder::new(display)
    }

    pub fn handle(&self) -> XcbWindow {
        self.handle
    }

    pub fn destroy(&self) {
        self.display.void_request(&DestroyWindow {
            window: self.handle,
        })
    }

    pub fn map(&self) {
        self.display.void_request(&MapWindow {
            window: self.handle,
        })
    }

    pub fn set_property(&self, property: Atom, value: PropertyValue) {
        self.handle.set_property(&self.display, property, value);
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.handle.resource_id())
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Window({})", self.handle.resource_id())
    }
}
