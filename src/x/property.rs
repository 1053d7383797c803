use super::{Display, XcbWindow};
use xcb::{
    x::{Atom, ChangeProperty, PropMode, ATOM_ATOM, ATOM_CARDINAL, ATOM_STRING},
    Xid, XidNew,
};

xcb::atoms_struct! {
    #[derive(Clone, Debug)]
    pub struct Atoms {
        pub net_wm_name => b"_NET_WM_NAME" only_if_exists = false,
        pub net_wm_strut => b"_NET_WM_STRUT" only_if_exists = false,
        pub net_wm_strut_partial => b"_NET_WM_STRUT_PARTIAL" only_if_exists = false,
        pub net_wm_window_type => b"_NET_WM_WINDOW_TYPE" only_if_exists = false,
        pub net_wm_window_type_dock => b"_NET_WM_WINDOW_TYPE_DOCK" only_if_exists = false,
        pub utf8_string => b"UTF8_STRING" only_if_exists = false,
    }
}

/// A property value together with its X type.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Atom(Atom),
    CardinalList(Vec<u32>),
    /// `STRING`, for ICCCM properties like `WM_CLASS`.
    Latin1(String),
    /// `UTF8_STRING`, for EWMH properties.
    String(String),
}

impl PropertyValue {
    fn r#type(&self, display: &Display) -> Atom {
        match self {
            Self::Atom(_) => ATOM_ATOM,
            Self::CardinalList(_) => ATOM_CARDINAL,
            Self::Latin1(_) => ATOM_STRING,
            Self::String(_) => display.atoms.utf8_string,
        }
    }

    /// Replaces `property` on `window` with this value.
    fn change(self, display: &Display, window: XcbWindow, property: Atom) {
        let r#type = self.r#type(display);
        macro_rules! make_request {
            ($data:expr) => {
                display.void_request(&ChangeProperty {
                    mode: PropMode::Replace,
                    window,
                    property,
                    r#type,
                    data: $data,
                })
            };
        }
        match self {
            Self::Atom(atom) => make_request!(&[atom]),
            Self::CardinalList(cardinals) => make_request!(cardinals.as_slice()),
            Self::Latin1(string) | Self::String(string) => make_request!(string.as_bytes()),
        }
    }
}

/// Anything naming a window can have its properties replaced.
pub trait SetProperty {
    fn window(&self) -> XcbWindow;

    fn set_property(&self, display: &Display, property: Atom, value: PropertyValue) {
        value.change(display, self.window(), property);
    }
}

impl<T> SetProperty for T
where
    T: Xid,
{
    fn window(&self) -> XcbWindow {
        unsafe { XcbWindow::new(self.resource_id()) }
    }
}
