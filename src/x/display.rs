use super::{property::Atoms, XcbWindow};
use crate::error::OrFatal;
use std::os::unix::io::{AsRawFd, RawFd};
use xcb::{
    x::{CreatePixmap, Drawable, FreePixmap, Pixmap, Screen},
    Connection, CookieWithReplyChecked, Event, Extension, ProtocolResult, RequestWithoutReply,
};

pub struct Display {
    pub(super) connection: Connection,
    screen_num: i32,
    pub(super) root: XcbWindow,
    pub atoms: Atoms,
}

impl Display {
    /// Connects to the display named by `$DISPLAY`, asking for the RandR
    /// extension. Whether the server actually has it is checked with
    /// [`Display::has_randr`].
    pub fn connect() -> xcb::Result<Self> {
        let (connection, screen_num) =
            Connection::connect_with_extensions(None, &[], &[Extension::RandR])?;
        let root = connection
            .get_setup()
            .roots()
            .nth(screen_num as usize)
            .ok_or(xcb::ConnError::ClosedInvalidScreen)?
            .root();
        let atoms = Atoms::intern_all(&connection)?;
        log::trace!("Connected to screen {screen_num}, root window is {root:?}");
        Ok(Self {
            connection,
            screen_num,
            root,
            atoms,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn has_randr(&self) -> bool {
        self.connection
            .active_extensions()
            .any(|extension| extension == Extension::RandR)
    }

    /// Get the handle of the root window.
    pub fn root(&self) -> XcbWindow {
        self.root
    }

    pub fn screen(&self) -> &Screen {
        self.connection
            .get_setup()
            .roots()
            .nth(self.screen_num as usize)
            .ok_or("invalid screen number")
            .unwrap_or_fatal()
    }

    pub fn void_request<'a, R>(&'a self, request: &'a R)
    where
        R: RequestWithoutReply,
    {
        self.connection.send_request(request);
    }

    pub fn try_void_request<'a, R>(&'a self, request: &'a R) -> ProtocolResult<()>
    where
        R: RequestWithoutReply,
    {
        let cookie = self.connection.send_request_checked(request);
        self.connection.check_request(cookie)
    }

    pub fn request_with_reply<'a, R>(
        &'a self,
        request: &'a R,
    ) -> xcb::Result<<<R as xcb::Request>::Cookie as CookieWithReplyChecked>::Reply>
    where
        R: xcb::RequestWithReply,
        <R as xcb::Request>::Cookie: CookieWithReplyChecked,
    {
        let cookie = self.connection.send_request(request);
        self.connection.wait_for_reply(cookie)
    }

    pub fn flush(&self) {
        self.connection.flush().ok();
    }

    /// Returns the next queued event without blocking.
    pub fn poll_for_event(&self) -> xcb::Result<Option<Event>> {
        self.connection.poll_for_event()
    }

    pub fn create_pixmap(&self, depth: u8, width: u16, height: u16) -> Pixmap {
        let pid = self.connection.generate_id();
        self.try_void_request(&CreatePixmap {
            depth,
            pid,
            drawable: Drawable::Window(self.root),
            width,
            height,
        })
        .or_fatal();
        pid
    }

    pub fn free_pixmap(&self, pixmap: Pixmap) {
        self.void_request(&FreePixmap { pixmap });
    }
}

impl AsRawFd for Display {
    fn as_raw_fd(&self) -> RawFd {
        self.connection.as_raw_fd()
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Display(screen {})", self.screen_num)
    }
}
