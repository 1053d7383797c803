use super::Display;
use xcb::{
    randr::{GetCrtcInfo, GetScreenResourcesCurrent},
    Xid,
};

/// Geometry and mode of a single CRTC as reported by the server.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrtcInfo {
    pub crtc: u32,
    /// Mode id, `0` if the CRTC is disabled.
    pub mode: u32,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Queries every CRTC of the screen. Failing to get the screen resources is
/// an error, CRTCs whose info can't be queried are skipped.
pub fn query_crtcs(display: &Display) -> xcb::Result<Vec<CrtcInfo>> {
    let resources = display.request_with_reply(&GetScreenResourcesCurrent {
        window: display.root(),
    })?;
    let config_timestamp = resources.config_timestamp();
    let mut result = Vec::with_capacity(resources.crtcs().len());
    for &crtc in resources.crtcs() {
        match display.request_with_reply(&GetCrtcInfo {
            crtc,
            config_timestamp,
        }) {
            Ok(info) => result.push(CrtcInfo {
                crtc: crtc.resource_id(),
                mode: info.mode().resource_id(),
                x: info.x(),
                y: info.y(),
                width: info.width(),
                height: info.height(),
            }),
            Err(error) => {
                log::warn!("randr: failed to query CRTC {}: {error}", crtc.resource_id())
            }
        }
    }
    Ok(result)
}
