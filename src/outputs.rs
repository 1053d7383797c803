use crate::{
    error::fatal_error,
    rectangle::Rectangle,
    x::{
        randr::{query_crtcs, CrtcInfo},
        Display,
    },
};

/// An active output the bar is shown on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutputGeometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl OutputGeometry {
    /// Returns `None` for disabled CRTCs and CRTCs with an empty area.
    pub fn from_crtc(info: &CrtcInfo) -> Option<Self> {
        if info.mode == 0 || info.width == 0 || info.height == 0 {
            return None;
        }
        Some(Self {
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
        })
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }
}

/// Filters the active outputs out of the given CRTCs, keeping their order.
pub fn active_outputs<'a>(crtcs: impl IntoIterator<Item = &'a CrtcInfo>) -> Vec<OutputGeometry> {
    crtcs
        .into_iter()
        .filter_map(OutputGeometry::from_crtc)
        .collect()
}

/// Queries the active outputs of the display. Exits if RandR is missing or
/// the screen resources can't be queried.
pub fn discover(display: &Display) -> Vec<OutputGeometry> {
    if !display.has_randr() {
        fatal_error("Xrandr extension not available");
    }
    let crtcs = query_crtcs(display)
        .unwrap_or_else(|error| fatal_error(format!("Failed to get screen resources: {error}")));
    let outputs = active_outputs(&crtcs);
    if outputs.is_empty() {
        log::warn!("No active outputs, no bars will be shown");
    } else {
        log::info!("Outputs:");
        for output in outputs.iter() {
            log::info!("  {}", output.rect());
        }
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crtc(mode: u32, x: i16, width: u16, height: u16) -> CrtcInfo {
        CrtcInfo {
            crtc: 0x40 + x as u32,
            mode,
            x,
            y: 0,
            width,
            height,
        }
    }

    #[test]
    fn disabled_crtcs_are_skipped() {
        let crtcs = [
            crtc(0x51, 0, 1920, 1080),
            crtc(0, 1920, 1920, 1080),
            crtc(0x52, 3840, 1280, 1024),
        ];
        assert_eq!(
            active_outputs(&crtcs),
            vec![
                OutputGeometry {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1080
                },
                OutputGeometry {
                    x: 3840,
                    y: 0,
                    width: 1280,
                    height: 1024
                },
            ]
        );
    }

    #[test]
    fn empty_area_is_skipped() {
        assert_eq!(OutputGeometry::from_crtc(&crtc(0x51, 0, 0, 1080)), None);
        assert_eq!(OutputGeometry::from_crtc(&crtc(0x51, 0, 1920, 0)), None);
        assert!(active_outputs(&[]).is_empty());
    }
}
