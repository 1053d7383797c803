use xcb::x::{Cw, EventMask};

/// Builder for window attributes.
pub struct WindowAttributes {
    value_list: Vec<Cw>,
}

impl WindowAttributes {
    pub const fn new() -> Self {
        Self {
            value_list: Vec::new(),
        }
    }

    /// The attributes in the order the X server expects them.
    pub fn value_list(&mut self) -> &[Cw] {
        self.value_list.sort();
        &self.value_list
    }

    pub fn event_mask(&mut self, mask: EventMask) -> &mut Self {
        self.value_list.push(Cw::EventMask(mask));
        self
    }

    pub fn background_pixel(&mut self, pixel: u32) -> &mut Self {
        self.value_list.push(Cw::BackPixel(pixel));
        self
    }

    pub fn override_redirect(&mut self, enabled: bool) -> &mut Self {
        self.value_list.push(Cw::OverrideRedirect(enabled));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_list_is_sorted() {
        let mut attributes = WindowAttributes::new();
        attributes
            .event_mask(EventMask::EXPOSURE)
            .background_pixel(0x123456);
        assert!(matches!(
            attributes.value_list(),
            [Cw::BackPixel(0x123456), Cw::EventMask(_)]
        ));
    }
}
