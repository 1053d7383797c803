#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Rectangle {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rectangle {
    pub const fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn into_parts(self) -> (i16, i16, u16, u16) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn into_xcb(self) -> xcb::x::Rectangle {
        xcb::x::Rectangle {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns x-coordinate of the right edge, saturating at `i16::MAX`.
    pub fn right_edge(&self) -> i16 {
        (self.x as i32 + self.width as i32).min(i16::MAX as i32) as i16
    }

    /// Shrinks the rectangle by `by` pixels on every side. Dimensions saturate
    /// at zero if the rectangle is smaller than twice the inset.
    pub fn inset(&self, by: u16) -> Self {
        Self::new(
            self.x + by as i16,
            self.y + by as i16,
            self.width.saturating_sub(2 * by),
            self.height.saturating_sub(2 * by),
        )
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_shrinks_on_all_sides() {
        let rect = Rectangle::new(10, 0, 96, 40);
        assert_eq!(rect.inset(2), Rectangle::new(12, 2, 92, 36));
        assert_eq!(rect.inset(30), Rectangle::new(40, 30, 36, 0));
    }

    #[test]
    fn right_edge_saturates() {
        assert_eq!(Rectangle::new(100, 0, 50, 40).right_edge(), 150);
        assert_eq!(Rectangle::new(30000, 0, 30000, 40).right_edge(), i16::MAX);
        assert_eq!(Rectangle::new(0, 0, 40000, 40).right_edge(), i16::MAX);
    }

    #[test]
    fn display_uses_geometry_syntax() {
        assert_eq!(Rectangle::new(1920, 0, 1280, 40).to_string(), "1280x40+1920+0");
    }
}
