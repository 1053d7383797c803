#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn new_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// Creates an opaque color from a `0xRRGGBB` value.
    pub fn from_rgb_hex(hex: u32) -> Self {
        Self::new_rgb(
            ((hex >> 16) & 0xFF) as f64 / 255.0,
            ((hex >> 8) & 0xFF) as f64 / 255.0,
            (hex & 0xFF) as f64 / 255.0,
        )
    }

    pub fn components(&self) -> (f64, f64, f64, f64) {
        (self.red, self.green, self.blue, self.alpha)
    }

    /// Packs the color into a `0xAARRGGBB` pixel value.
    pub fn pack(&self) -> u32 {
        fn channel(value: f64) -> u32 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u32
        }
        (channel(self.alpha) << 24)
            | (channel(self.red) << 16)
            | (channel(self.green) << 8)
            | channel(self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_hex() {
        assert_eq!(Color::from_rgb_hex(0x123456).pack(), 0xFF123456);
        assert_eq!(Color::new(1.0, 0.0, 0.0, 0.0).pack(), 0x00FF0000);
    }
}
