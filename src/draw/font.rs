use pango::FontDescription;

/// A font as named in the configuration: a family and a point size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub size: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    pub fn description(&self) -> FontDescription {
        let mut description = FontDescription::new();
        description.set_family(&self.family);
        description.set_size(self.size as i32 * pango::SCALE);
        description
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.size)
    }
}

/// Pixel metrics of a loaded font.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    pub ascent: u16,
    pub descent: u16,
    /// Horizontal advance of an average character, used to convert widths
    /// given in characters to pixels.
    pub advance: u16,
}

impl FontMetrics {
    pub fn height(&self) -> u16 {
        self.ascent + self.descent
    }
}

#[derive(Clone, Debug)]
pub struct Font {
    description: FontDescription,
    metrics: FontMetrics,
}

impl Font {
    pub fn new(spec: &FontSpec, metrics: FontMetrics) -> Self {
        Self {
            description: spec.description(),
            metrics,
        }
    }

    pub fn description(&self) -> &FontDescription {
        &self.description
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description() {
        let spec = FontSpec::new("Classic Console", 12);
        let description = spec.description();
        assert_eq!(description.family().as_deref(), Some("Classic Console"));
        assert_eq!(description.size(), 12 * pango::SCALE);
        assert_eq!(spec.to_string(), "Classic Console 12");
    }

    #[test]
    fn metrics_height() {
        let metrics = FontMetrics {
            ascent: 11,
            descent: 3,
            advance: 8,
        };
        assert_eq!(metrics.height(), 14);
    }
}
