use super::source::{Battery, BatteryBands, Command, DateTime, Label, SourceKind, TextSource};
use crate::{
    color::Color,
    config::{Config, WidgetConfig},
    draw::{Font, FontSpec},
    process::split_commandline,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Colors {
    pub foreground: Color,
    pub background: Color,
    pub border: Color,
}

/// Text and colors produced by one invocation of a source.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    pub text: String,
    pub colors: Colors,
}

impl Content {
    pub const PLACEHOLDER: &'static str = "N/A";

    pub fn new(text: impl Into<String>, colors: Colors) -> Self {
        Self {
            text: text.into(),
            colors,
        }
    }

    /// Content shown in place of a failed source.
    pub fn placeholder(colors: Colors) -> Self {
        Self::new(Self::PLACEHOLDER, colors)
    }
}

/// Static properties of a widget, with defaults from the `[bar]` section
/// already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetDescriptor {
    pub name: String,
    /// Width of the slot in characters.
    pub slot_width: u16,
    pub interval_ms: u64,
    pub border_width: u16,
    pub padding: u16,
    pub font: FontSpec,
}

impl WidgetDescriptor {
    fn new(name: &str, widget: &WidgetConfig, config: &Config) -> Self {
        let or_default = |value: u16, default: u16| if value == 0 { default } else { value };
        let family = if widget.font.is_empty() {
            config.bar.font.clone()
        } else {
            widget.font.clone()
        };
        Self {
            name: name.to_string(),
            slot_width: widget.width,
            interval_ms: widget.interval,
            border_width: or_default(widget.border_width, config.bar.border_width),
            padding: or_default(widget.padding, config.bar.padding),
            font: FontSpec::new(family, or_default(widget.font_size, config.bar.font_size)),
        }
    }
}

pub struct Widget {
    pub descriptor: WidgetDescriptor,
    pub font: Font,
    pub source: Box<dyn TextSource>,
}

impl Widget {
    /// Pixel width of the widget's slot, limited to what an X coordinate can
    /// address.
    pub fn pixel_width(&self) -> u16 {
        let width = self.descriptor.slot_width as u32 * self.font.metrics().advance as u32;
        width.min(i16::MAX as u32) as u16
    }
}

fn create_source(widget: &WidgetConfig, config: &Config) -> Box<dyn TextSource> {
    match widget.source {
        SourceKind::Clock | SourceKind::Date => {
            let format = if !widget.format.is_empty() {
                widget.format.as_str()
            } else if widget.source == SourceKind::Clock {
                DateTime::TIME_FORMAT
            } else {
                DateTime::DATE_FORMAT
            };
            Box::new(DateTime::new(format))
        }
        SourceKind::Battery => Box::new(Battery::new(
            &widget.power_supply,
            BatteryBands {
                low: config.colors.battery_low,
                medium: config.colors.battery_medium,
                high: config.colors.battery_high,
            },
        )),
        SourceKind::Command => Box::new(Command::new(split_commandline(&widget.command))),
        SourceKind::Label => Box::new(Label::new(widget.text.clone())),
    }
}

/// The ordered list of widgets shown on every bar.
pub struct Registry {
    widgets: Vec<Widget>,
    defaults: Colors,
    height: u16,
}

impl Registry {
    /// Builds the registry from the configuration. `load_font` is called for
    /// every widget and must not fail.
    pub fn build<F>(config: &Config, mut load_font: F) -> Self
    where
        F: FnMut(&FontSpec) -> Font,
    {
        let widgets = config
            .widgets
            .iter()
            .map(|(name, widget)| {
                let descriptor = WidgetDescriptor::new(name, widget, config);
                let font = load_font(&descriptor.font);
                log::trace!(
                    "Widget {name}: source={} width={} interval={}ms font='{}'",
                    widget.source.name(),
                    descriptor.slot_width,
                    descriptor.interval_ms,
                    descriptor.font
                );
                Widget {
                    descriptor,
                    font,
                    source: create_source(widget, config),
                }
            })
            .collect();
        Self::from_widgets(widgets, config.default_colors(), config.bar.height)
    }

    pub fn from_widgets(widgets: Vec<Widget>, defaults: Colors, height: u16) -> Self {
        Self {
            widgets,
            defaults,
            height,
        }
    }

    pub fn defaults(&self) -> Colors {
        self.defaults
    }

    /// Height of the bar in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<Widget> {
        self.widgets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<Widget> {
        self.widgets.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::testing::fake_font;

    #[test]
    fn builtin_registry() {
        let config = Config::builtin();
        let mut specs = Vec::new();
        let registry = Registry::build(&config, |spec| {
            specs.push(spec.clone());
            fake_font(spec)
        });
        let names: Vec<_> = registry
            .iter()
            .map(|w| w.descriptor.name.as_str())
            .collect();
        assert_eq!(names, ["clock", "date", "battery"]);
        let battery = &registry.iter().nth(2).unwrap().descriptor;
        assert_eq!(battery.slot_width, 13);
        assert_eq!(battery.interval_ms, 60000);
        assert_eq!(battery.border_width, 3);
        let clock = &registry.iter().next().unwrap().descriptor;
        assert_eq!(clock.border_width, 2);
        assert_eq!(clock.padding, 0);
        assert!(specs.iter().all(|s| *s == FontSpec::new("Classic Console", 12)));
        assert_eq!(registry.height(), 40);
        assert_eq!(registry.defaults().border, registry.defaults().background);
    }

    #[test]
    fn pixel_width_uses_advance() {
        let config = Config::builtin();
        let registry = Registry::build(&config, fake_font);
        let widths: Vec<_> = registry.iter().map(Widget::pixel_width).collect();
        assert_eq!(widths, [80, 80, 130]);
    }

    #[test]
    fn placeholder() {
        let colors = Config::builtin().default_colors();
        let content = Content::placeholder(colors);
        assert_eq!(content.text, "N/A");
        assert_eq!(content.colors, colors);
    }
}
