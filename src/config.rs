use crate::{
    bar::{Colors, SourceKind},
    cfg::{
        error::Error,
        gen::parsed_config,
        parse::{most_similar, Document, Parser, Section},
    },
    color::Color,
    error::OrFatal,
    paths, AnyResult,
};
use std::io;

parsed_config! {
    sections => {
        Bar {
            height: u16 = "40",
            font: String = "'Classic Console'",
            font_size: u16 = "12",
            border_width: u16 = "2",
            padding: u16 = "0",
        }
        Palette {
            background: Color = "#123456",
            foreground: Color = "#FFFFFF",
            border: Color = "#123456",
            battery_low: Color = "#FF0000",
            battery_medium: Color = "#FFFF00",
            battery_high: Color = "#00FF00",
        }
        WidgetConfig {
            source: SourceKind = "clock",
            width: u16 = "8",
            interval: u64 = "1000",
            border_width: u16 = "0",
            padding: u16 = "0",
            font: String = "''",
            font_size: u16 = "0",
            format: String = "''",
            power_supply: String = "'BAT0'",
            command: String = "''",
            text: String = "''",
        }
    }
    config => {
        bar: Bar => "bar",
        colors: Palette => "colors",
    }
}

const WIDGET_PREFIX: &str = "widget.";

/// Collects the fixed sections and the widget sections in the order they
/// first appear.
#[derive(Default)]
struct ConfigDocument {
    parsed: ParsedConfig,
    widgets: Vec<(String, WidgetConfig)>,
}

impl ConfigDocument {
    fn widget(&mut self, name: &str) -> &mut WidgetConfig {
        let index = match self.widgets.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.widgets.push((name.to_string(), WidgetConfig::default()));
                self.widgets.len() - 1
            }
        };
        &mut self.widgets[index].1
    }
}

impl Document for ConfigDocument {
    fn section(&mut self, path: &str) -> Result<&mut dyn Section, Error> {
        if let Some(name) = path.strip_prefix(WIDGET_PREFIX) {
            if name.is_empty() {
                return Err(Error::new("missing widget name")
                    .with_help(format!("widget sections are named `[{WIDGET_PREFIX}NAME]`")));
            }
            return Ok(self.widget(name));
        }
        if !ParsedConfig::SECTION_NAMES.contains(&path) {
            let mut error = Error::new(format!("unknown section `{path}`"));
            let candidates = ParsedConfig::SECTION_NAMES.iter().cloned().chain([WIDGET_PREFIX]);
            if let Some(similar) = most_similar(path, candidates) {
                error = error.with_help(format!("a section with a similar name exists: `{similar}`"));
            }
            return Err(error);
        }
        self.parsed
            .fixed_section(path)
            .ok_or_else(|| Error::new(format!("unknown section `{path}`")))
    }
}

pub struct Config {
    pub bar: Bar,
    pub colors: Palette,
    /// Widgets in display order.
    pub widgets: Vec<(String, WidgetConfig)>,
}

impl Config {
    /// The configuration used without a config file.
    pub fn builtin() -> Self {
        let parsed = ParsedConfig::default();
        Self {
            bar: parsed.bar,
            colors: parsed.colors,
            widgets: Self::builtin_widgets(),
        }
    }

    fn builtin_widgets() -> Vec<(String, WidgetConfig)> {
        let clock = WidgetConfig {
            source: SourceKind::Clock,
            width: 8,
            interval: 1000,
            ..WidgetConfig::default()
        };
        let date = WidgetConfig {
            source: SourceKind::Date,
            ..clock.clone()
        };
        let battery = WidgetConfig {
            source: SourceKind::Battery,
            width: 13,
            interval: 60000,
            border_width: 3,
            ..WidgetConfig::default()
        };
        vec![
            ("clock".to_string(), clock),
            ("date".to_string(), date),
            ("battery".to_string(), battery),
        ]
    }

    /// Parses and validates a configuration file.
    pub fn parse(parser: &Parser) -> Result<Self, Error> {
        let mut document = ConfigDocument::default();
        parser.parse(&mut document)?;
        let ConfigDocument { parsed, widgets } = document;
        for (name, widget) in widgets.iter() {
            if widget.width == 0 {
                return Err(Error::new(format!(
                    "widget `{name}`: width must be greater than 0"
                )));
            }
            if widget.source == SourceKind::Command && widget.command.trim().is_empty() {
                return Err(Error::new(format!("widget `{name}`: missing command"))
                    .with_help("set the `command` field for widgets with the `command` source"));
            }
        }
        let widgets = if widgets.is_empty() {
            log::info!("No widgets configured, using the default widgets");
            Self::builtin_widgets()
        } else {
            widgets
        };
        Ok(Self {
            bar: parsed.bar,
            colors: parsed.colors,
            widgets,
        })
    }

    /// Loads the configuration from `path`, or from the default location if
    /// no path is given. A missing file at the default location is not an
    /// error.
    pub fn try_load(path: Option<&str>) -> AnyResult<Self> {
        let explicit = path.is_some();
        let path = path.map_or_else(paths::config_path, str::to_owned);
        let parser = match Parser::new(&path) {
            Ok(parser) => parser,
            Err(error) if error.kind() == io::ErrorKind::NotFound && !explicit => {
                log::info!("No configuration file at {path}, using defaults");
                return Ok(Self::builtin());
            }
            Err(error) => Err(format!("Failed to read {path}: {error}"))?,
        };
        log::trace!("Loading configuration from {path}");
        Self::parse(&parser).map_err(|error| {
            format!(
                "Invalid configuration file:\n{}",
                error.to_report(parser.path(), parser.source())
            )
            .into()
        })
    }

    pub fn load(path: Option<&str>) -> Self {
        Self::try_load(path).unwrap_or_fatal()
    }

    pub fn default_colors(&self) -> Colors {
        Colors {
            foreground: self.colors.foreground,
            background: self.colors.background,
            border: self.colors.border,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Config, Error> {
        Config::parse(&Parser::from_source("test.ini", source.to_string()))
    }

    #[test]
    fn defaults() {
        let config = Config::builtin();
        assert_eq!(config.bar.height, 40);
        assert_eq!(config.bar.font, "Classic Console");
        assert_eq!(config.bar.font_size, 12);
        assert_eq!(config.bar.border_width, 2);
        assert_eq!(config.colors.background.pack(), 0xFF123456);
        assert_eq!(config.colors.foreground.pack(), 0xFFFFFFFF);
        assert_eq!(config.colors.border, config.colors.background);
        let names: Vec<_> = config.widgets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["clock", "date", "battery"]);
        assert_eq!(config.widgets[1].1.source, SourceKind::Date);
        assert_eq!(config.widgets[2].1.power_supply, "BAT0");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("# nothing here\n").unwrap();
        let names: Vec<_> = config.widgets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["clock", "date", "battery"]);
    }

    #[test]
    fn widgets_keep_file_order() {
        let config = parse(
            "[bar]\n\
             height = 24\n\
             font = 'monospace'\n\
             \n\
             [widget.load]\n\
             source = command\n\
             command = 'cat /proc/loadavg'\n\
             width = 14\n\
             \n\
             [widget.hello]\n\
             source = 'label'\n\
             text = \"hi there\"\n\
             interval = 0\n\
             \n\
             [colors]\n\
             border = #FF0000\n\
             \n\
             [widget.load]\n\
             interval = 5000\n",
        )
        .unwrap();
        assert_eq!(config.bar.height, 24);
        assert_eq!(config.bar.font, "monospace");
        assert_eq!(config.colors.border.pack(), 0xFFFF0000);
        assert_eq!(config.widgets.len(), 2);
        let (name, load) = &config.widgets[0];
        assert_eq!(name, "load");
        assert_eq!(load.source, SourceKind::Command);
        assert_eq!(load.command, "cat /proc/loadavg");
        assert_eq!(load.width, 14);
        assert_eq!(load.interval, 5000);
        let (name, hello) = &config.widgets[1];
        assert_eq!(name, "hello");
        assert_eq!(hello.text, "hi there");
        assert_eq!(hello.interval, 0);
    }

    #[test]
    fn unknown_field() {
        let error = parse("[bar]\nheigth = 20\n").err().unwrap();
        assert!(error.message().contains("heigth"));
        assert_eq!(error.line, Some(1));
    }

    #[test]
    fn unknown_section() {
        let error = parse("[colours]\nbackground = #000000\n").err().unwrap();
        assert!(error.message().contains("colours"));
        assert!(error.help.as_deref().unwrap_or("").contains("colors"));
    }

    #[test]
    fn unknown_source() {
        let error = parse("[widget.x]\nsource = volume\n").err().unwrap();
        assert!(error.message().contains("volume"));
    }

    #[test]
    fn zero_width() {
        let error = parse("[widget.x]\nwidth = 0\n").err().unwrap();
        assert!(error.message().contains("width"));
    }

    #[test]
    fn command_required() {
        assert!(parse("[widget.x]\nsource = command\n").is_err());
    }

    #[test]
    fn missing_explicit_file() {
        assert!(Config::try_load(Some("/nonexistent/tinybar/config.ini")).is_err());
    }
}
