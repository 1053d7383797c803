use super::{Colors, Content};
use crate::{color::Color, process::run_and_await_with_output, AnyResult};
use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

/// Produces the text and colors shown by a widget.
pub trait TextSource {
    fn produce(&mut self, defaults: Colors) -> AnyResult<Content>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Clock,
    Date,
    Battery,
    Command,
    Label,
}

impl SourceKind {
    pub const NAMES: &'static [&'static str] = &["clock", "date", "battery", "command", "label"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "clock" => Some(Self::Clock),
            "date" => Some(Self::Date),
            "battery" => Some(Self::Battery),
            "command" => Some(Self::Command),
            "label" => Some(Self::Label),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clock => "clock",
            Self::Date => "date",
            Self::Battery => "battery",
            Self::Command => "command",
            Self::Label => "label",
        }
    }
}

/// Local time formatted with a strftime style format.
pub struct DateTime {
    format: String,
}

impl DateTime {
    pub const TIME_FORMAT: &'static str = "%H:%M:%S";
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl TextSource for DateTime {
    fn produce(&mut self, defaults: Colors) -> AnyResult<Content> {
        let mut text = String::new();
        // Formatting fails on invalid specifiers instead of when parsing.
        write!(text, "{}", chrono::Local::now().format(&self.format))
            .map_err(|_| format!("invalid time format: '{}'", self.format))?;
        Ok(Content::new(text, defaults))
    }
}

/// Border colors for the battery capacity bands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryBands {
    pub low: Color,
    pub medium: Color,
    pub high: Color,
}

impl BatteryBands {
    pub const LOW_BELOW: i32 = 20;
    pub const MEDIUM_BELOW: i32 = 50;

    pub fn color_for(&self, capacity: i32) -> Color {
        if capacity < Self::LOW_BELOW {
            self.low
        } else if capacity < Self::MEDIUM_BELOW {
            self.medium
        } else {
            self.high
        }
    }
}

/// Capacity of a battery read from sysfs.
pub struct Battery {
    path: PathBuf,
    bands: BatteryBands,
}

impl Battery {
    pub fn new(power_supply: &str, bands: BatteryBands) -> Self {
        let path = Path::new("/sys/class/power_supply")
            .join(power_supply)
            .join("capacity");
        Self::with_path(path, bands)
    }

    /// Reads the capacity from an arbitrary file.
    pub fn with_path(path: impl Into<PathBuf>, bands: BatteryBands) -> Self {
        Self {
            path: path.into(),
            bands,
        }
    }

    fn read_capacity(&self) -> AnyResult<i32> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|error| format!("{}: {error}", self.path.display()))?;
        let capacity = content
            .trim()
            .parse()
            .map_err(|error| format!("{}: invalid capacity: {error}", self.path.display()))?;
        Ok(capacity)
    }
}

impl TextSource for Battery {
    fn produce(&mut self, defaults: Colors) -> AnyResult<Content> {
        let capacity = self.read_capacity()?;
        let colors = Colors {
            border: self.bands.color_for(capacity),
            ..defaults
        };
        Ok(Content::new(format!("Battery: {capacity}%"), colors))
    }
}

/// First line of the output of a command.
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl TextSource for Command {
    fn produce(&mut self, defaults: Colors) -> AnyResult<Content> {
        let output = run_and_await_with_output(&self.argv)?;
        let text = output.lines().next().unwrap_or("").trim_end().to_string();
        Ok(Content::new(text, defaults))
    }
}

pub struct Label {
    text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextSource for Label {
    fn produce(&mut self, defaults: Colors) -> AnyResult<Content> {
        Ok(Content::new(self.text.clone(), defaults))
    }
}
