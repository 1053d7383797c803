use std::sync::Mutex;

macro_rules! cached_paths {
    {
        $(
            $(#[doc = $doc:expr])?
            $vis:vis fn $name:ident() -> String $body:block
        )*
    } => {
        $(
            $(#[doc = $doc])?
            $vis fn $name() -> String {
                static CACHED: Mutex<Option<String>> = Mutex::new(None);
                let mut cached = CACHED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Some(value) = &*cached {
                    return value.clone();
                }
                let value = $body;
                *cached = Some(value.clone());
                value
            }
        )*
    }
}

cached_paths! {
    /// Returns the path to the current users config directory.
    fn base_config_dir() -> String {
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            config_home
        } else {
            format!("{}/.config", std::env::var("HOME").unwrap_or_default())
        }
    }

    /// Returns the path to the bars config directory.
    pub fn config_dir() -> String {
        format!("{}/{}", base_config_dir(), "tinybar")
    }
}

/// Returns the path to the log file.
pub fn log_path() -> String {
    format!("{}/log.txt", config_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> String {
    format!("{}/config.ini", config_dir())
}
