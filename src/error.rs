/// Reports the given message on stderr and in the log and exits with status 1.
pub fn fatal_error(message: impl std::fmt::Display) -> ! {
    let message = message.to_string();
    log::error!("Error: {}", message.replace('\n', "\n     | "));
    eprintln!("tinybar: {message}");
    std::process::exit(1);
}

pub trait OrFatal<T> {
    fn or_fatal(self);

    fn unwrap_or_fatal(self) -> T;
}

impl<T, E> OrFatal<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn or_fatal(self) {
        if let Err(error) = self {
            fatal_error(format!("{error:#}"))
        }
    }

    fn unwrap_or_fatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => fatal_error(format!("{error:#}")),
        }
    }
}

pub trait LogError<T> {
    fn log_error(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogError<T> for Result<T, E> {
    /// Turn a result into an option, logging the error if it was one.
    fn log_error(self) -> Option<T> {
        match self {
            Ok(x) => Some(x),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }
}

pub trait LogNone<T> {
    fn log_none(self, msg: &str) -> Option<T>;
}

impl<T> LogNone<T> for Option<T> {
    /// Logs the given error message if the option is `None`.
    fn log_none(self, msg: &str) -> Self {
        if self.is_none() {
            log::error!("{msg}");
        }
        self
    }
}
