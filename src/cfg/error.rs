use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::{
    io,
    ops::{Deref, DerefMut, Range},
};

struct ErrorWriter<'a>(pub &'a mut Vec<u8>);

impl<'a> io::Write for ErrorWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// The data lives in a box so results carrying an `Error` stay small.
#[derive(Default)]
pub struct ErrorInner {
    pub(crate) message: String,
    pub(crate) line: Option<usize>,
    pub(crate) label: Option<(Range<usize>, String)>,
    pub(crate) why: Option<(Range<usize>, String)>,
    pub(crate) help: Option<String>,
}

#[derive(Default)]
pub struct Error {
    inner: Box<ErrorInner>,
}

impl Deref for Error {
    type Target = ErrorInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Error {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Error {
    pub fn new(message: impl ToString) -> Self {
        Self {
            inner: Box::new(ErrorInner {
                message: message.to_string(),
                ..Default::default()
            }),
        }
    }

    /// Creates a new error on the line of the given location.
    pub fn new_with_line(message: impl ToString, line: usize) -> Self {
        Self {
            inner: Box::new(ErrorInner {
                message: message.to_string(),
                line: Some(line),
                ..Default::default()
            }),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn with_label(mut self, span: Range<usize>, message: impl ToString) -> Self {
        self.label = Some((span, message.to_string()));
        self
    }

    pub fn with_why(mut self, span: Range<usize>, message: impl ToString) -> Self {
        self.why = Some((span, message.to_string()));
        self
    }

    pub fn with_help(mut self, help: impl ToString) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Renders the error as a terminal report pointing into `source`.
    pub fn to_report(&self, path: &str, source: &str) -> String {
        let offset = self
            .label
            .as_ref()
            .map(|(span, _)| span.start)
            .unwrap_or(0);
        let mut builder = Report::build(ReportKind::Error, path, offset).with_message(&self.message);
        if let Some((span, msg)) = self.label.clone() {
            builder.add_label(
                Label::new((path, span))
                    .with_color(Color::Red)
                    .with_message(msg.as_str().fg(Color::Red)),
            );
        }
        if let Some((span, msg)) = self.why.clone() {
            builder.add_label(
                Label::new((path, span))
                    .with_color(Color::Blue)
                    .with_message(msg.fg(Color::Blue)),
            );
        }
        if let Some(msg) = &self.help {
            builder.set_help(msg);
        }
        let report = builder.finish();
        let mut buf = Vec::new();
        if report
            .write((path, Source::from(source)), ErrorWriter(&mut buf))
            .is_err()
        {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line + 1, self.message()),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cfg::Error({})", self.message)
    }
}

impl std::error::Error for Error {}

/// Creates an error for value parsers. The location is filled in by the
/// parser once the failing value is known.
pub fn value_error(message: impl ToString, label: impl ToString) -> Error {
    Error::new(message).with_label(0..0, label)
}
