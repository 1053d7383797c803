use super::{
    error::Error,
    scanner::{is_space, Scanner},
};
use std::{fs::read_to_string, io};

pub enum SetError {
    InvalidKey(Error),
    InvalidValue(Error),
}

impl SetError {
    fn into_inner(self) -> Error {
        match self {
            Self::InvalidKey(e) | Self::InvalidValue(e) => e,
        }
    }
}

pub type SetResult = Result<(), SetError>;

/// Find the most similar item to `s` in `valid`.
/// If no item is sufficiently similar `None` is returned.
pub fn most_similar<'a, I>(s: &str, valid: I) -> Option<&'a str>
where
    I: Iterator<Item = &'a str>,
{
    let mut closest = "";
    let mut score = 0.0;
    for v in valid {
        let sim = strsim::jaro_winkler(v, s);
        if sim > score {
            closest = v;
            score = sim;
        }
    }
    if score >= 0.8 {
        Some(closest)
    } else {
        None
    }
}

pub trait Document {
    /// Returns the section for the given path. This is called once for the
    /// section header and again for every assignment inside the section.
    fn section(&mut self, path: &str) -> Result<&mut dyn Section, Error>;
}

pub trait Section {
    /// `section_name` is the name used in the config file, for error messages.
    fn set(&mut self, section_name: &str, field: &str, scanner: &mut Scanner) -> SetResult;
}

pub trait Value: Sized {
    fn parse(scanner: &mut Scanner) -> Result<Self, Error>;
}

/// Predicate matching section name characters.
fn is_section_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.' || c == '_' || c == '-'
}

/// Predicate matching value name characters.
fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub struct Parser {
    path: String,
    source: String,
}

impl Parser {
    pub fn new(path: &str) -> io::Result<Self> {
        Ok(Self::from_source(path, read_to_string(path)?))
    }

    pub fn from_source(path: &str, source: String) -> Self {
        Self {
            path: path.to_owned(),
            source,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn skip_non_content(scanner: &mut Scanner) {
        loop {
            match scanner.peek() {
                Some(space) if is_space(true)(space) => scanner.skip_space(true),
                Some('#') | Some(';') => {
                    scanner.rest_of_line();
                }
                _ => break,
            }
        }
    }

    /// Parses one line of content. Returns `false` once the input is exhausted.
    fn parse_one_line(
        scanner: &mut Scanner,
        section_path: &mut Option<String>,
        doc: &mut impl Document,
    ) -> Result<bool, Error> {
        Self::skip_non_content(scanner);
        if scanner.is_empty() {
            return Ok(false);
        }
        if scanner.starts_with("[") {
            scanner.next();
            scanner.skip_space(false);
            let section_name = scanner.some(is_section_char);
            scanner.skip_space(false);
            scanner.expect_eq(']')?;
            doc.section(section_name.as_str()).map_err(|mut e| {
                e.line = Some(section_name.location().line);
                match e.label.as_mut() {
                    Some(label) => label.0 = section_name.range(),
                    None => e.label = Some((section_name.range(), "unknown section".to_string())),
                }
                e
            })?;
            *section_path = Some(section_name.as_str().to_owned());
        } else {
            let key = scanner.some(is_value_char);
            if key.is_empty() {
                let loc = scanner.position();
                return Err(Error::new_with_line("missing field name", loc.line)
                    .with_label(loc.range(1), "expected field name"));
            }
            scanner.skip_space(false);
            scanner.expect_eq('=').map_err(|e| {
                e.with_why(key.range(), "because the previous token was a field name")
            })?;
            scanner.skip_space(false);
            let section_path = section_path.as_ref().ok_or_else(|| {
                key.as_error(
                    "assignment outside section",
                    "expected section before this assignment",
                )
            })?;
            // The header already resolved this path.
            let section = doc.section(section_path.as_str())?;
            let start = scanner.position();
            let r = section.set(section_path.as_str(), key.as_str(), scanner);
            let end = scanner.position();
            if let Err(set_error) = r {
                let real_span = match &set_error {
                    SetError::InvalidKey(_) => key.range(),
                    SetError::InvalidValue(_) => start.char_offset..end.char_offset.max(start.char_offset + 1),
                };
                let mut error = set_error.into_inner();
                if let Some((span, _)) = &mut error.label {
                    if *span == (0..0) {
                        *span = real_span;
                    }
                }
                error.line.get_or_insert(key.location().line);
                return Err(error);
            }
        }
        scanner.skip_space(false);
        if !scanner.is_empty() {
            scanner.expect_eq('\n')?;
        }
        Ok(true)
    }

    pub fn parse(&self, doc: &mut impl Document) -> Result<(), Error> {
        let mut section_path = None;
        let mut scanner = Scanner::new(&self.source);
        while Self::parse_one_line(&mut scanner, &mut section_path, doc)? {}
        Ok(())
    }
}
