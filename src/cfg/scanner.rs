use super::error::Error;
use std::{
    ops::{Deref, Range},
    str::CharIndices,
};

#[derive(Copy, Clone, Default, Debug)]
pub struct Location {
    pub line: usize,
    pub char_offset: usize,
    pub byte_offset: usize,
}

impl Location {
    pub fn range(&self, len: usize) -> Range<usize> {
        self.char_offset..(self.char_offset + len)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct LocatedStr<'a> {
    s: &'a str,
    begin: Location,
}

impl<'a> Deref for LocatedStr<'a> {
    type Target = str;

    fn deref(&self) -> &'a Self::Target {
        self.s
    }
}

impl<'a> LocatedStr<'a> {
    pub fn as_str(&self) -> &'a str {
        self.s
    }

    /// Character span of the string, used for error labels.
    pub fn range(&self) -> Range<usize> {
        self.begin.range(self.s.chars().count())
    }

    pub fn location(&self) -> &Location {
        &self.begin
    }

    /// Creates an error on the line of the string with an error label using
    /// the span of the string.
    pub fn as_error(&self, message: impl ToString, label: impl ToString) -> Error {
        Error::new_with_line(message, self.begin.line).with_label(self.range(), label)
    }
}

impl std::fmt::Display for LocatedStr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.s)
    }
}

/// Character scanner over a config source that keeps track of line and
/// offset information for error reporting. Line numbers start at 0.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    it: CharIndices<'a>,
    peeked: Option<(Option<char>, Location)>,
    location: Location,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            source: s,
            it: s.char_indices(),
            peeked: None,
            location: Location::default(),
        }
    }

    /// Location of the next character, or the end of the source.
    pub fn position(&mut self) -> Location {
        let byte_offset = if self.is_empty() {
            self.source.len()
        } else {
            self.peek_location().byte_offset
        };
        Location {
            line: self.location.line,
            char_offset: self.location.char_offset,
            byte_offset,
        }
    }

    /// Returns the unconsumed part of the source.
    pub fn rest(&mut self) -> &'a str {
        let offset = self.position().byte_offset;
        &self.source[offset..]
    }

    pub fn starts_with(&mut self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub fn peek(&mut self) -> Option<char> {
        if let Some(peeked) = self.peeked {
            peeked.0
        } else {
            let current_location = self.location;
            let maybe_next = self.next();
            self.peeked = Some((maybe_next, self.location));
            self.location = current_location;
            maybe_next
        }
    }

    fn peek_location(&mut self) -> &Location {
        self.peek();
        match &self.peeked {
            Some((_, location)) => location,
            _ => &self.location,
        }
    }

    pub fn next_if(&mut self, predicate: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(next) if predicate(next) => self.next(),
            _ => None,
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }

    pub fn expect(
        &mut self,
        what: impl ToString,
        predicate: impl FnOnce(char) -> bool,
    ) -> Result<char, Error> {
        let loc = self.position();
        match self.peek() {
            Some(next) if predicate(next) => {
                self.next();
                Ok(next)
            }
            otherwise => Err(char_mismatch_error(what, otherwise, &loc)),
        }
    }

    pub fn expect_eq(&mut self, expected: char) -> Result<char, Error> {
        self.expect(display_char(expected), |c| c == expected)
    }

    /// Consumes characters while `predicate` matches them.
    pub fn some(&mut self, mut predicate: impl FnMut(char) -> bool) -> LocatedStr<'a> {
        let begin = self.position();
        while self.next_if(&mut predicate).is_some() {}
        let end = self.position().byte_offset;
        LocatedStr {
            s: &self.source[begin.byte_offset..end],
            begin,
        }
    }

    pub fn digits(&mut self) -> LocatedStr<'a> {
        self.some(|c| c.is_ascii_digit())
    }

    pub fn skip_space(&mut self, newline: bool) {
        let p = is_space(newline);
        while self.next_if(p).is_some() {}
    }

    pub fn rest_of_line(&mut self) -> LocatedStr<'a> {
        self.some(|c| c != '\n')
    }

    /// Consumes a string up to the closing `delim` which must appear on the
    /// same line. The delimiter itself is consumed but not included.
    pub fn delimited(&mut self, delim: char) -> Result<LocatedStr<'a>, Error> {
        let content = self.some(|c| c != delim && c != '\n');
        let loc = self.position();
        match self.peek() {
            Some(c) if c == delim => {
                self.next();
                Ok(content)
            }
            otherwise => {
                let what = otherwise
                    .map(display_char)
                    .unwrap_or_else(|| "end of input".to_string());
                Err(
                    Error::new_with_line("unterminated string", loc.line).with_label(
                        loc.range(1),
                        format!("expected {} before {}", display_char(delim), what),
                    ),
                )
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            self.location = peeked.1;
            peeked.0
        } else if let Some((byte_offset, next)) = self.it.next() {
            if next == '\n' {
                self.location.line += 1;
            }
            self.location.char_offset += 1;
            self.location.byte_offset = byte_offset;
            Some(next)
        } else {
            None
        }
    }
}

fn display_char(c: char) -> String {
    if c == '\n' {
        "newline".to_string()
    } else {
        format!("`{}`", c)
    }
}

fn char_mismatch_error(expected: impl ToString, actual: Option<char>, loc: &Location) -> Error {
    let expected = expected.to_string();
    let label = format!("expected {expected}");
    let message = match actual {
        Some(actual) => {
            let actual = display_char(actual);
            format!("expected {expected}, found {actual}")
        }
        None => "unexpected end of input".to_string(),
    };
    Error::new_with_line(message, loc.line).with_label(loc.range(1), label)
}

/// Returns a predicate matching whitespace.
pub fn is_space(newline: bool) -> fn(char) -> bool {
    if newline {
        |c: char| c == ' ' || c == '\t' || c == '\n' || c == '\r'
    } else {
        |c: char| c == ' ' || c == '\t' || c == '\r'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn some_stops_at_mismatch() {
        let mut scanner = Scanner::new("height = 40\n");
        assert_eq!(scanner.some(|c| c.is_ascii_alphabetic()).as_str(), "height");
        scanner.skip_space(false);
        assert_eq!(scanner.expect_eq('=').unwrap(), '=');
        scanner.skip_space(false);
        assert_eq!(scanner.digits().as_str(), "40");
        assert_eq!(scanner.peek(), Some('\n'));
    }

    #[test]
    fn some_reaches_end_of_input() {
        let mut scanner = Scanner::new("abc");
        assert_eq!(scanner.rest_of_line().as_str(), "abc");
        assert!(scanner.is_empty());
    }

    #[test]
    fn delimited_requires_closing_quote_on_line() {
        let mut scanner = Scanner::new("hello' rest");
        assert_eq!(scanner.delimited('\'').unwrap().as_str(), "hello");
        assert_eq!(scanner.rest(), " rest");
        let mut scanner = Scanner::new("hello\n'");
        assert!(scanner.delimited('\'').is_err());
    }
}
