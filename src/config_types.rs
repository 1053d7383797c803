use crate::bar::SourceKind;
use crate::cfg::error::{value_error, Error};
use crate::cfg::parse::{most_similar, Value};
use crate::cfg::scanner::Scanner;
use crate::color::Color;

trait IsUint {}
impl IsUint for u16 {}
impl IsUint for u32 {}
impl IsUint for u64 {}

impl<T> Value for T
where
    T: IsUint + std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    fn parse(scanner: &mut Scanner) -> Result<Self, Error> {
        let digits = scanner.digits();
        digits
            .parse::<T>()
            .map_err(|e| value_error("invalid number value", format!("{e}")))
    }
}

impl Value for String {
    fn parse(scanner: &mut Scanner) -> Result<Self, Error> {
        let delim = match scanner.next() {
            Some(delim @ ('"' | '\'')) => delim,
            _ => return Err(value_error("invalid string value", "expected `\"` or `'`")),
        };
        Ok(scanner.delimited(delim)?.to_string())
    }
}

impl Value for Color {
    fn parse(scanner: &mut Scanner) -> Result<Self, Error> {
        if scanner.next_if(|c| c == '#').is_none() {
            return Err(
                value_error("invalid color value", "expected color")
                    .with_help("valid formats are `#RRGGBB` and `#RRGGBBAA`"),
            );
        }
        let hex_chars = scanner.some(|c| c.is_ascii_hexdigit());
        if hex_chars.len() != 6 && hex_chars.len() != 8 {
            return Err(value_error(
                "invalid hex color",
                "expected `#RRGGBB` or `#RRGGBBAA`",
            ));
        }
        let value = u32::from_str_radix(&hex_chars, 16)
            .map_err(|e| value_error("invalid hex color", format!("{e}")))?;
        Ok(if hex_chars.len() == 6 {
            Color::from_rgb_hex(value)
        } else {
            let alpha = (value & 0xFF) as f64 / 255.0;
            Color {
                alpha,
                ..Color::from_rgb_hex(value >> 8)
            }
        })
    }
}

impl Value for SourceKind {
    fn parse(scanner: &mut Scanner) -> Result<Self, Error> {
        let name = if scanner.starts_with("'") || scanner.starts_with("\"") {
            String::parse(scanner)?
        } else {
            scanner.some(|c| c.is_ascii_alphabetic()).to_string()
        };
        SourceKind::from_name(&name).ok_or_else(|| {
            let mut error = value_error(
                format!("no such source: {name}"),
                format!("valid sources are: {}", SourceKind::NAMES.join(", ")),
            );
            if let Some(similar) = most_similar(&name, SourceKind::NAMES.iter().cloned()) {
                error = error.with_help(format!("a source with a similar name exists: `{similar}`"));
            }
            error
        })
    }
}
