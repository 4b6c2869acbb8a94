//! # JSON Encoding
//!
//! Responses are serialised with `serde_json` through [`EscapingFormatter`],
//! a compact formatter that additionally escapes characters that render
//! invisibly or look like ASCII:
//!
//! - U+0080 to U+00A0 (C1 controls and no-break space)
//! - U+2000 to U+2100 (typographic spaces, joiners, quotes, marks)
//!
//! These are written as `\uXXXX` with lowercase hex. Quote, backslash and
//! C0 controls use the standard JSON escapes.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;

use super::errors::{CodecError, CodecResult};

/// Whether `c` must be written as a `\u` escape on top of standard JSON.
pub fn is_confusable(c: char) -> bool {
    matches!(c, '\u{0080}'..='\u{00a0}' | '\u{2000}'..='\u{2100}')
}

/// Compact JSON formatter escaping confusable characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscapingFormatter;

impl Formatter for EscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if is_confusable(c) {
                writer.write_all(fragment[start..index].as_bytes())?;
                write!(writer, "\\u{:04x}", c as u32)?;
                start = index + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialise `value` as compact JSON with confusable escaping.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CodecResult<String> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, EscapingFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Quote a single string as a JSON string literal.
pub fn quote(s: &str) -> CodecResult<String> {
    to_json(s)
}
