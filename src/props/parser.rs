//! `.properties` text grammar.
//!
//! Logical lines are built from natural lines (`\n`, `\r` or `\r\n`
//! terminated). A natural line ending in an odd number of backslashes
//! continues onto the next one, whose leading whitespace is dropped. Lines
//! whose first non-blank character is `#` or `!` are comments.
//!
//! Within a logical line the key runs up to the first unescaped `=`, `:` or
//! whitespace. Whitespace and at most one `=`/`:` are skipped before the
//! value. Both key and value are then unescaped (`\t \n \r \f \uXXXX`, and
//! `\x` for any other `x`).

use super::PropertyMapping;
use crate::error::ParseError;

const BLANKS: [char; 3] = [' ', '\t', '\x0c'];

/// Parse property file text into a mapping. Later keys replace earlier ones.
pub fn parse_properties(text: &str) -> Result<PropertyMapping, ParseError> {
    let mut mapping = PropertyMapping::new();
    for (line_no, logical) in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key, line_no)?;
        let value = unescape(raw_value, line_no)?;
        mapping.insert(key, value);
    }
    Ok(mapping)
}

/// Split text into natural lines, accepting any of the three terminators.
fn natural_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

/// Join continuations and drop comments and blank lines.
///
/// Each logical line is paired with the 1-based number of the natural line
/// it starts on. Escapes are left in place.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, natural) in natural_lines(text).into_iter().enumerate() {
        let trimmed = natural.trim_start_matches(BLANKS);
        let (line_no, mut buf) = match pending.take() {
            Some(open) => open,
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        if ends_with_odd_backslashes(trimmed) {
            buf.push_str(&trimmed[..trimmed.len() - 1]);
            pending = Some((line_no, buf));
        } else {
            buf.push_str(trimmed);
            out.push((line_no, buf));
        }
    }

    // Continuation at end of input: the dangling backslash is dropped.
    if let Some(open) = pending {
        out.push(open);
    }
    out
}

/// Locate the key/value boundary of a logical line, honoring escapes.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut preceding_backslash = false;

    for (i, c) in line.char_indices() {
        if !preceding_backslash {
            if c == '=' || c == ':' {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            if BLANKS.contains(&c) {
                key_end = i;
                value_start = i + c.len_utf8();
                break;
            }
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
    }

    let rest = &line[value_start..];
    let mut offset = rest.len();
    for (i, c) in rest.char_indices() {
        if BLANKS.contains(&c) {
            continue;
        }
        if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            continue;
        }
        offset = i;
        break;
    }

    (&line[..key_end], &rest[offset..])
}

/// Resolve backslash escapes.
fn unescape(raw: &str, line: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: a low surrogate escape must follow.
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut chars, line)?,
                        _ => return Err(ParseError::new(line, "unpaired surrogate in \\u escape")),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(ParseError::new(line, "unpaired surrogate in \\u escape"));
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    unit
                };
                match char::from_u32(decoded) {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(ParseError::new(line, "unpaired surrogate in \\u escape"));
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<u32, ParseError> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| ParseError::new(line, "malformed \\uxxxx encoding"))?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}
