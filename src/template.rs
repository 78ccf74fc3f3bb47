//! `{}` placeholder rendering for [`BoundedString::format`](crate::BoundedString::format).
//!
//! Only the template is ever scanned for directives. Argument contents are
//! copied as opaque data, so a `%n` or `{}` inside an argument is output
//! verbatim.

use std::fmt::{self, Write};

use crate::error::{BufferError, Result};

/// A single value substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
    Char(char),
    Int(i64),
    UInt(u64),
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        FormatArg::Str(value)
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        FormatArg::Bytes(value)
    }
}

impl From<char> for FormatArg<'_> {
    fn from(value: char) -> Self {
        FormatArg::Char(value)
    }
}

impl From<i64> for FormatArg<'_> {
    fn from(value: i64) -> Self {
        FormatArg::Int(value)
    }
}

impl From<u64> for FormatArg<'_> {
    fn from(value: u64) -> Self {
        FormatArg::UInt(value)
    }
}

impl From<usize> for FormatArg<'_> {
    fn from(value: usize) -> Self {
        FormatArg::UInt(value as u64)
    }
}

/// Collects output up to `limit` bytes and keeps counting past it, so the
/// caller learns the full rendered size without anything being stored
/// beyond the limit.
struct Sink {
    out: Vec<u8>,
    limit: usize,
    required: usize,
}

impl Sink {
    fn push(&mut self, bytes: &[u8]) {
        self.required = self.required.saturating_add(bytes.len());
        if self.required <= self.limit {
            self.out.extend_from_slice(bytes);
        }
    }
}

impl Write for Sink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s.as_bytes());
        Ok(())
    }
}

/// Renders `template` with `args`, failing with `Truncated` when the output
/// would be longer than `limit`.
pub(crate) fn render(template: &str, args: &[FormatArg<'_>], limit: usize) -> Result<Vec<u8>> {
    let bytes = template.as_bytes();
    let mut sink = Sink {
        out: Vec::with_capacity(limit.min(template.len())),
        limit,
        required: 0,
    };
    let mut args_iter = args.iter();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1).copied()) {
            (b'{', Some(b'{')) | (b'}', Some(b'}')) => {
                sink.push(&bytes[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            (b'{', Some(b'}')) => {
                sink.push(&bytes[literal_start..i]);
                let arg = args_iter
                    .next()
                    .ok_or(BufferError::InvalidTemplate("not enough arguments for placeholders"))?;
                write_arg(&mut sink, arg);
                i += 2;
                literal_start = i;
            }
            (b'{', _) => return Err(BufferError::InvalidTemplate("unmatched '{'")),
            (b'}', _) => return Err(BufferError::InvalidTemplate("unmatched '}'")),
            _ => i += 1,
        }
    }
    sink.push(&bytes[literal_start..]);

    if args_iter.next().is_some() {
        return Err(BufferError::InvalidTemplate("more arguments than placeholders"));
    }
    if sink.required > limit {
        return Err(BufferError::Truncated {
            required: sink.required,
            capacity: limit,
        });
    }
    Ok(sink.out)
}

fn write_arg(sink: &mut Sink, arg: &FormatArg<'_>) {
    match *arg {
        FormatArg::Str(s) => sink.push(s.as_bytes()),
        FormatArg::Bytes(b) => sink.push(b),
        FormatArg::Char(c) => sink.push(c.encode_utf8(&mut [0u8; 4]).as_bytes()),
        // Sink::write_str never fails
        FormatArg::Int(n) => {
            let _ = write!(sink, "{}", n);
        }
        FormatArg::UInt(n) => {
            let _ = write!(sink, "{}", n);
        }
    }
}
