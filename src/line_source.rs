//! Input side of [`BoundedString::read_line`](crate::BoundedString::read_line).

use std::io::{self, BufRead};

use crate::error::{BufferError, Result};

/// A byte source a bounded line can be read from.
///
/// `peek_bytes` exposes whatever is currently available without consuming
/// it (an empty slice means end-of-input), and `advance` consumes a prefix
/// of that. This lets a reader stop exactly at a terminator or a size cap
/// without taking anything past it.
pub trait LineSource {
    fn peek_bytes(&mut self) -> io::Result<&[u8]>;
    fn advance(&mut self, amount: usize);
}

impl<R: BufRead + ?Sized> LineSource for R {
    fn peek_bytes(&mut self) -> io::Result<&[u8]> {
        self.fill_buf()
    }

    fn advance(&mut self, amount: usize) {
        self.consume(amount);
    }
}

/// Reads one `\n`-terminated line of at most `limit` bytes.
///
/// The terminator (and a `\r` right before it) is consumed but not
/// returned. When the cap is hit with more line data pending the call fails
/// with `InputTooLong`; everything read so far has been consumed from the
/// source and is reported in the error.
pub(crate) fn read_bounded_line<S>(source: &mut S, limit: usize) -> Result<Vec<u8>>
where
    S: LineSource + ?Sized,
{
    let mut line = Vec::with_capacity(limit.min(256));
    let mut consumed = 0usize;
    let mut terminated = false;

    loop {
        let available = match source.peek_bytes() {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if available.is_empty() {
            break;
        }

        let room = limit - line.len();
        let window = &available[..available.len().min(room)];
        if let Some(pos) = window.iter().position(|&b| b == b'\n') {
            line.extend_from_slice(&window[..pos]);
            source.advance(pos + 1);
            consumed += pos + 1;
            terminated = true;
            break;
        }

        let taken = window.len();
        line.extend_from_slice(window);
        source.advance(taken);
        consumed += taken;

        if line.len() == limit {
            // at the cap: only a terminator or end-of-input may follow
            let next = loop {
                match source.peek_bytes() {
                    Ok(bytes) => break bytes.first().copied(),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            match next {
                None => break,
                Some(b'\n') => {
                    source.advance(1);
                    terminated = true;
                    break;
                }
                Some(_) => return Err(BufferError::InputTooLong { limit, consumed }),
            }
        }
    }

    if terminated && line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(line)
}
