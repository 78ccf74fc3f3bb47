use std::fmt;

use log::{debug, warn};

use crate::checked_size::checked_mul;
use crate::config::BufferLimits;
use crate::error::{BufferError, Result};
use crate::line_source::{LineSource, read_bounded_line};
use crate::template::{FormatArg, render};

/// Outcome of the opt-in lossy copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub copied: usize,
    pub dropped: usize,
}

/// Fixed-capacity byte buffer.
///
/// Writes never go past `capacity`. The truncation policy is
/// reject-and-preserve: `assign`, `append`, `format` and `read_line` either
/// store their whole input or fail and leave the buffer exactly as it was.
/// Only [`assign_truncating`](Self::assign_truncating) and
/// [`append_truncating`](Self::append_truncating) drop bytes, and they say
/// how many.
///
/// Not thread-safe without external synchronization; every mutating call
/// takes `&mut self`.
pub struct BoundedString {
    data: Box<[u8]>,
    len: usize,
}

impl BoundedString {
    /// Creates an empty buffer under the default [`BufferLimits`].
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_limits(capacity, &BufferLimits::default())
    }

    pub fn with_limits(capacity: usize, limits: &BufferLimits) -> Result<Self> {
        if capacity == 0 || capacity > limits.max_capacity {
            warn!(
                "rejected buffer capacity {} (max {})",
                capacity, limits.max_capacity
            );
            return Err(BufferError::InvalidCapacity {
                requested: capacity,
                max: limits.max_capacity,
            });
        }

        Ok(Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        })
    }

    /// Creates a buffer of `count * element_size` bytes, checking the
    /// multiplication against the limit before anything is allocated.
    pub fn with_scaled_capacity(
        count: usize,
        element_size: usize,
        limits: &BufferLimits,
    ) -> Result<Self> {
        let capacity = checked_mul(count, element_size, limits.max_capacity).inspect_err(|_| {
            warn!(
                "size {} * {} rejected (max {})",
                count, element_size, limits.max_capacity
            );
        })?;
        Self::with_limits(capacity, limits)
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Bytes still free after the current content.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn as_str(&self) -> Result<&str> {
        Ok(std::str::from_utf8(self.as_bytes())?)
    }

    /// Bounds-checked read of a byte inside the current content.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    pub fn clear(&mut self) {
        self.set_len(0);
    }

    /// Replaces the content with `source`.
    ///
    /// Fails with `Truncated` if `source` is longer than the capacity.
    pub fn assign(&mut self, source: &[u8]) -> Result<()> {
        if source.len() > self.capacity() {
            warn!(
                "assign rejected: {} bytes into capacity {}",
                source.len(),
                self.capacity()
            );
            return Err(BufferError::Truncated {
                required: source.len(),
                capacity: self.capacity(),
            });
        }

        self.replace(source);
        debug!("assigned {} bytes", source.len());
        Ok(())
    }

    /// Appends `source` if all of it fits.
    ///
    /// Fails with `InsufficientSpace` otherwise; nothing is copied.
    pub fn append(&mut self, source: &[u8]) -> Result<()> {
        let available = self.remaining();
        if source.len() > available {
            warn!(
                "append rejected: needed {} bytes, {} available",
                source.len(),
                available
            );
            return Err(BufferError::InsufficientSpace {
                needed: source.len(),
                available,
            });
        }

        let end = self.len + source.len();
        self.data[self.len..end].copy_from_slice(source);
        self.len = end;
        debug!("appended {} bytes, length now {}", source.len(), self.len);
        Ok(())
    }

    /// Copies as much of `source` as fits, like `strlcpy`.
    pub fn assign_truncating(&mut self, source: &[u8]) -> Truncation {
        let copied = source.len().min(self.capacity());
        self.replace(&source[..copied]);
        self.truncation(copied, source.len())
    }

    /// Appends as much of `source` as fits, like `strlcat`.
    pub fn append_truncating(&mut self, source: &[u8]) -> Truncation {
        let copied = source.len().min(self.remaining());
        let end = self.len + copied;
        self.data[self.len..end].copy_from_slice(&source[..copied]);
        self.len = end;
        self.truncation(copied, source.len())
    }

    /// Renders `template` with `args` into the buffer, replacing its content.
    ///
    /// Each `{}` takes the next argument; `{{` and `}}` are literal braces.
    /// The template must be a `'static` string, so it can never come from
    /// runtime input. Arguments are copied as plain data.
    pub fn format(&mut self, template: &'static str, args: &[FormatArg<'_>]) -> Result<()> {
        let rendered = render(template, args, self.capacity()).inspect_err(|e| {
            warn!("format rejected: {}", e);
        })?;
        self.replace(&rendered);
        debug!("formatted {} bytes", rendered.len());
        Ok(())
    }

    /// Reads one line of at most `min(capacity, max_bytes)` bytes from
    /// `source`, replacing the content. Returns the number of bytes stored.
    pub fn read_line<S>(&mut self, source: &mut S, max_bytes: usize) -> Result<usize>
    where
        S: LineSource + ?Sized,
    {
        let limit = self.capacity().min(max_bytes);
        let line = read_bounded_line(source, limit).inspect_err(|e| {
            warn!("read_line rejected: {}", e);
        })?;
        self.replace(&line);
        debug!("read line of {} bytes", line.len());
        Ok(line.len())
    }

    /// Writes `byte` at `index`.
    ///
    /// `index` must be below the capacity. Writing at or past the current
    /// length extends the content to `index + 1`; any gap reads as zero.
    pub fn indexed_write(&mut self, index: usize, byte: u8) -> Result<()> {
        if index >= self.capacity() {
            warn!(
                "indexed write rejected: index {} with capacity {}",
                index,
                self.capacity()
            );
            return Err(BufferError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }

        self.data[index] = byte;
        if index >= self.len {
            self.len = index + 1;
        }
        Ok(())
    }

    fn replace(&mut self, source: &[u8]) {
        self.data[..source.len()].copy_from_slice(source);
        self.set_len(source.len());
    }

    // Zeroes whatever falls out of the content so later growth through
    // indexed_write never exposes stale bytes.
    fn set_len(&mut self, len: usize) {
        if len < self.len {
            self.data[len..self.len].fill(0);
        }
        self.len = len;
    }

    fn truncation(&self, copied: usize, total: usize) -> Truncation {
        let dropped = total - copied;
        if dropped > 0 {
            warn!("truncated {} of {} bytes", dropped, total);
        }
        Truncation { copied, dropped }
    }
}

impl fmt::Debug for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedString")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("content", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_zero_and_oversize() {
        assert!(matches!(
            BoundedString::new(0),
            Err(BufferError::InvalidCapacity { requested: 0, .. })
        ));

        let limits = BufferLimits::new(16);
        assert!(BoundedString::with_limits(16, &limits).is_ok());
        assert!(matches!(
            BoundedString::with_limits(17, &limits),
            Err(BufferError::InvalidCapacity { requested: 17, max: 16 })
        ));
    }

    #[test]
    fn scaled_capacity_fails_closed() {
        let limits = BufferLimits::new(100);
        let b = BoundedString::with_scaled_capacity(50, 2, &limits).unwrap();
        assert_eq!(b.capacity(), 100);

        assert!(matches!(
            BoundedString::with_scaled_capacity(usize::MAX / 2 + 1, 2, &limits),
            Err(BufferError::SizeOverflow { limit: 100 })
        ));
        assert!(matches!(
            BoundedString::with_scaled_capacity(0, 2, &limits),
            Err(BufferError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn assign_then_append_too_much() {
        let mut b = BoundedString::new(10).unwrap();
        b.assign(b"hello").unwrap();
        assert_eq!(b.len(), 5);
        assert_eq!(b.as_bytes(), b"hello");

        let err = b.append(b"world!").unwrap_err();
        assert!(matches!(err, BufferError::InsufficientSpace { needed: 6, available: 5 }));
        assert_eq!(b.as_bytes(), b"hello");
    }

    #[test]
    fn assign_exact_then_over() {
        let mut b = BoundedString::new(5).unwrap();
        b.assign(b"hello").unwrap();
        assert!(b.is_full());

        let err = b.assign(b"hello!").unwrap_err();
        assert!(matches!(err, BufferError::Truncated { required: 6, capacity: 5 }));
        assert_eq!(b.as_str().unwrap(), "hello");
    }

    #[test]
    fn append_until_full() {
        let mut b = BoundedString::new(4).unwrap();
        b.append(b"ab").unwrap();
        b.append(b"cd").unwrap();
        assert!(b.is_full());
        assert!(matches!(
            b.append(b"e"),
            Err(BufferError::InsufficientSpace { needed: 1, available: 0 })
        ));
        assert_eq!(b.as_bytes(), b"abcd");
        // an empty append always fits
        b.append(b"").unwrap();
    }

    #[test]
    fn truncating_variants_report_dropped() {
        let mut b = BoundedString::new(4).unwrap();
        assert_eq!(
            b.assign_truncating(b"abcdef"),
            Truncation { copied: 4, dropped: 2 }
        );
        assert_eq!(b.as_bytes(), b"abcd");

        b.assign(b"ab").unwrap();
        assert_eq!(
            b.append_truncating(b"xyz"),
            Truncation { copied: 2, dropped: 1 }
        );
        assert_eq!(b.as_bytes(), b"abxy");
    }

    #[test]
    fn format_replaces_content() {
        let mut b = BoundedString::new(32).unwrap();
        b.assign(b"old").unwrap();
        b.format("{} = {}", &["x".into(), FormatArg::Int(3)]).unwrap();
        assert_eq!(b.as_str().unwrap(), "x = 3");
    }

    #[test]
    fn format_exact_fit_and_overflow() {
        let mut b = BoundedString::new(8).unwrap();
        b.format("id:{}", &["abcde".into()]).unwrap();
        assert!(b.is_full());
        assert_eq!(b.as_bytes(), b"id:abcde");

        let err = b.format("id:{}", &["abcdef".into()]).unwrap_err();
        assert!(matches!(err, BufferError::Truncated { required: 9, capacity: 8 }));
        assert_eq!(b.as_bytes(), b"id:abcde");
    }

    #[test]
    fn format_bad_template_leaves_buffer() {
        let mut b = BoundedString::new(8).unwrap();
        b.assign(b"keep").unwrap();
        assert!(matches!(
            b.format("{} {}", &["a".into()]),
            Err(BufferError::InvalidTemplate(_))
        ));
        assert_eq!(b.as_bytes(), b"keep");
    }

    #[test]
    fn read_line_respects_both_caps() {
        let mut b = BoundedString::new(8).unwrap();
        let mut input: &[u8] = b"name\n";
        assert_eq!(b.read_line(&mut input, 100).unwrap(), 4);
        assert_eq!(b.as_bytes(), b"name");

        let mut input: &[u8] = b"abcdef\n";
        assert!(matches!(
            b.read_line(&mut input, 3),
            Err(BufferError::InputTooLong { limit: 3, consumed: 3 })
        ));
        assert_eq!(b.as_bytes(), b"name");

        let mut input: &[u8] = b"123456789\n";
        assert!(matches!(
            b.read_line(&mut input, 100),
            Err(BufferError::InputTooLong { limit: 8, .. })
        ));
    }

    #[test]
    fn read_line_surfaces_io_errors() {
        struct Broken;
        impl LineSource for Broken {
            fn peek_bytes(&mut self) -> std::io::Result<&[u8]> {
                Err(std::io::Error::other("device gone"))
            }
            fn advance(&mut self, _amount: usize) {}
        }

        let mut b = BoundedString::new(8).unwrap();
        assert!(matches!(b.read_line(&mut Broken, 8), Err(BufferError::Io(_))));
    }

    #[test]
    fn indexed_write_bounds() {
        let mut b = BoundedString::new(10).unwrap();
        assert!(matches!(
            b.indexed_write(10, b'x'),
            Err(BufferError::IndexOutOfRange { index: 10, capacity: 10 })
        ));
        assert!(b.is_empty());

        b.indexed_write(9, b'z').unwrap();
        assert_eq!(b.len(), 10);
        assert_eq!(b.get(0), Some(0));
        assert_eq!(b.get(9), Some(b'z'));
        assert_eq!(b.get(10), None);
    }

    #[test]
    fn shrinking_zeroes_the_tail() {
        let mut b = BoundedString::new(6).unwrap();
        b.assign(b"secret").unwrap();
        b.assign(b"ab").unwrap();
        b.indexed_write(5, b'!').unwrap();
        assert_eq!(b.as_bytes(), b"ab\0\0\0!");

        b.clear();
        assert!(b.is_empty());
        b.indexed_write(1, b'x').unwrap();
        assert_eq!(b.as_bytes(), b"\0x");
    }

    #[test]
    fn display_and_debug() {
        let mut b = BoundedString::new(8).unwrap();
        b.assign(b"hi").unwrap();
        assert_eq!(b.to_string(), "hi");
        assert_eq!(
            format!("{:?}", b),
            r#"BoundedString { len: 2, capacity: 8, content: "hi" }"#
        );
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut b = BoundedString::new(4).unwrap();
        b.assign(&[0xff, 0xfe]).unwrap();
        assert!(matches!(b.as_str(), Err(BufferError::Utf8(_))));
    }
}
