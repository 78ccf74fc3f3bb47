// Allocation size arithmetic. Every result is checked against an explicit
// limit before it can reach an allocator, so `size * 2` style requests fail
// closed instead of wrapping to a small number.

use crate::error::{BufferError, Result};

pub fn checked_mul(a: usize, b: usize, limit: usize) -> Result<usize> {
    match a.checked_mul(b) {
        Some(size) if size <= limit => Ok(size),
        _ => Err(BufferError::SizeOverflow { limit }),
    }
}

pub fn checked_add(a: usize, b: usize, limit: usize) -> Result<usize> {
    match a.checked_add(b) {
        Some(size) if size <= limit => Ok(size),
        _ => Err(BufferError::SizeOverflow { limit }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_limit() {
        assert_eq!(checked_mul(50, 2, 100).unwrap(), 100);
        assert_eq!(checked_add(99, 1, 100).unwrap(), 100);
    }

    #[test]
    fn over_limit() {
        assert!(matches!(
            checked_mul(51, 2, 100),
            Err(BufferError::SizeOverflow { limit: 100 })
        ));
        assert!(matches!(checked_add(100, 1, 100), Err(BufferError::SizeOverflow { .. })));
    }

    #[test]
    fn wraparound_is_rejected() {
        // u32::MAX * 2 wraps in 32-bit C arithmetic; here it can never wrap.
        assert!(checked_mul(usize::MAX, 2, usize::MAX).is_err());
        assert!(checked_add(usize::MAX, 1, usize::MAX).is_err());
    }
}
