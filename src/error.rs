use thiserror::Error;

/// Every way a buffer operation can be rejected.
///
/// None of these leave the buffer in a partially written state: the
/// operation that produced the error did not touch the storage.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("invalid capacity {requested} (must be between 1 and {max})")]
    InvalidCapacity { requested: usize, max: usize },

    #[error("size computation overflowed or exceeded the limit of {limit} bytes")]
    SizeOverflow { limit: usize },

    #[error("{required} bytes do not fit in a buffer of capacity {capacity}")]
    Truncated { required: usize, capacity: usize },

    #[error("insufficient space: needed {needed} bytes, {available} available")]
    InsufficientSpace { needed: usize, available: usize },

    #[error("input line exceeds {limit} bytes ({consumed} bytes consumed from the source)")]
    InputTooLong { limit: usize, consumed: usize },

    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("invalid template: {0}")]
    InvalidTemplate(&'static str),

    #[error("buffer content is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("read from line source failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BufferError>;
