//! Fixed-capacity byte buffers whose writes can never leave their storage.
//!
//! [`BoundedString`] replaces the unchecked C string routines: copy, append,
//! formatted write, line input and indexed write all validate against the
//! capacity first and report an explicit [`BufferError`] instead of writing
//! out of bounds.

pub mod bounded_string;
pub mod checked_size;
pub mod config;
pub mod error;
pub mod line_source;
pub mod memory_safety_demos;
pub mod template;

pub use bounded_string::{BoundedString, Truncation};
pub use config::BufferLimits;
pub use error::{BufferError, Result};
pub use line_source::LineSource;
pub use template::FormatArg;
