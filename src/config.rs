use log::warn;

/// Environment variable overriding [`BufferLimits::max_capacity`].
pub const MAX_CAPACITY_ENV: &str = "BOUNDED_BUFFER_MAX_CAPACITY";

/// Largest capacity accepted when nothing else is configured (1 MiB).
pub const DEFAULT_MAX_CAPACITY: usize = 1024 * 1024;

/// Upper bounds applied when buffers are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    pub max_capacity: usize,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl BufferLimits {
    pub fn new(max_capacity: usize) -> Self {
        Self { max_capacity }
    }

    /// Reads `BOUNDED_BUFFER_MAX_CAPACITY`, falling back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(MAX_CAPACITY_ENV) else {
            return Self::default();
        };

        match raw.trim().parse::<usize>() {
            Ok(max) if max > 0 => Self::new(max),
            _ => {
                warn!(
                    "ignoring {}={:?}, using default of {} bytes",
                    MAX_CAPACITY_ENV, raw, DEFAULT_MAX_CAPACITY
                );
                Self::default()
            }
        }
    }
}
