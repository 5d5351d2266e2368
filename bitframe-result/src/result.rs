use crate::error::Error;

/// Result alias used across the bitframe crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;
