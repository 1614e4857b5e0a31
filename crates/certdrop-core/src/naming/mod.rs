//! Filename modeling and collision-free allocation.
//!
//! A configured base filename such as `cert.json` is split into stem and
//! extension once; uploads are then stored as `cert_1.json`, `cert_2.json`, ...
//! choosing the first suffix whose path does not exist yet.

mod allocate;
mod split;

pub use allocate::allocate;
pub use split::TargetName;

/// Search bound used when the configuration does not override it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 9999;
