//! Small helpers shared across the crate: hex formatting for log output
//! and the iteration budget used by every busy-wait loop.

pub mod hex;
pub mod timeout;

pub use self::hex::*;
pub use self::timeout::*;
