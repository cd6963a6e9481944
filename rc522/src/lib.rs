// rc522/src/lib.rs

//! rc522
//!
//! Pure Rust driver for the NXP MFRC522 contactless reader IC: register
//! transport over a chip-select gated byte channel, the command/IRQ engine,
//! ISO/IEC 14443-3 type A anticollision and selection, and MIFARE Classic /
//! Ultralight memory operations.

pub mod card;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
