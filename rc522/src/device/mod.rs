// rc522/src/device/mod.rs

pub mod builder;
pub mod communicate;
pub mod config;
pub mod crc;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod handle;
pub mod registers;

pub use builder::DeviceBuilder;
pub use communicate::{Response, TransceiveRequest};
pub use config::Config;
pub use handle::{Device, Initialized, Uninitialized};
pub use registers::{PcdCommand, Register};
