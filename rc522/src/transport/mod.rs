// rc522/src/transport/mod.rs

#[cfg(feature = "hal")]
pub mod hal;
pub mod mock;
pub mod traits;

#[cfg(feature = "hal")]
pub use hal::HalTransport;
pub use mock::{MockTransport, RfField, RfReply};
pub use traits::{ChipSelect, Transport};
