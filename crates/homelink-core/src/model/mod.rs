pub mod device;
pub mod raw;

pub use device::{DeviceSummary, SignalLevel, SignalQuality};
pub use raw::RawDevice;
