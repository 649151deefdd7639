//! Utility modules shared by the engine and the driver.

pub mod errors;
pub mod logger;

pub use errors::{MirrorError, Result};
