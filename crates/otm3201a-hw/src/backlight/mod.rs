//! Backlight module.
//!
//! Stub callbacks handed to the host backlight core.

mod device;

pub use device::{Backlight, BacklightOps, BacklightProperties, FbInfo};
