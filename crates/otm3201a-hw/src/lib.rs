//! OTM3201A Panel Hardware Library
//!
//! Bring-up code for the Truly OTM3201A 320x320 MIPI-DSI panel: the vendor
//! register sequence, the video mode handed to the framebuffer core and the
//! backlight callbacks. The DSI packet transport is supplied by the caller.

pub mod backlight;
pub mod capture;
pub mod dsi;
pub mod error;
pub mod panel;

pub use backlight::{Backlight, BacklightOps};
pub use capture::{CaptureTransport, NoDelay, StdDelay};
pub use dsi::{Command, CommandBuffer, DsiTransport, PacketType};
pub use error::{Error, Result};
pub use panel::{find_panel, lcd_setup, Otm3201a, PanelDriver};

/// Panel resolution.
pub const LCD_WIDTH: u32 = 320;
pub const LCD_HEIGHT: u32 = 320;
