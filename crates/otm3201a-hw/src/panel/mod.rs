//! Panel module.
//!
//! Init sequence, video mode and driver entry points for the Truly
//! OTM3201A 320x320 DSI panel.

mod driver;
mod sequence;

pub mod mode;

pub use driver::{find_panel, Otm3201a, PanelDriver, PANEL_NAMES};
pub use mode::{
    lcd_config, lcd_videomode, video_modes, DpiFormat, LcdConfig, SyncFlags, VMode, VideoMode,
};
pub use sequence::{
    lcd_setup, InitStep, EXIT_SLEEP_MODE, INIT_SEQUENCE, POWER_ON_DELAY_MS, SET_ADDRESS_MODE,
    SET_DISPLAY_ON,
};
