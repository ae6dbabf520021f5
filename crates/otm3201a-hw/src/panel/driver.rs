//! Panel driver entry points used by the DSI framebuffer core.

use embedded_hal::delay::DelayNs;
use tracing::debug;

use crate::backlight::{Backlight, BacklightOps};
use crate::dsi::DsiTransport;
use crate::{Error, Result};

use super::mode::{lcd_videomode, LcdConfig, VideoMode};
use super::sequence::lcd_setup;

/// Callbacks a DSI panel driver provides to the framebuffer core.
pub trait PanelDriver {
    /// Mode name the framebuffer core matches on.
    fn name(&self) -> &'static str;

    /// Supported modes and link configuration.
    fn lcd_videomode(&self) -> (&'static [VideoMode], &'static LcdConfig);

    /// Brings the panel up over `transport`.
    fn lcd_setup(&self, transport: &mut dyn DsiTransport, delay: &mut dyn DelayNs) -> Result<()>;

    /// Backlight callbacks for this panel.
    fn backlight(&self) -> &dyn BacklightOps;
}

/// Truly OTM3201A 320x320 panel.
#[derive(Debug, Default)]
pub struct Otm3201a {
    backlight: Backlight,
}

impl Otm3201a {
    /// Mode name of the panel.
    pub const NAME: &'static str = "TRULY-WVGA";

    /// Creates a driver instance with its own backlight state.
    pub const fn new() -> Self {
        Self {
            backlight: Backlight::new(),
        }
    }
}

impl PanelDriver for Otm3201a {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn lcd_videomode(&self) -> (&'static [VideoMode], &'static LcdConfig) {
        lcd_videomode()
    }

    fn lcd_setup(&self, transport: &mut dyn DsiTransport, delay: &mut dyn DelayNs) -> Result<()> {
        lcd_setup(transport, delay)
    }

    fn backlight(&self) -> &dyn BacklightOps {
        &self.backlight
    }
}

/// Names of all known panels.
pub const PANEL_NAMES: &[&str] = &[Otm3201a::NAME];

/// Creates the driver registered under `name`.
pub fn find_panel(name: &str) -> Result<Box<dyn PanelDriver>> {
    match name {
        Otm3201a::NAME => {
            debug!("Matched panel driver for {}", name);
            Ok(Box::new(Otm3201a::new()))
        }
        _ => Err(Error::UnknownPanel(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_panel() {
        let panel = find_panel("TRULY-WVGA").unwrap();
        assert_eq!(panel.name(), "TRULY-WVGA");
        let (modes, _) = panel.lcd_videomode();
        assert_eq!(modes[0].name, panel.name());
    }

    #[test]
    fn test_unknown_panel() {
        assert_eq!(
            find_panel("HX8369").err(),
            Some(Error::UnknownPanel("HX8369".to_string()))
        );
    }

    #[test]
    fn test_panel_names_resolve() {
        for name in PANEL_NAMES {
            assert!(find_panel(name).is_ok());
        }
    }
}
