//! Backlight callbacks for the OTM3201A.
//!
//! The panel's brightness is not wired to any register here. The callbacks
//! report success and hand back the stored value.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::Result;
use tracing::debug;

/// Brightness values the backlight core passes to `update_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BacklightProperties {
    pub brightness: u32,
    pub max_brightness: u32,
}

/// Framebuffer the backlight core asks about in `check_fb`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FbInfo {
    pub id: String,
}

/// Backlight callback set.
pub trait BacklightOps {
    /// Applies `props` to the hardware.
    fn update_status(&self, props: &BacklightProperties) -> Result<()>;

    /// Returns the current brightness.
    fn get_brightness(&self) -> u32;

    /// Returns true if this backlight belongs to `fb`.
    fn check_fb(&self, fb: &FbInfo) -> bool;
}

/// Backlight state owned by one panel instance.
#[derive(Debug, Default)]
pub struct Backlight {
    brightness: AtomicU32,
}

impl Backlight {
    /// Creates a backlight with brightness 0.
    pub const fn new() -> Self {
        Self {
            brightness: AtomicU32::new(0),
        }
    }
}

impl BacklightOps for Backlight {
    fn update_status(&self, props: &BacklightProperties) -> Result<()> {
        // No brightness register is known for this panel; nothing is applied
        // and the stored value is left alone.
        debug!(
            "Backlight update requested: {}/{} (ignored)",
            props.brightness, props.max_brightness
        );
        Ok(())
    }

    fn get_brightness(&self) -> u32 {
        self.brightness.load(Ordering::Relaxed)
    }

    fn check_fb(&self, _fb: &FbInfo) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_brightness() {
        assert_eq!(Backlight::new().get_brightness(), 0);
    }

    #[test]
    fn test_update_status_does_not_store() {
        let bl = Backlight::new();
        let props = BacklightProperties {
            brightness: 200,
            max_brightness: 255,
        };
        assert!(bl.update_status(&props).is_ok());
        assert_eq!(bl.get_brightness(), 0);
    }

    #[test]
    fn test_check_fb_always_matches() {
        let bl = Backlight::new();
        assert!(bl.check_fb(&FbInfo::default()));
        assert!(bl.check_fb(&FbInfo {
            id: "mxc_elcdif_fb".to_string()
        }));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Backlight::new();
        let b = Backlight::new();
        a.brightness.store(7, Ordering::Relaxed);
        assert_eq!(a.get_brightness(), 7);
        assert_eq!(b.get_brightness(), 0);
    }
}
