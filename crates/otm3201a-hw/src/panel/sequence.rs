//! Power-on register sequence.

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info};

use crate::dsi::{write_and_check, Command, CommandBuffer, DsiTransport};
use crate::Result;

/// DCS: set address mode (MADCTL).
pub const SET_ADDRESS_MODE: u8 = 0x36;
/// DCS: exit sleep mode.
pub const EXIT_SLEEP_MODE: u8 = 0x11;
/// DCS: set display on.
pub const SET_DISPLAY_ON: u8 = 0x29;

/// Settle time after the sleep-out and display-on commands.
pub const POWER_ON_DELAY_MS: u32 = 100;

/// One entry of the init table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitStep {
    pub command: Command<'static>,
    /// Blocking wait after the write succeeds.
    pub delay_ms: Option<u32>,
}

impl InitStep {
    const fn write(address: u8, params: &'static [u8]) -> Self {
        Self {
            command: Command::new(address, params),
            delay_ms: None,
        }
    }

    const fn write_then_wait(address: u8, params: &'static [u8], delay_ms: u32) -> Self {
        Self {
            command: Command::new(address, params),
            delay_ms: Some(delay_ms),
        }
    }
}

/// Vendor init table, executed top to bottom.
pub const INIT_SEQUENCE: &[InitStep] = &[
    // Unlock vendor command set
    InitStep::write(0xF0, &[0x54, 0x47]),
    InitStep::write(0xA0, &[0x00]),
    InitStep::write(0xB1, &[0x22]),
    InitStep::write(0xB3, &[0x02, 0x0A, 0x1A, 0x2A, 0x2A]),
    InitStep::write(0xBD, &[0x00, 0x11, 0x31]),
    InitStep::write(0xBA, &[0x05, 0x15, 0x2B, 0x01]),
    InitStep::write(0xE9, &[0x46]),
    InitStep::write(0xE2, &[0xF5]),
    InitStep::write(0xB5, &[0x45, 0x73, 0x7A, 0xFA]),
    // Gamma tables
    InitStep::write(
        0xC0,
        &[
            0x00, 0x01, 0x09, 0x12, 0x17, 0x27, 0x0C, 0x0A, 0x0E, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(
        0xC1,
        &[
            0x00, 0x00, 0x08, 0x12, 0x16, 0x27, 0x0C, 0x0A, 0x04, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(
        0xC2,
        &[
            0x00, 0x01, 0x09, 0x12, 0x17, 0x27, 0x0C, 0x0A, 0x0E, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(
        0xC3,
        &[
            0x00, 0x00, 0x08, 0x12, 0x16, 0x27, 0x0C, 0x0A, 0x04, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(
        0xC4,
        &[
            0x00, 0x01, 0x09, 0x12, 0x17, 0x27, 0x0C, 0x0A, 0x0E, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(
        0xC5,
        &[
            0x00, 0x00, 0x08, 0x12, 0x16, 0x27, 0x0C, 0x0A, 0x04, 0x0D, 0x0B, 0x2D, 0x0D, 0x11,
            0x25, 0x2A, 0x3F,
        ],
    ),
    InitStep::write(SET_ADDRESS_MODE, &[0x00]),
    InitStep::write_then_wait(EXIT_SLEEP_MODE, &[], POWER_ON_DELAY_MS),
    InitStep::write_then_wait(SET_DISPLAY_ON, &[], POWER_ON_DELAY_MS),
];

/// Runs the power-on sequence.
///
/// Stops at the first rejected write and returns its error; later commands
/// are not sent and nothing is rolled back.
pub fn lcd_setup<T, D>(transport: &mut T, delay: &mut D) -> Result<()>
where
    T: DsiTransport + ?Sized,
    D: DelayNs + ?Sized,
{
    debug!("MIPI DSI LCD setup ({} steps)", INIT_SEQUENCE.len());

    let mut buffer = CommandBuffer::new();

    for (index, step) in INIT_SEQUENCE.iter().enumerate() {
        let packet = buffer.pack(&step.command);
        debug!(
            "Step {}: register 0x{:02X}, {} params",
            index + 1,
            step.command.address(),
            step.command.params().len()
        );

        if let Err(e) = write_and_check(&mut *transport, packet) {
            error!(
                "DSI write failed at step {}/{}: register=0x{:02X} len={} ret={}",
                index + 1,
                INIT_SEQUENCE.len(),
                step.command.address(),
                step.command.len(),
                e.code().unwrap_or_default()
            );
            return Err(e);
        }

        if let Some(ms) = step.delay_ms {
            delay.delay_ms(ms);
        }
    }

    info!("Panel setup complete");
    Ok(())
}
