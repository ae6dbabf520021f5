//! MIPI-DSI link boundary.
//!
//! The packet transport itself (lane setup, clocking, framing) lives in the
//! host DSI controller driver. This module only declares what the panel code
//! needs from it: a single "write packet" primitive.

mod command;

pub use command::{write_and_check, Command, CommandBuffer, MAX_PARAMS};

/// Scratch buffer size of the host DSI controller driver, in bytes.
pub const DSI_CMD_BUF_MAXSIZE: usize = 32;

/// DSI data types used for command packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    /// Generic long write (arbitrary payload).
    GenericLongWrite = 0x29,
}

impl std::fmt::Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketType::GenericLongWrite => write!(f, "generic-long-write"),
        }
    }
}

/// Packet-level access to a DSI host controller.
///
/// `write_packet` returns the controller's status: negative values are error
/// codes, anything else is success.
pub trait DsiTransport {
    /// Sends one packet of `kind` carrying `payload`.
    fn write_packet(&mut self, kind: PacketType, payload: &[u8]) -> i32;
}

impl<T: DsiTransport + ?Sized> DsiTransport for &mut T {
    fn write_packet(&mut self, kind: PacketType, payload: &[u8]) -> i32 {
        (**self).write_packet(kind, payload)
    }
}
