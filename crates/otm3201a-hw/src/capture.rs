//! Host-side transport and delay implementations.
//!
//! `CaptureTransport` stands in for a DSI controller: it records every packet
//! and can be told to reject one call. Used for dry runs and tests.

use embedded_hal::delay::DelayNs;
use tracing::debug;

use crate::dsi::{DsiTransport, PacketType};

/// A packet seen by [`CaptureTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    pub kind: PacketType,
    pub payload: Vec<u8>,
}

impl CapturedPacket {
    /// Destination register (first payload byte).
    pub fn register(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Payload as space-separated hex bytes.
    pub fn hex(&self) -> String {
        self.payload
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Recording DSI transport.
#[derive(Debug, Default)]
pub struct CaptureTransport {
    packets: Vec<CapturedPacket>,
    calls: usize,
    fail: Option<(usize, i32)>,
}

impl CaptureTransport {
    /// Creates a transport that accepts every packet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects call number `call` (1-indexed) with `code`.
    pub fn fail_at(mut self, call: usize, code: i32) -> Self {
        self.fail = Some((call, code));
        self
    }

    /// Packets accepted so far.
    pub fn packets(&self) -> &[CapturedPacket] {
        &self.packets
    }

    /// Number of write attempts, including a rejected one.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DsiTransport for CaptureTransport {
    fn write_packet(&mut self, kind: PacketType, payload: &[u8]) -> i32 {
        self.calls += 1;

        if let Some((call, code)) = self.fail {
            if call == self.calls {
                debug!("Rejecting write {} with {}", self.calls, code);
                return code;
            }
        }

        self.packets.push(CapturedPacket {
            kind,
            payload: payload.to_vec(),
        });
        0
    }
}

/// Delay backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
