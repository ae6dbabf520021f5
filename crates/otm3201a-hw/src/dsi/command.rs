//! Register command packing and checked writes.
//!
//! Packet layout (generic long write payload):
//! - Byte 0: destination register address
//! - Bytes 1..=n: register parameters, in order

use crate::{Error, Result};

use super::{DsiTransport, PacketType, DSI_CMD_BUF_MAXSIZE};

/// Maximum number of parameters a single register write carries.
pub const MAX_PARAMS: usize = 17;

const _: () = assert!(DSI_CMD_BUF_MAXSIZE > MAX_PARAMS);

/// One register write: an address followed by its parameter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    address: u8,
    params: &'a [u8],
}

impl<'a> Command<'a> {
    /// Creates a command.
    ///
    /// Panics if `params` is longer than [`MAX_PARAMS`]; in a `const` table
    /// that is a compile error.
    pub const fn new(address: u8, params: &'a [u8]) -> Self {
        assert!(params.len() <= MAX_PARAMS, "too many command parameters");
        Self { address, params }
    }

    /// Creates a command from runtime data, checking the parameter count.
    pub fn try_new(address: u8, params: &'a [u8]) -> Result<Self> {
        if params.len() > MAX_PARAMS {
            return Err(Error::TooManyParams {
                count: params.len(),
                max: MAX_PARAMS,
            });
        }
        Ok(Self { address, params })
    }

    /// Returns the destination register.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns the parameter bytes.
    pub fn params(&self) -> &'a [u8] {
        self.params
    }

    /// Returns the packed length (address byte plus parameters).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.params.len() + 1
    }
}

/// Scratch space for packing commands, reused across a whole setup run.
pub struct CommandBuffer {
    buf: [u8; DSI_CMD_BUF_MAXSIZE],
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    /// Creates a zeroed buffer.
    pub fn new() -> Self {
        Self {
            buf: [0u8; DSI_CMD_BUF_MAXSIZE],
        }
    }

    /// Packs `command` into the buffer and returns the packed bytes.
    ///
    /// Only offsets `0..command.len()` are written.
    pub fn pack(&mut self, command: &Command<'_>) -> &[u8] {
        let len = command.len();
        self.buf[0] = command.address;
        self.buf[1..len].copy_from_slice(command.params);
        &self.buf[..len]
    }
}

/// Sends a packed command as a generic long write and checks the status.
///
/// A negative status is returned as [`Error::Transport`] carrying the code
/// unchanged. Reporting is left to the caller, which knows the step.
pub fn write_and_check<T: DsiTransport + ?Sized>(transport: &mut T, packet: &[u8]) -> Result<()> {
    let status = transport.write_packet(PacketType::GenericLongWrite, packet);
    if status < 0 {
        return Err(Error::Transport {
            register: packet.first().copied().unwrap_or_default(),
            code: status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStatus {
        status: i32,
        calls: Vec<(PacketType, Vec<u8>)>,
    }

    impl DsiTransport for FixedStatus {
        fn write_packet(&mut self, kind: PacketType, payload: &[u8]) -> i32 {
            self.calls.push((kind, payload.to_vec()));
            self.status
        }
    }

    #[test]
    fn test_pack_every_param_count() {
        let params: Vec<u8> = (0..MAX_PARAMS as u8).map(|i| 0x10 + i).collect();

        for n in 0..=MAX_PARAMS {
            let mut buffer = CommandBuffer::new();
            buffer.buf.fill(0xEE);

            let command = Command::new(0xC0, &params[..n]);
            let packed = buffer.pack(&command).to_vec();

            assert_eq!(packed.len(), n + 1);
            assert_eq!(buffer.buf[0], 0xC0);
            assert_eq!(&buffer.buf[1..=n], &params[..n]);
            // Nothing past offset n is touched
            assert!(buffer.buf[n + 1..].iter().all(|&b| b == 0xEE));
        }
    }

    #[test]
    fn test_pack_address_only() {
        let mut buffer = CommandBuffer::new();
        buffer.buf.fill(0x55);
        assert_eq!(buffer.pack(&Command::new(0x11, &[])), &[0x11]);
        assert_eq!(buffer.buf[1], 0x55);
    }

    #[test]
    fn test_buffer_reuse_keeps_stale_tail() {
        let mut buffer = CommandBuffer::new();
        buffer.pack(&Command::new(0xB3, &[0x02, 0x0A, 0x1A]));
        let packed = buffer.pack(&Command::new(0xA0, &[0x00])).to_vec();
        assert_eq!(packed, vec![0xA0, 0x00]);
        // Bytes past the new packet still hold the previous command's tail
        assert_eq!(&buffer.buf[2..4], &[0x0A, 0x1A]);
    }

    #[test]
    fn test_try_new_rejects_long_params() {
        let params = [0u8; MAX_PARAMS + 1];
        assert_eq!(
            Command::try_new(0xC0, &params),
            Err(Error::TooManyParams {
                count: MAX_PARAMS + 1,
                max: MAX_PARAMS
            })
        );
        assert!(Command::try_new(0xC0, &params[..MAX_PARAMS]).is_ok());
    }

    #[test]
    #[should_panic(expected = "too many command parameters")]
    fn test_new_panics_on_long_params() {
        let params = [0u8; MAX_PARAMS + 1];
        let _ = Command::new(0xC0, &params);
    }

    #[test]
    fn test_long_write_data_type() {
        assert_eq!(PacketType::GenericLongWrite as u8, 0x29);
        assert_eq!(PacketType::GenericLongWrite.to_string(), "generic-long-write");
    }

    #[test]
    fn test_write_and_check_success() {
        for status in [0, 1, 19] {
            let mut transport = FixedStatus {
                status,
                calls: Vec::new(),
            };
            assert_eq!(write_and_check(&mut transport, &[0xE9, 0x46]), Ok(()));
            assert_eq!(
                transport.calls,
                vec![(PacketType::GenericLongWrite, vec![0xE9, 0x46])]
            );
        }
    }

    #[test]
    fn test_write_and_check_passes_code_through() {
        for code in [-1, -5, -110, i32::MIN] {
            let mut transport = FixedStatus {
                status: code,
                calls: Vec::new(),
            };
            let err = write_and_check(&mut transport, &[0x36, 0x00]).unwrap_err();
            assert_eq!(err.code(), Some(code));
            assert_eq!(
                err,
                Error::Transport {
                    register: 0x36,
                    code
                }
            );
        }
    }
}
