//! Command frame encoding and decoding.
//!
//! Frame format:
//! - OPCODE (1 byte): ASCII command letter
//! - VALUE_HI (1 byte): `value / 256`
//! - VALUE_LO (1 byte): `value % 256`
//! - CRC8 (1 byte): CRC-8/0x05 over the three bytes above

use core::fmt;

/// Length of every frame and every response
pub const FRAME_LEN: usize = 4;

/// CRC-8 generator polynomial (x^8 + x^2 + 1)
pub const CRC8_POLY: u8 = 0x05;

/// Byte carried in the opcode slot of the settle frame
const SETTLE_CODE: u8 = 0x00;

/// Adapter command opcodes
///
/// The byte values are part of the adapter firmware's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    /// Initialise the mechanical stage
    Open,
    /// Return to the safe idle state
    Idle,
    /// Move the focus ring
    Focus,
    /// Move the aperture blades
    Aperture,
}

impl Opcode {
    /// All opcodes, in declaration order
    pub const ALL: [Opcode; 4] = [Opcode::Open, Opcode::Idle, Opcode::Focus, Opcode::Aperture];

    /// Wire byte for this opcode
    pub const fn code(self) -> u8 {
        match self {
            Opcode::Open => b'O',
            Opcode::Idle => b'I',
            Opcode::Focus => b'F',
            Opcode::Aperture => b'A',
        }
    }

    /// Look up an opcode from its wire byte
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Command letter for this opcode
    pub const fn as_char(self) -> char {
        self.code() as char
    }
}

/// Errors that can occur while decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Checksum mismatch
    InvalidChecksum {
        /// CRC computed over the first three bytes
        expected: u8,
        /// CRC carried in the frame
        found: u8,
    },
    /// Opcode byte is not a known command
    UnknownOpcode(u8),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::InvalidChecksum { expected, found } => {
                write!(f, "checksum mismatch (expected {expected:#04x}, found {found:#04x})")
            }
            FrameError::UnknownOpcode(code) => write!(f, "unknown opcode {code:#04x}"),
        }
    }
}

impl core::error::Error for FrameError {}

/// CRC-8 as computed by the adapter firmware
///
/// Polynomial 0x05, MSB first, no reflection, initial value 0x00, no
/// final XOR.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// A single 4-byte command frame
///
/// Frames are built per exchange and never retained. The checksum is
/// always consistent with the other three bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFrame {
    bytes: [u8; FRAME_LEN],
}

impl CommandFrame {
    /// Build a frame for `opcode` carrying `value`
    pub fn encode(opcode: Opcode, value: u16) -> Self {
        Self::from_parts(opcode.code(), value)
    }

    /// The all-zero frame sent after a focus or aperture move
    ///
    /// The adapter expects it once the mechanism has had time to settle.
    /// CRC-8 of three zero bytes is zero, so the frame is `00 00 00 00`.
    pub fn settle() -> Self {
        Self::from_parts(SETTLE_CODE, 0)
    }

    fn from_parts(code: u8, value: u16) -> Self {
        let [high, low] = value.to_be_bytes();
        let checksum = crc8(&[code, high, low]);
        Self {
            bytes: [code, high, low, checksum],
        }
    }

    /// Parse a frame, verifying its checksum and opcode
    ///
    /// The settle frame is accepted even though its opcode byte is not an
    /// [`Opcode`].
    pub fn decode(bytes: [u8; FRAME_LEN]) -> Result<Self, FrameError> {
        let expected = crc8(&bytes[..3]);
        if bytes[3] != expected {
            return Err(FrameError::InvalidChecksum {
                expected,
                found: bytes[3],
            });
        }
        if bytes[0] != SETTLE_CODE && Opcode::from_code(bytes[0]).is_none() {
            return Err(FrameError::UnknownOpcode(bytes[0]));
        }
        Ok(Self { bytes })
    }

    /// Opcode, or `None` for the settle frame
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_code(self.bytes[0])
    }

    /// Whether this is the settle frame
    pub fn is_settle(&self) -> bool {
        self.bytes[0] == SETTLE_CODE
    }

    /// Value carried by the frame
    pub fn value(&self) -> u16 {
        u16::from_be_bytes([self.bytes[1], self.bytes[2]])
    }

    /// Raw wire bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandFrame({:02x?})", self.bytes)
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.bytes;
        write!(f, "[{a:#04x}, {b:#04x}, {c:#04x}, {d:#04x}]")
    }
}
