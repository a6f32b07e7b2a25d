//! Adapter responses and error sentinels.

use core::fmt;

use crate::frame::{crc8, FRAME_LEN};

/// Response the adapter returns when it needs a hardware reset
pub const ERROR_RESET: [u8; FRAME_LEN] = [2, 2, 2, 2];

/// Response the adapter returns when it rejected the command
pub const ERROR_RESPONSE: [u8; FRAME_LEN] = [0, 0, 0, 0];

/// Reserved error patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sentinel {
    /// `02 02 02 02`
    Reset,
    /// `00 00 00 00`
    Error,
}

/// Reasons a response is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// Response is one of the reserved error patterns
    Sentinel(Sentinel),
    /// Response checksum is inconsistent (strict mode only)
    ChecksumMismatch {
        /// CRC computed over the first three bytes
        expected: u8,
        /// CRC carried in the response
        found: u8,
    },
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::Sentinel(Sentinel::Reset) => f.write_str("adapter reported reset-required sentinel"),
            ResponseError::Sentinel(Sentinel::Error) => f.write_str("adapter reported error sentinel"),
            ResponseError::ChecksumMismatch { expected, found } => write!(
                f,
                "response checksum mismatch (expected {expected:#04x}, found {found:#04x})"
            ),
        }
    }
}

/// Bytes clocked back from the adapter during one exchange
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    bytes: [u8; FRAME_LEN],
}

impl Response {
    /// Wrap raw response bytes
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    /// Raw response bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// Which error sentinel this response matches, if any
    pub fn sentinel(&self) -> Option<Sentinel> {
        match self.bytes {
            ERROR_RESET => Some(Sentinel::Reset),
            ERROR_RESPONSE => Some(Sentinel::Error),
            _ => None,
        }
    }

    /// Whether the fourth byte is the CRC-8 of the first three
    pub fn checksum_valid(&self) -> bool {
        crc8(&self.bytes[..3]) == self.bytes[3]
    }

    /// Accept or reject this response
    ///
    /// Sentinels are always rejected. With `strict` set, any other response
    /// must also carry a valid checksum.
    pub fn check(&self, strict: bool) -> Result<(), ResponseError> {
        if let Some(sentinel) = self.sentinel() {
            return Err(ResponseError::Sentinel(sentinel));
        }
        if strict && !self.checksum_valid() {
            return Err(ResponseError::ChecksumMismatch {
                expected: crc8(&self.bytes[..3]),
                found: self.bytes[3],
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response({:02x?})", self.bytes)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.bytes;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}
