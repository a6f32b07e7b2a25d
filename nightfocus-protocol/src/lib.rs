//! Lens Adapter SPI Protocol
//!
//! This crate defines the wire format spoken between the host and the
//! lens adapter. Every exchange is one fixed-size, full-duplex transfer:
//!
//! ```text
//! host → adapter
//! ┌────────┬──────────┬──────────┬──────────┐
//! │ OPCODE │ VALUE_HI │ VALUE_LO │ CRC8     │
//! │ 1B     │ 1B       │ 1B       │ 1B       │
//! └────────┴──────────┴──────────┴──────────┘
//!
//! adapter → host
//! ┌─────────────────────────────────────────┐
//! │ 4 response bytes                        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Opcodes are the ASCII letters `O`, `I`, `F` and `A`. The checksum is a
//! CRC-8 with polynomial 0x05. Two response patterns, `02 02 02 02` and
//! `00 00 00 00`, are reserved by the adapter to report an error.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod response;

pub use frame::{crc8, CommandFrame, FrameError, Opcode, CRC8_POLY, FRAME_LEN};
pub use response::{Response, ResponseError, Sentinel, ERROR_RESET, ERROR_RESPONSE};
