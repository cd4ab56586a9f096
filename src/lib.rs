//! This crate provides a `no-std` streaming decoder for the SBUS protocol.
//!
//! Bytes read from the receiver are fed to an [`SbusParser`] in chunks of any size. Frames
//! split across reads are reassembled, corrupted frames are dropped and the parser
//! resynchronizes on the next `0x00, 0x0F` adjacency.
//! # Usage
//! ### Frame Parsing
//! ```rust
//! use sbus::{SbusParser, END_BYTE, START_BYTE};
//!
//! let mut parser = SbusParser::new();
//! let data: &[&[u8]] = &[&[END_BYTE, START_BYTE], &[0; 24], &[END_BYTE]];
//! let mut received = None;
//! for chunk in data {
//!     if let Some(channels) = parser.check_for_new_messages(chunk) {
//!         received = Some(channels);
//!         parser.clear();
//!     }
//! }
//! assert_eq!(*received.unwrap(), [-1.0; 16]);
//! ```
//! ### Frame Serialization
//! ```rust
//! use sbus::{encode_frame, Flags, RawChannels, SbusParser, FRAME_LEN};
//!
//! let mut buf = [0u8; FRAME_LEN + 1];
//! encode_frame(&RawChannels([991; 16]), Flags::from_bits(0), 0, (&mut buf[1..]).try_into().unwrap());
//!
//! let mut parser = SbusParser::new();
//! let channels = parser.check_for_new_messages(&buf).unwrap();
//! assert!(channels.iter().all(|&ch| ch == 0.0));
//! ```

#![no_std]

extern crate alloc;

mod buffer;

mod frame;
pub use frame::*;

mod parser;
pub use parser::*;

/// Second byte of the sync adjacency, the first byte of every frame.
pub const START_BYTE: u8 = 0x0F;
/// Frame terminator, and the first byte of the sync adjacency.
pub const END_BYTE: u8 = 0x00;

/// Bytes collected between the start byte and the terminator.
pub const PAYLOAD_LEN: usize = 24;
/// Length of a full frame on the wire: start byte, payload and terminator.
pub const FRAME_LEN: usize = PAYLOAD_LEN + 2;

/// Proportional channels carried by every frame.
pub const NUM_CHANNELS: usize = 16;
/// Bytes holding the 16 packed 11-bit channels.
pub const CHANNELS_LEN: usize = 22;
/// Position of the flag byte inside the payload.
pub const FLAGS_INDEX: usize = 22;
/// Position of the trailer byte inside the payload. Not interpreted by the decoder.
pub const TRAILER_INDEX: usize = 23;

/// Width of a packed channel value (11 bits).
pub const CHANNEL_MASK: u16 = 0x07FF;
/// Raw value which normalizes to `0.0`.
pub const CHANNEL_CENTER: u16 = 991;
/// Distance from [`CHANNEL_CENTER`] which normalizes to `±1.0`.
pub const CHANNEL_HALF_RANGE: u16 = 819;
