//! Framing primitives shared by the encoder and the stream scanner.
//!
//! Every frame on the wire is `START .. CHECKSUM END`. The payload is not
//! escaped - a payload byte can coincide with a marker (e.g. inside a packed
//! float), which the scanner accepts as a protocol limitation.

use heapless::Vec;

/// Marks the beginning of any frame (command or telemetry).
pub const START: u8 = 0x8D;

/// Marks the end of any frame.
pub const END: u8 = 0xD8;

/// Shortest possible frame: 5 header bytes, checksum, END.
pub const MIN_FRAME_LENGTH: usize = 7;

/// Longest frame the protocol subset produces (SetAllLEDs: header + 4-byte
/// LED group mask + 10 RGB triples + checksum + END = 41 bytes).
pub const MAX_FRAME_LENGTH: usize = 41;

/// A single encoded frame.
pub type FrameVec = Vec<u8, MAX_FRAME_LENGTH>;

/// One's-complement checksum over the byte sum, masked to 8 bits.
///
/// Computed over all frame bytes after START through the end of the payload;
/// the START byte, the checksum itself and END are excluded.
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}
