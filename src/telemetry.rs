//! Inbound stream scanning and locator telemetry decoding.
//!
//! The rover streams telemetry frames once the streaming handshake has been
//! sent. [`FrameScanner`] segments whatever bytes the transport currently has
//! into complete `START..END` frames and decodes the most recent recognized
//! one. It owns the unconsumed tail between polls, so it must belong to a
//! single consumer.

use heapless::Vec;

use crate::frame::{END, START};
use crate::Error;

/// Identifier byte observed at offset 4 of locator report frames.
pub const LOCATOR_REPORT_ID: u8 = 0x3D;

/// Shortest frame carrying both locator axes (raw values end at offset 15,
/// followed by checksum and END).
const MIN_LOCATOR_FRAME_LENGTH: usize = 17;

/// Frame offsets of the raw big-endian axis values.
const LOCATOR_X_OFFSET: usize = 7;
const LOCATOR_Y_OFFSET: usize = 11;

/// Midpoint of the raw locator field; raw values are offset around it.
const LOCATOR_RAW_MIDPOINT: f64 = 2_147_483_647.0;

/// Full physical scale of one locator axis.
const LOCATOR_SCALE: f64 = 16_000.0;

/// A decoded two-axis locator reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorReading {
    pub x: f32,
    pub y: f32,
}

impl LocatorReading {
    /// Decodes a complete frame, `None` unless it is a locator report.
    ///
    /// Inbound checksums are deliberately not verified - the reference
    /// protocol behavior is relaxed and decoding trusts the framing.
    pub fn from_frame(frame: &[u8]) -> Option<LocatorReading> {
        if frame.len() < MIN_LOCATOR_FRAME_LENGTH || frame[4] != LOCATOR_REPORT_ID {
            return None;
        }

        let x_raw = u32::from_be_bytes(
            frame[LOCATOR_X_OFFSET..LOCATOR_X_OFFSET + 4]
                .try_into()
                .unwrap(),
        );
        let y_raw = u32::from_be_bytes(
            frame[LOCATOR_Y_OFFSET..LOCATOR_Y_OFFSET + 4]
                .try_into()
                .unwrap(),
        );
        Some(LocatorReading {
            x: scale_axis(x_raw),
            y: scale_axis(y_raw),
        })
    }
}

/// Linear map from the raw sensor range to physical units: the raw midpoint
/// (`i32::MAX` of an unsigned field, as the rover firmware transmits it) maps
/// to 0.0, the extremes to roughly +/-16000.
fn scale_axis(raw: u32) -> f32 {
    ((raw as f64 - LOCATOR_RAW_MIDPOINT) / LOCATOR_RAW_MIDPOINT * LOCATOR_SCALE) as f32
}

/// Segments the inbound byte stream into frames and decodes locator reports.
///
/// `BUFL` bounds the bytes retained between calls (one partial frame plus
/// whatever a poll delivers). State is a plain value owned by the caller;
/// there is no shared buffer behind it.
pub struct FrameScanner<const BUFL: usize> {
    buf: Vec<u8, BUFL>,
}

impl<const BUFL: usize> FrameScanner<BUFL> {
    pub fn new() -> Self {
        Self {
            buf: Vec::<u8, BUFL>::new(),
        }
    }

    /// Consumes newly arrived bytes and returns the reading decoded from the
    /// most recent complete locator report, if this call completed one.
    ///
    /// Bytes after the last unmatched START are retained for the next call
    /// (a partial frame is not an error); bytes with no START at all are
    /// discarded as line noise. Complete frames with an unrecognized
    /// identifier are silently ignored.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Result<Option<LocatorReading>, Error> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| Error::BufferFull)?;

        let mut last_frame: Option<(usize, usize)> = None;
        let mut cursor = 0;
        let tail_start = loop {
            let start = match find_byte(&self.buf[cursor..], START) {
                Some(offset) => cursor + offset,
                // no frame in sight, everything scanned was noise
                None => break self.buf.len(),
            };
            // committed to this START: only search forward for END, a marker
            // byte inside the payload will corrupt the frame (no escaping on
            // this protocol)
            match find_byte(&self.buf[start + 1..], END) {
                Some(offset) => {
                    let end = start + 1 + offset;
                    last_frame = Some((start, end));
                    cursor = end + 1;
                }
                // partial frame, wait for more bytes
                None => break start,
            }
        };

        let reading =
            last_frame.and_then(|(start, end)| LocatorReading::from_frame(&self.buf[start..=end]));
        self.buf = Vec::from_slice(&self.buf[tail_start..]).unwrap();
        Ok(reading)
    }

    /// Bytes retained for the next call (the tail of a partial frame).
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

impl<const BUFL: usize> Default for FrameScanner<BUFL> {
    fn default() -> Self {
        Self::new()
    }
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}
