//! Command frames sent from the host to the rover.
//!
//! Encoding is a pure computation - [`Command::as_bytes`] returns the finished
//! frame and transmission is left to the caller (usually the
//! [`driver`](crate::driver) module).
//!
//! Integer parameters outside the wire byte width are truncated to their low
//! 8 bits, never rejected; validating ranges up front is the caller's job.

use crate::frame::{self, FrameVec};

/// Drive payload flag signalling reversed travel.
const DRIVE_REVERSE_FLAG: u8 = 0x01;

/// LED group mask selecting all ten LED zones, sent ahead of the RGB triples.
const LED_GROUP_MASK: [u8; 4] = [0x3F, 0xFF, 0xFF, 0xFF];

/// Fixed payload configuring the locator telemetry slot.
const CONFIGURE_STREAMING_PAYLOAD: [u8; 7] = [0x02, 0x00, 0x06, 0x02, 0x00, 0x01, 0x00];

/// Fixed payload starting the configured telemetry stream.
const START_STREAMING_PAYLOAD: [u8; 2] = [0x00, 0x0F];

/// Per-motor drive mode of the raw motor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RawMotorMode {
    Off = 0,
    Forward = 1,
    Backward = 2,
}

impl From<u8> for RawMotorMode {
    /// Any byte outside the valid mode range coerces to `Off`.
    fn from(value: u8) -> Self {
        match value {
            1 => RawMotorMode::Forward,
            2 => RawMotorMode::Backward,
            _ => RawMotorMode::Off,
        }
    }
}

/// Commands of the RVR protocol subset this crate speaks.
///
/// Each variant maps to a fixed `(FLAGS, DEVICE_ID, COMMAND_ID, SEQUENCE)`
/// header tuple and a command-specific payload layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drive at `speed` towards `heading` (degrees, 0-359). A negative speed
    /// drives in reverse: the magnitude is transmitted, the heading is rotated
    /// by 180 degrees and the reverse flag is set.
    Drive { speed: i16, heading: u16 },
    /// Direct per-motor mode and speed.
    RawMotors {
        left_mode: RawMotorMode,
        left_speed: u8,
        right_mode: RawMotorMode,
        right_speed: u8,
    },
    /// Drive to a position in SI units (meters, degrees, m/s).
    DriveToPositionSi {
        yaw_angle: f32,
        x: f32,
        y: f32,
        speed: f32,
    },
    /// Re-zero the rover's yaw reference.
    ResetYaw,
    /// First half of the telemetry handshake; must precede `StartStreaming`.
    ConfigureStreaming,
    /// Second half of the telemetry handshake.
    StartStreaming,
    /// Set all ten LED zones to one RGB color.
    SetAllLeds { red: u8, green: u8, blue: u8 },
    /// Wake the rover from soft sleep.
    Wake,
    /// Put the rover into soft sleep.
    Sleep,
}

impl Command {
    /// Raw motor command derived from signed left/right speeds.
    ///
    /// Mode follows the sign (non-negative is forward), magnitudes are clamped
    /// to [-255, 255] before taking the absolute value.
    pub fn motors(left: i16, right: i16) -> Command {
        let left_mode = if left >= 0 {
            RawMotorMode::Forward
        } else {
            RawMotorMode::Backward
        };
        let right_mode = if right >= 0 {
            RawMotorMode::Forward
        } else {
            RawMotorMode::Backward
        };

        Command::RawMotors {
            left_mode,
            left_speed: left.clamp(-255, 255).unsigned_abs() as u8,
            right_mode,
            right_speed: right.clamp(-255, 255).unsigned_abs() as u8,
        }
    }

    /// LED command with each channel truncated to its low 8 bits.
    ///
    /// Values above 255 are transmitted modulo 256 - `set_all_leds(300, 0, 0)`
    /// puts 44 on the wire, matching the single-byte channel width.
    pub fn set_all_leds(red: u16, green: u16, blue: u16) -> Command {
        Command::SetAllLeds {
            red: (red & 0xFF) as u8,
            green: (green & 0xFF) as u8,
            blue: (blue & 0xFF) as u8,
        }
    }

    /// The `(FLAGS, DEVICE_ID, COMMAND_ID, SEQUENCE)` header tuple.
    fn header(&self) -> (u8, u8, u8, u8) {
        match self {
            Command::Drive { .. } => (0x01, 0x16, 0x07, 0x00),
            Command::RawMotors { .. } => (0x01, 0x16, 0x01, 0x00),
            Command::DriveToPositionSi { .. } => (0x06, 0x16, 0x38, 0x01),
            Command::ResetYaw => (0x01, 0x16, 0x06, 0x00),
            Command::ConfigureStreaming => (0x02, 0x18, 0x39, 0x01),
            Command::StartStreaming => (0x02, 0x18, 0x3A, 0x02),
            Command::SetAllLeds { .. } => (0x01, 0x1A, 0x1A, 0x00),
            Command::Wake => (0x01, 0x13, 0x0D, 0x00),
            Command::Sleep => (0x01, 0x13, 0x01, 0x00),
        }
    }

    /// Encodes the command into a ready-to-transmit frame.
    pub fn as_bytes(&self) -> FrameVec {
        let mut res = FrameVec::new();
        let (flags, device_id, command_id, sequence) = self.header();
        res.extend_from_slice(&[frame::START, flags, device_id, command_id, sequence])
            .unwrap();

        match self {
            Command::Drive { speed, heading } => {
                let (speed, heading, drive_flags) = effective_drive(*speed, *heading);
                res.extend_from_slice(&[speed, (heading >> 8) as u8, heading as u8, drive_flags])
                    .unwrap();
            }
            Command::RawMotors {
                left_mode,
                left_speed,
                right_mode,
                right_speed,
            } => {
                res.extend_from_slice(&[
                    *left_mode as u8,
                    *left_speed,
                    *right_mode as u8,
                    *right_speed,
                ])
                .unwrap();
            }
            Command::DriveToPositionSi {
                yaw_angle,
                x,
                y,
                speed,
            } => {
                for value in [yaw_angle, x, y, speed] {
                    res.extend_from_slice(&value.to_be_bytes()).unwrap();
                }
                res.push(0x00).unwrap();
            }
            Command::ResetYaw | Command::Wake | Command::Sleep => {}
            Command::ConfigureStreaming => {
                res.extend_from_slice(&CONFIGURE_STREAMING_PAYLOAD).unwrap();
            }
            Command::StartStreaming => {
                res.extend_from_slice(&START_STREAMING_PAYLOAD).unwrap();
            }
            Command::SetAllLeds { red, green, blue } => {
                res.extend_from_slice(&LED_GROUP_MASK).unwrap();
                for _ in 0..10 {
                    res.extend_from_slice(&[*red, *green, *blue]).unwrap();
                }
            }
        };

        res.push(frame::checksum(&res[1..])).unwrap();
        res.push(frame::END).unwrap();
        res
    }
}

/// Pure reverse-drive transformation.
///
/// Produces the on-wire `(speed, heading, flags)` tuple: a negative speed
/// becomes its magnitude with the heading rotated 180 degrees (mod 360) and
/// the reverse flag set. A forward heading is transmitted as given - ranges
/// are not clamped here, and the speed byte is the low 8 bits of the
/// magnitude.
fn effective_drive(speed: i16, heading: u16) -> (u8, u16, u8) {
    if speed < 0 {
        // reduce before rotating so the addition cannot overflow u16
        (
            speed.unsigned_abs() as u8,
            (heading % 360 + 180) % 360,
            DRIVE_REVERSE_FLAG,
        )
    } else {
        (speed as u8, heading, 0x00)
    }
}
