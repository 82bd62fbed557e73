use defmt::Formatter;

use crate::command::{Command, RawMotorMode};
use crate::telemetry::LocatorReading;
use crate::Error;

impl defmt::Format for Error {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Error::WriteFailure => defmt::write!(fmt, "Error::WriteFailure"),
            Error::ReadFailure => defmt::write!(fmt, "Error::ReadFailure"),
            Error::BufferFull => defmt::write!(fmt, "Error::BufferFull"),
        }
    }
}

impl defmt::Format for RawMotorMode {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            RawMotorMode::Off => defmt::write!(fmt, "Off"),
            RawMotorMode::Forward => defmt::write!(fmt, "Forward"),
            RawMotorMode::Backward => defmt::write!(fmt, "Backward"),
        }
    }
}

impl defmt::Format for LocatorReading {
    fn format(&self, fmt: Formatter<'_>) {
        defmt::write!(
            fmt,
            "LocatorReading {{ x: {=f32}, y: {=f32} }}",
            self.x,
            self.y
        )
    }
}

impl defmt::Format for Command {
    fn format(&self, fmt: Formatter<'_>) {
        match self {
            Command::Drive { speed, heading } => defmt::write!(
                fmt,
                "Drive {{ speed: {=i16}, heading: {=u16} }}",
                *speed,
                *heading
            ),
            Command::RawMotors {
                left_mode,
                left_speed,
                right_mode,
                right_speed,
            } => defmt::write!(
                fmt,
                "RawMotors {{ left: {}/{=u8}, right: {}/{=u8} }}",
                left_mode,
                *left_speed,
                right_mode,
                *right_speed
            ),
            Command::DriveToPositionSi {
                yaw_angle,
                x,
                y,
                speed,
            } => defmt::write!(
                fmt,
                "DriveToPositionSi {{ yaw: {=f32}, x: {=f32}, y: {=f32}, speed: {=f32} }}",
                *yaw_angle,
                *x,
                *y,
                *speed
            ),
            Command::ResetYaw => defmt::write!(fmt, "ResetYaw"),
            Command::ConfigureStreaming => defmt::write!(fmt, "ConfigureStreaming"),
            Command::StartStreaming => defmt::write!(fmt, "StartStreaming"),
            Command::SetAllLeds { red, green, blue } => defmt::write!(
                fmt,
                "SetAllLeds {{ r: {=u8}, g: {=u8}, b: {=u8} }}",
                *red,
                *green,
                *blue
            ),
            Command::Wake => defmt::write!(fmt, "Wake"),
            Command::Sleep => defmt::write!(fmt, "Sleep"),
        }
    }
}
