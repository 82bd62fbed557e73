//! Serial command protocol for the Sphero RVR rover.
//!
//! The RVR is controlled over an asynchronous serial link (115200 baud) using
//! framed binary commands. This crate implements the protocol codec: building
//! correctly framed, checksummed command packets for the supported command
//! subset and scanning the inbound byte stream for telemetry frames - plus a
//! small polling driver over any transport implementing the [`embedded-io`]
//! traits.
//!
//! Before the rover emits telemetry, the streaming handshake has to be sent:
//! [`Command::ConfigureStreaming`](command::Command) followed by
//! [`Command::StartStreaming`](command::Command), in that order.
//!
//! [`embedded-io`]: https://docs.rs/embedded-io

#![cfg_attr(any(not(feature = "std"), not(test)), no_std)]

pub mod command;
pub mod driver;
pub mod frame;
pub mod telemetry;

// include defmt::Format implementations
// we don't want them derive()d in the modules unless defmt-impl feature is set
#[cfg(feature = "defmt-impl")]
pub mod defmt;

// reexport heapless
pub use heapless;

/// Errors reported by the scanner and the driver.
///
/// "No telemetry yet" is not an error - polling reports it as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The transport failed to accept a whole command frame.
    WriteFailure,
    /// The transport failed while draining available bytes.
    ReadFailure,
    /// The scanner's retained buffer cannot hold the appended bytes.
    BufferFull,
}
