//! Polling driver tying the codec to a serial transport.
//!
//! The transport is injected at construction and only needs the blocking
//! [`embedded-io`](embedded_io) byte traits; pacing, retries and any control
//! loop policy stay with the caller.

use embedded_io::{Read, ReadReady, Write};
use log::debug;

use crate::command::{Command, RawMotorMode};
use crate::telemetry::{FrameScanner, LocatorReading};
use crate::Error;

/// Bytes the driver's scanner retains between polls.
pub const SCAN_BUFFER_LENGTH: usize = 128;

/// Bytes drained from the transport per read while polling.
const READ_CHUNK_LENGTH: usize = 32;

/// Driver for an RVR attached to a serial transport.
///
/// Writes are whole-frame and order-preserving; a failed write is reported as
/// [`Error::WriteFailure`] and never retried here.
pub struct Rvr<Serial> {
    serial: Serial,
    scanner: FrameScanner<SCAN_BUFFER_LENGTH>,
}

impl<S> Rvr<S>
where
    S: Read + Write + ReadReady,
{
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            scanner: FrameScanner::new(),
        }
    }

    /// Encodes and transmits a single command frame.
    pub fn send(&mut self, command: &Command) -> Result<(), Error> {
        let frame = command.as_bytes();
        debug!("sending {:?}: {:02X?}", command, &frame[..]);
        self.serial
            .write_all(&frame)
            .map_err(|_| Error::WriteFailure)?;
        self.serial.flush().map_err(|_| Error::WriteFailure)
    }

    /// Drive at `speed` towards `heading` (degrees); negative speed reverses.
    pub fn drive(&mut self, speed: i16, heading: u16) -> Result<(), Error> {
        self.send(&Command::Drive { speed, heading })
    }

    /// Stop driving while holding `heading`.
    pub fn stop(&mut self, heading: u16) -> Result<(), Error> {
        self.drive(0, heading)
    }

    /// Direct raw motor control.
    pub fn set_raw_motors(
        &mut self,
        left_mode: RawMotorMode,
        left_speed: u8,
        right_mode: RawMotorMode,
        right_speed: u8,
    ) -> Result<(), Error> {
        self.send(&Command::RawMotors {
            left_mode,
            left_speed,
            right_mode,
            right_speed,
        })
    }

    /// Tank-style control from signed per-side speeds; modes are derived from
    /// the signs and magnitudes clamped to the wire range.
    pub fn set_motors(&mut self, left: i16, right: i16) -> Result<(), Error> {
        self.send(&Command::motors(left, right))
    }

    /// Drive to a position in SI units.
    pub fn drive_to_position_si(
        &mut self,
        yaw_angle: f32,
        x: f32,
        y: f32,
        speed: f32,
    ) -> Result<(), Error> {
        self.send(&Command::DriveToPositionSi {
            yaw_angle,
            x,
            y,
            speed,
        })
    }

    /// Re-zero the yaw reference.
    pub fn reset_yaw(&mut self) -> Result<(), Error> {
        self.send(&Command::ResetYaw)
    }

    /// Set all LED zones to one color; channel values truncate to 8 bits.
    pub fn set_all_leds(&mut self, red: u16, green: u16, blue: u16) -> Result<(), Error> {
        self.send(&Command::set_all_leds(red, green, blue))
    }

    pub fn wake(&mut self) -> Result<(), Error> {
        self.send(&Command::Wake)
    }

    pub fn sleep(&mut self) -> Result<(), Error> {
        self.send(&Command::Sleep)
    }

    pub fn configure_streaming(&mut self) -> Result<(), Error> {
        self.send(&Command::ConfigureStreaming)
    }

    pub fn start_streaming(&mut self) -> Result<(), Error> {
        self.send(&Command::StartStreaming)
    }

    /// Runs the two-step streaming handshake, in the required order. The
    /// rover produces no telemetry frames until this has been sent.
    pub fn start_sensor_streaming(&mut self) -> Result<(), Error> {
        self.configure_streaming()?;
        self.start_streaming()
    }

    /// Polls the transport for telemetry.
    ///
    /// Drains whatever bytes are currently available (non-blocking
    /// check-then-read) and returns the most recent locator reading completed
    /// by this poll. `Ok(None)` is the common case and not a fault.
    pub fn update_sensors(&mut self) -> Result<Option<LocatorReading>, Error> {
        let mut latest = None;
        while self.serial.read_ready().map_err(|_| Error::ReadFailure)? {
            let mut chunk = [0u8; READ_CHUNK_LENGTH];
            let count = self
                .serial
                .read(&mut chunk)
                .map_err(|_| Error::ReadFailure)?;
            if count == 0 {
                break;
            }
            if let Some(reading) = self.scanner.process_bytes(&chunk[..count])? {
                debug!("locator reading: {:?}", reading);
                latest = Some(reading);
            }
        }
        Ok(latest)
    }

    /// Releases the underlying transport.
    pub fn release(self) -> S {
        self.serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{checksum, END, START};
    use crate::telemetry::LOCATOR_REPORT_ID;

    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory transport capturing writes and replaying queued reads. The
    /// receive queue is shared so a test can feed bytes between polls.
    struct MockSerial {
        rx: Rc<RefCell<std::vec::Vec<u8>>>,
        tx: std::vec::Vec<u8>,
    }

    impl MockSerial {
        fn new(rx: &[u8]) -> Self {
            Self {
                rx: Rc::new(RefCell::new(rx.to_vec())),
                tx: std::vec::Vec::new(),
            }
        }

        fn rx_handle(&self) -> Rc<RefCell<std::vec::Vec<u8>>> {
            Rc::clone(&self.rx)
        }
    }

    impl embedded_io::ErrorType for MockSerial {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::Read for MockSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut rx = self.rx.borrow_mut();
            let count = buf.len().min(rx.len());
            buf[..count].copy_from_slice(&rx[..count]);
            rx.drain(..count);
            Ok(count)
        }
    }

    impl embedded_io::Write for MockSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl embedded_io::ReadReady for MockSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.borrow().is_empty())
        }
    }

    /// Transport whose every operation fails.
    struct BrokenSerial;

    impl embedded_io::ErrorType for BrokenSerial {
        type Error = embedded_io::ErrorKind;
    }

    impl embedded_io::Read for BrokenSerial {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Err(embedded_io::ErrorKind::Other)
        }
    }

    impl embedded_io::Write for BrokenSerial {
        fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
            Err(embedded_io::ErrorKind::Other)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(embedded_io::ErrorKind::Other)
        }
    }

    impl embedded_io::ReadReady for BrokenSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Err(embedded_io::ErrorKind::Other)
        }
    }

    /// Ready transport that fails on the read itself.
    struct ReadFailingSerial;

    impl embedded_io::ErrorType for ReadFailingSerial {
        type Error = embedded_io::ErrorKind;
    }

    impl embedded_io::Read for ReadFailingSerial {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Err(embedded_io::ErrorKind::Other)
        }
    }

    impl embedded_io::Write for ReadFailingSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl embedded_io::ReadReady for ReadFailingSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    fn locator_frame(x_raw: u32, y_raw: u32) -> std::vec::Vec<u8> {
        let mut frame = vec![START, 0x3E, 0x11, 0x02, LOCATOR_REPORT_ID, 0xFF, 0x00];
        frame.extend_from_slice(&x_raw.to_be_bytes());
        frame.extend_from_slice(&y_raw.to_be_bytes());
        frame.push(checksum(&frame[1..]));
        frame.push(END);
        frame
    }

    #[test]
    fn test_drive_writes_one_whole_frame() {
        let mut rvr = Rvr::new(MockSerial::new(&[]));
        rvr.drive(30, 190).unwrap();
        let serial = rvr.release();
        assert_eq!(
            serial.tx,
            vec![0x8D, 0x01, 0x16, 0x07, 0x00, 30, 0x00, 190, 0x00, 0x05, 0xD8]
        );
    }

    #[test]
    fn test_handshake_writes_configure_before_start() {
        let mut rvr = Rvr::new(MockSerial::new(&[]));
        rvr.start_sensor_streaming().unwrap();
        let serial = rvr.release();

        let mut expected = Command::ConfigureStreaming.as_bytes().to_vec();
        expected.extend_from_slice(&Command::StartStreaming.as_bytes());
        assert_eq!(serial.tx, expected);
    }

    #[test]
    fn test_update_sensors_returns_latest_reading() {
        let mut rx = locator_frame(0, 0);
        rx.extend_from_slice(&locator_frame(2_147_483_647, 2_147_483_647));
        let mut rvr = Rvr::new(MockSerial::new(&rx));

        let reading = rvr.update_sensors().unwrap().unwrap();
        assert_eq!(reading, LocatorReading { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_update_sensors_without_data_is_not_a_fault() {
        let mut rvr = Rvr::new(MockSerial::new(&[]));
        assert_eq!(rvr.update_sensors(), Ok(None));
    }

    #[test]
    fn test_failed_write_maps_to_write_failure() {
        let mut rvr = Rvr::new(BrokenSerial);
        assert_eq!(rvr.drive(30, 90), Err(Error::WriteFailure));
        assert_eq!(rvr.wake(), Err(Error::WriteFailure));
    }

    #[test]
    fn test_failed_readiness_check_maps_to_read_failure() {
        let mut rvr = Rvr::new(BrokenSerial);
        assert_eq!(rvr.update_sensors(), Err(Error::ReadFailure));
    }

    #[test]
    fn test_failed_read_maps_to_read_failure() {
        let mut rvr = Rvr::new(ReadFailingSerial);
        assert_eq!(rvr.update_sensors(), Err(Error::ReadFailure));
    }

    #[test]
    fn test_update_sensors_spans_polls_across_partial_frames() {
        let frame = locator_frame(2_147_483_647, 0);
        let (head, tail) = frame.split_at(6);

        let serial = MockSerial::new(head);
        let rx = serial.rx_handle();
        let mut rvr = Rvr::new(serial);
        assert_eq!(rvr.update_sensors(), Ok(None));

        // the remainder arrives before the next poll
        rx.borrow_mut().extend_from_slice(tail);
        let reading = rvr.update_sensors().unwrap().unwrap();
        assert_eq!(reading.x, 0.0);
    }
}
