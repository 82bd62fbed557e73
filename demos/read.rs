use std::io;
use std::time::Duration;

use rvr_serial::command::Command;
use rvr_serial::telemetry::FrameScanner;

const PORT_NAME: &'static str = "/dev/ttyUSB0";

fn main() {
    let port = serialport::new(PORT_NAME, 115_200)
        .timeout(Duration::from_millis(10))
        .open();

    let mut scanner = FrameScanner::<128>::default();

    match port {
        Ok(mut port) => {
            // telemetry only flows after the streaming handshake
            for command in [Command::ConfigureStreaming, Command::StartStreaming] {
                port.write_all(&command.as_bytes()).unwrap();
            }

            let mut serial_buf: Vec<u8> = vec![0; 1000];
            loop {
                match port.read(serial_buf.as_mut_slice()) {
                    Ok(t) => match scanner.process_bytes(&serial_buf[..t]) {
                        Ok(Some(reading)) => {
                            println!("locator reading = {:?}", reading);
                        }
                        Ok(None) => (),
                        Err(e) => eprintln!("Error while scanning frames = {:?}", e),
                    },
                    Err(ref e) if e.kind() == io::ErrorKind::TimedOut => (),
                    Err(e) => eprintln!("{:?}", e),
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
