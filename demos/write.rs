use ::std::{thread, time};
use std::time::Duration;

use rvr_serial::command::Command;

const PORT_NAME: &'static str = "/dev/ttyUSB0";

fn main() {
    let port = serialport::new(PORT_NAME, 115_200)
        .timeout(Duration::from_millis(10))
        .open();

    match port {
        Ok(mut port) => {
            // wake the rover, flash the LEDs green, then drive a short arc
            let commands = [
                Command::Wake,
                Command::set_all_leds(0, 255, 0),
                Command::Drive {
                    speed: 30,
                    heading: 90,
                },
            ];
            for command in commands {
                port.write_all(&command.as_bytes()).unwrap();
                thread::sleep(time::Duration::from_millis(250));
            }
            port.write_all(
                &Command::Drive {
                    speed: 0,
                    heading: 90,
                }
                .as_bytes(),
            )
            .unwrap();
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
