//! usc3-probe: connect to a USC-3 controller and print its basic state.
//!
//!   usc3-probe [profile.json]
//!
//! Without a profile the controller is discovered by vendor id.
//! Set USC3_MOCK=1 to run against a scripted in-memory controller.

use std::path::Path;

use usc3_lib::adapters::mock_serial::MockSerial;
use usc3_lib::adapters::serial_port::SerialPortFactory;
use usc3_lib::{ControllerConfig, DecodedResponse, Usc3Client, Usc3Error};

fn describe(reply: &DecodedResponse) -> String {
    match reply {
        DecodedResponse::Status(status) => format!("[{}] {}", status.code, status.description),
        DecodedResponse::Raw(payload) => String::from_utf8_lossy(payload).into_owned(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ControllerConfig::from_json_file(Path::new(&path))?,
        None => ControllerConfig::default(),
    };

    let mut client = if std::env::var("USC3_MOCK").is_ok_and(|v| v == "1") {
        let mock = MockSerial::new(["0\n", "31\n", "0 0 0\n"]);
        Usc3Client::new(Box::new(mock), "mock")
    } else {
        match Usc3Client::from_config::<SerialPortFactory>(&config) {
            Ok(client) => client,
            Err(e @ Usc3Error::DeviceNotFound(_)) => {
                eprintln!("USC-3 laser control device not found: {e}");
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        }
    };

    println!("Port:          {}", client.port());
    println!("Laser status:  {}", describe(&client.get_laser_status()?));
    println!("Temperature:   {}", describe(&client.get_temperature()?));
    println!("Home position: {:?}", client.get_home_position()?);

    client.close()?;
    Ok(())
}
