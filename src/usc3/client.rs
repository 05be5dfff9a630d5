//! Usc3Client: one method per controller command.
//!
//! Every call is a single synchronous exchange: encode one frame, write it,
//! block for one reply line, decode it. Status codes come back as
//! `DecodedResponse::Status` and are left to the caller to judge; only
//! transport failures and unparseable typed payloads are errors.
//!
//! The client owns its port exclusively. Sharing it between threads needs
//! external serialization (a Mutex or a single owner task), otherwise
//! frames and replies stop pairing up.

use std::time::Duration;

use crate::domain::{ControllerConfig, TriggerMode, Usc3Error, Usc3Result};
use crate::ports::{SerialConnection, SerialFactory};

use super::discovery::{find_port, DeviceFilter};
use super::{
    decode_with, disable_flag, encode, output_mask, parse_vector, DecodeMode, DecodedResponse,
    LineSession, Usc3Command,
};

/// Input pin used by `set_laser_disable_flag` when the caller has no preference (DigiIn_0)
pub const DEFAULT_DISABLE_PIN: u8 = 6;

/// Connected USC-3 controller.
pub struct Usc3Client {
    session: LineSession,
    port: String,
    decode_mode: DecodeMode,
}

impl Usc3Client {
    /// Wrap an already-open connection.
    pub fn new(serial: Box<dyn SerialConnection>, port: impl Into<String>) -> Self {
        Self {
            session: LineSession::new(serial),
            port: port.into(),
            decode_mode: DecodeMode::Permissive,
        }
    }

    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    /// Open `explicit_port` directly, or discover the controller (by exact
    /// serial number if given, else by the USC-3 vendor id) and open that.
    pub fn connect<F: SerialFactory>(
        explicit_port: Option<&str>,
        serial_number: Option<&str>,
    ) -> Usc3Result<Self> {
        let config = ControllerConfig {
            port: explicit_port.map(String::from),
            serial_number: serial_number.map(String::from),
            ..ControllerConfig::default()
        };
        Self::from_config::<F>(&config)
    }

    /// Connect using every setting in a controller profile.
    ///
    /// Discovery failure returns `DeviceNotFound` before any port is opened.
    pub fn from_config<F: SerialFactory>(config: &ControllerConfig) -> Usc3Result<Self> {
        let port = match &config.port {
            Some(port) => port.clone(),
            None => find_port::<F>(&DeviceFilter {
                serial_number: config.serial_number.as_deref(),
                vendor_id: config.vendor_id,
                selection: config.port_selection,
            })?,
        };

        let serial = F::open(&port, config.baud_rate)?;
        log::info!("Connected to USC-3 on {port} at {} baud", config.baud_rate);

        let session = LineSession::new(serial)
            .with_response_timeout(config.response_timeout_ms.map(Duration::from_millis));
        let decode_mode = if config.strict_status {
            DecodeMode::Strict
        } else {
            DecodeMode::Permissive
        };

        Ok(Self {
            session,
            port,
            decode_mode,
        })
    }

    /// Path of the port this client talks to.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn close(&mut self) -> Usc3Result<()> {
        log::info!("Closing USC-3 connection on {}", self.port);
        self.session.close()
    }

    /// Send a command and decode its reply.
    pub fn execute(&mut self, cmd: &Usc3Command) -> Usc3Result<DecodedResponse> {
        let frame = encode(cmd);
        let raw = self.session.transact(&frame)?;
        decode_with(&raw, self.decode_mode)
    }

    /// Send a command whose reply is a space-separated integer vector.
    fn query_vector(&mut self, cmd: &Usc3Command) -> Usc3Result<Vec<i64>> {
        match self.execute(cmd)? {
            DecodedResponse::Raw(payload) => parse_vector(&payload),
            DecodedResponse::Status(status) => Err(Usc3Error::StatusReply {
                code: status.code,
                description: status.description,
            }),
        }
    }

    // --- Jobs ---

    pub fn get_mark_time(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetMarkTime)
    }

    pub fn save_job(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::SaveJob)
    }

    pub fn load_job(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::LoadJob)
    }

    // --- Telemetry ---

    pub fn get_temperature(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetTemperature)
    }

    // --- Home position ---

    /// Current home position, one integer per axis.
    pub fn get_home_position(&mut self) -> Usc3Result<Vec<i64>> {
        self.query_vector(&Usc3Command::GetHomePosition)
    }

    /// Set the home position. At least one axis is required: a bare `HP`
    /// frame is the query and would be answered with the current position.
    pub fn set_home_position(&mut self, axes: &[i64]) -> Usc3Result<DecodedResponse> {
        if axes.is_empty() {
            return Err(Usc3Error::InvalidParameter(
                "home position needs at least one axis".to_string(),
            ));
        }
        self.execute(&Usc3Command::SetHomePosition(axes.to_vec()))
    }

    // --- Digital / analog I/O ---

    pub fn get_digital_out(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetDigitalOut)
    }

    /// Set outputs from a raw bit mask.
    pub fn set_digital_out(&mut self, mask: u32) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::SetDigitalOut(mask))
    }

    /// Set outputs from a list of 1-based output pins.
    pub fn set_digital_outputs(&mut self, pins: &[u8]) -> Usc3Result<DecodedResponse> {
        let mask = output_mask(pins)?;
        self.set_digital_out(mask)
    }

    pub fn get_digital_in(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetDigitalIn)
    }

    pub fn get_analog_in(&mut self, address: u32) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetAnalogIn(address))
    }

    // --- Pulse outputs ---

    pub fn get_pulse(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetPulse)
    }

    /// Pulse the given 1-based output pins, optionally for `width_us` microseconds.
    pub fn set_pulse(&mut self, outputs: &[u8], width_us: Option<u32>) -> Usc3Result<DecodedResponse> {
        let mask = output_mask(outputs)?;
        self.execute(&Usc3Command::SetPulse { mask, width_us })
    }

    // --- Marking ---

    pub fn run(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::Run)
    }

    pub fn stop(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::Stop)
    }

    pub fn get_loop_count(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetLoopCount)
    }

    pub fn set_loop_count(&mut self, loops: u32) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::SetLoopCount(loops))
    }

    /// Make `input_pin` disable the laser, recognized per `trigger_mode`.
    pub fn set_laser_disable_flag(
        &mut self,
        input_pin: u8,
        trigger_mode: TriggerMode,
    ) -> Usc3Result<DecodedResponse> {
        let word = disable_flag(input_pin, trigger_mode)?;
        self.execute(&Usc3Command::SetLaserDisableFlag(word))
    }

    // --- Laser source ---

    pub fn get_laser_status(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::GetLaserStatus)
    }

    /// Switch the laser source to RS-232 control mode.
    pub fn enable_rs232_control(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::EnableRs232Control)
    }

    pub fn set_pulse_rate(&mut self, khz: u32) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::SetPulseRate(khz))
    }

    pub fn set_power(&mut self, percent: u32) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::SetPower(percent))
    }

    pub fn laser_on(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::LaserOn)
    }

    pub fn laser_off(&mut self) -> Usc3Result<DecodedResponse> {
        self.execute(&Usc3Command::LaserOff)
    }
}
