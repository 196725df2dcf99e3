//! Driver for the Plantower PMS7003 particulate matter sensor.
//!
//! The sensor talks a fixed binary protocol over a 9600 baud, 8-N-1 UART: 7 byte
//! control commands go out, 32 byte data frames come back. [`Pms7003Sensor`] owns the
//! [`Transport`] for the whole session and keeps track of whether the sensor was
//! initialized, put to sleep or released.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pms_7003::{IoTransport, Mode, Pms7003Sensor};
//!
//! let port = std::fs::OpenOptions::new()
//!     .read(true)
//!     .write(true)
//!     .open("/dev/ttyUSB0")?;
//! let mut sensor = Pms7003Sensor::initialize(IoTransport::new(port), Mode::Active)?;
//! let measurement = sensor.read()?;
//! println!("PM2.5: {}", measurement.reading.pm2_5_atm);
//! # Ok(())
//! # }
//! ```

use log::{debug, trace};

mod command;
pub use command::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod frame;
pub use frame::{checksum, Measurement, SensorReading, OUTPUT_FRAME_SIZE, START_BYTES};

mod read_fsm;
use read_fsm::{ReadStateMachine, ReadStatus};

mod transport;
pub use transport::*;

#[cfg(feature = "linux")]
pub mod linux;

/// Parity setting of a serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineParity {
    None,
    Odd,
    Even,
}

/// Baud rate the sensor talks at.
pub const BAUD_RATE: u32 = 9600;
/// Data bits per character.
pub const DATA_BITS: u8 = 8;
/// The sensor sends no parity bit.
pub const PARITY: LineParity = LineParity::None;
/// Stop bits per character.
pub const STOP_BITS: u8 = 1;

/// Lifecycle of a sensor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport attached, no command sent yet.
    Created,
    /// Mode selected and sensor awake, frames can be read.
    Ready,
    /// Sensor put to sleep, must be woken before reading.
    Sleeping,
    /// Transport released.
    Closed,
}

pub struct Pms7003Sensor<T>
where
    T: Transport,
{
    transport: Option<T>,
    config: Config,
    state: SessionState,
}

impl<T> Pms7003Sensor<T>
where
    T: Transport,
{
    ///
    /// Creates a new sensor instance without talking to the device. Call `init` before reading.
    ///
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport: Some(transport),
            config,
            state: SessionState::Created,
        }
    }

    ///
    /// Creates a sensor instance, selects `mode` and wakes the sensor up.
    ///
    pub fn initialize(transport: T, mode: Mode) -> Result<Self, Error<T::Error>> {
        Self::initialize_with(transport, Config::from(mode))
    }

    ///
    /// Same as `initialize`, with checksum and framing policies taken from `config`.
    ///
    pub fn initialize_with(transport: T, config: Config) -> Result<Self, Error<T::Error>> {
        let mut sensor = Self::new(transport, config);
        sensor.init()?;
        Ok(sensor)
    }

    ///
    /// Sends the mode command followed by a wake command. On failure the session stays
    /// uninitialized and cannot be read from.
    ///
    pub fn init(&mut self) -> Result<(), Error<T::Error>> {
        self.check_state(&[SessionState::Created])?;

        self.send_cmd(Command::for_mode(self.config.mode))?;
        // The sensor may have been left asleep by a previous session.
        self.send_cmd(Command::Wake)?;

        self.state = SessionState::Ready;
        debug!("Sensor initialized in {:?} mode", self.config.mode);
        Ok(())
    }

    ///
    /// Reads and decodes one frame. Blocks until the transport delivers it.
    ///
    /// Each call consumes exactly one frame from the stream, nothing is buffered between
    /// calls. Under `ChecksumPolicy::Report` a checksum mismatch is only reported through
    /// `Measurement::checksum_valid`.
    ///
    pub fn read(&mut self) -> Result<Measurement, Error<T::Error>> {
        self.check_state(&[SessionState::Ready])?;

        let mut buffer = [0_u8; OUTPUT_FRAME_SIZE];
        match self.config.sync {
            FrameSync::Strict => self.fill(&mut buffer)?,
            FrameSync::Scan { max_skipped } => self.scan(&mut buffer, max_skipped)?,
        }
        trace!("Received frame: {:02x?}", buffer);

        let measurement = frame::decode(&buffer)?;
        if !measurement.checksum_valid {
            match self.config.checksum {
                ChecksumPolicy::Report => debug!(
                    "Checksum mismatch: frame says {:#06x}, computed {:#06x}",
                    measurement.reading.checksum, measurement.computed_checksum
                ),
                ChecksumPolicy::Reject => {
                    return Err(Error::Checksum {
                        expected: measurement.reading.checksum,
                        computed: measurement.computed_checksum,
                    })
                }
            }
        }

        Ok(measurement)
    }

    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        self.check_state(&[SessionState::Ready, SessionState::Sleeping])?;
        self.send_cmd(Command::Sleep)?;
        self.state = SessionState::Sleeping;
        Ok(())
    }

    ///
    /// Wakes the sensor up. Safe to call on an awake sensor.
    ///
    pub fn wake(&mut self) -> Result<(), Error<T::Error>> {
        self.check_state(&[SessionState::Ready, SessionState::Sleeping])?;
        self.send_cmd(Command::Wake)?;
        self.state = SessionState::Ready;
        Ok(())
    }

    ///
    /// Requests a frame in passive mode
    ///
    pub fn request(&mut self) -> Result<(), Error<T::Error>> {
        self.check_state(&[SessionState::Ready])?;
        if self.config.mode != Mode::Passive {
            return Err(Error::WrongMode {
                mode: self.config.mode,
            });
        }
        self.send_cmd(Command::RequestRead)
    }

    ///
    /// Switches the sensor to `mode`, consuming this session and returning one in the new mode.
    ///
    pub fn into_mode(mut self, mode: Mode) -> Result<Self, Error<T::Error>> {
        self.check_state(&[SessionState::Ready])?;
        self.send_cmd(Command::for_mode(mode))?;

        Ok(Self {
            transport: self.transport.take(),
            config: self.config.mode(mode),
            state: self.state,
        })
    }

    ///
    /// Releases the transport and hands it back. Every later call fails with
    /// `Error::SessionClosed`.
    ///
    pub fn close(&mut self) -> Result<T, Error<T::Error>> {
        let mut transport = self.transport.take().ok_or(Error::SessionClosed)?;
        transport.close();
        self.state = SessionState::Closed;
        debug!("Transport released");
        Ok(transport)
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn check_state(&self, allowed: &[SessionState]) -> Result<(), Error<T::Error>> {
        if self.state == SessionState::Closed {
            return Err(Error::SessionClosed);
        }
        if !allowed.contains(&self.state) {
            return Err(Error::InvalidState { state: self.state });
        }
        Ok(())
    }

    fn transport(&mut self) -> Result<&mut T, Error<T::Error>> {
        self.transport.as_mut().ok_or(Error::SessionClosed)
    }

    fn send_cmd(&mut self, command: Command) -> Result<(), Error<T::Error>> {
        let bytes = command.bytes();
        debug!("Sending {:?} command: {:02x?}", command, bytes);

        let written = self
            .transport()?
            .write(&bytes)
            .map_err(|e| Error::CommandWrite {
                command,
                cause: WriteFailure::Transport(e),
            })?;
        if written < CMD_FRAME_SIZE {
            return Err(Error::CommandWrite {
                command,
                cause: WriteFailure::Short(written),
            });
        }
        Ok(())
    }

    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        let got = self
            .transport()?
            .read_exact(buffer)
            .map_err(|e| Error::TransportRead(ReadFailure::Transport(e)))?;
        if got < buffer.len() {
            return Err(Error::TransportRead(ReadFailure::Short {
                expected: buffer.len(),
                got,
            }));
        }
        Ok(())
    }

    fn scan(
        &mut self,
        buffer: &mut [u8; OUTPUT_FRAME_SIZE],
        max_skipped: usize,
    ) -> Result<(), Error<T::Error>> {
        let mut fsm = ReadStateMachine::new(buffer, max_skipped);
        let mut byte = [0_u8; 1];

        loop {
            self.fill(&mut byte)?;
            match fsm.update(byte[0]) {
                ReadStatus::InProgress => continue,
                ReadStatus::Finished => return Ok(()),
                ReadStatus::Failed => {
                    return Err(Error::Framing {
                        found: fsm.last_seen(),
                    })
                }
            }
        }
    }
}
