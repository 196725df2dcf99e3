//! Opening the sensor on a Linux tty.

use std::path::Path;

use linux_embedded_hal::serial_core::{
    BaudRate, CharSize, FlowControl, Parity, PortSettings, SerialPort, StopBits,
};
use linux_embedded_hal::Serial;

use crate::{
    Config, Error, HalSerial, LineParity, Pms7003Sensor, Transport, BAUD_RATE, DATA_BITS,
    PARITY, STOP_BITS,
};

pub type LinuxTransport = HalSerial<Serial>;
pub type LinuxSensor = Pms7003Sensor<LinuxTransport>;
pub type LinuxError = Error<<LinuxTransport as Transport>::Error>;

///
/// Port settings matching `BAUD_RATE`, `DATA_BITS`, `PARITY` and `STOP_BITS`, without flow control
///
pub fn line_settings() -> PortSettings {
    PortSettings {
        baud_rate: BaudRate::from_speed(BAUD_RATE as usize),
        char_size: match DATA_BITS {
            5 => CharSize::Bits5,
            6 => CharSize::Bits6,
            7 => CharSize::Bits7,
            _ => CharSize::Bits8,
        },
        parity: match PARITY {
            LineParity::None => Parity::ParityNone,
            LineParity::Odd => Parity::ParityOdd,
            LineParity::Even => Parity::ParityEven,
        },
        stop_bits: if STOP_BITS == 2 {
            StopBits::Stop2
        } else {
            StopBits::Stop1
        },
        flow_control: FlowControl::FlowNone,
    }
}

///
/// Opens the tty at `path`, switches it to the sensor's line settings and initializes the sensor.
///
pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<LinuxSensor, LinuxError> {
    let path = path.as_ref();
    let mut serial = Serial::open(path)
        .map_err(|e| Error::TransportOpen(format!("{}: {}", path.display(), e)))?;
    serial
        .0
        .configure(&line_settings())
        .map_err(|e| Error::TransportOpen(format!("{}: {}", path.display(), e)))?;

    Pms7003Sensor::initialize_with(HalSerial::new(serial), config)
}
