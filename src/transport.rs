//! Byte stream the sensor is attached to.
//!
//! The sensor expects 9600 baud, 8 data bits, no parity and 1 stop bit. Configuring
//! the line is up to whoever opens the port.

use core::fmt::Debug;
use std::io::{self, ErrorKind};

use embedded_hal::serial::{Read, Write};
use nb::block;

///
/// Blocking duplex byte stream used by the sensor
///
pub trait Transport {
    type Error: Debug;

    /// Writes `bytes`, returning how many of them the device accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Blocks until `buf` is full and returns `buf.len()`. A smaller count means
    /// the stream ended or timed out first.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Releases the underlying device. Must be idempotent.
    fn close(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(bytes)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_exact(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Error of the embedded-hal adapters
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SerialError<RE, WE>
where
    RE: Debug,
    WE: Debug,
{
    #[error("serial read error: {0:?}")]
    Read(RE),
    #[error("serial write error: {0:?}")]
    Write(WE),
}

fn read_bytes<RX: Read<u8>>(rx: &mut RX, buf: &mut [u8]) -> Result<usize, RX::Error> {
    for byte in buf.iter_mut() {
        *byte = block!(rx.read())?;
    }
    Ok(buf.len())
}

fn write_bytes<TX: Write<u8>>(tx: &mut TX, bytes: &[u8]) -> Result<usize, TX::Error> {
    for byte in bytes {
        block!(tx.write(*byte))?;
    }
    block!(tx.flush())?;
    Ok(bytes.len())
}

///
/// Transport over a single object implementing embedded hal serial traits
///
pub struct HalSerial<Serial>(Serial);

impl<Serial> HalSerial<Serial>
where
    Serial: Read<u8> + Write<u8>,
{
    pub fn new(serial: Serial) -> Self {
        Self(serial)
    }

    pub fn into_inner(self) -> Serial {
        self.0
    }
}

impl<Serial> Transport for HalSerial<Serial>
where
    Serial: Read<u8> + Write<u8>,
    <Serial as Read<u8>>::Error: Debug,
    <Serial as Write<u8>>::Error: Debug,
{
    type Error = SerialError<<Serial as Read<u8>>::Error, <Serial as Write<u8>>::Error>;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        write_bytes(&mut self.0, bytes).map_err(SerialError::Write)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        read_bytes(&mut self.0, buf).map_err(SerialError::Read)
    }
}

///
/// Transport combining separate Read and Write embedded hal trait objects
///
pub struct TxRx<TX, RX>(TX, RX)
where
    TX: Write<u8>,
    RX: Read<u8>;

impl<TX, RX> TxRx<TX, RX>
where
    TX: Write<u8>,
    RX: Read<u8>,
{
    pub fn new(tx: TX, rx: RX) -> Self {
        Self(tx, rx)
    }

    pub fn into_inner(self) -> (TX, RX) {
        (self.0, self.1)
    }
}

impl<TX, RX> Transport for TxRx<TX, RX>
where
    TX: Write<u8>,
    RX: Read<u8>,
    TX::Error: Debug,
    RX::Error: Debug,
{
    type Error = SerialError<RX::Error, TX::Error>;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        write_bytes(&mut self.0, bytes).map_err(SerialError::Write)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        read_bytes(&mut self.1, buf).map_err(SerialError::Read)
    }
}

///
/// Transport over a `std::io` stream, e.g. a serial port crate handle or a pipe.
/// End of stream and read timeouts show up as short reads.
///
pub struct IoTransport<Stream>(Stream);

impl<Stream> IoTransport<Stream>
where
    Stream: io::Read + io::Write,
{
    pub fn new(stream: Stream) -> Self {
        Self(stream)
    }

    pub fn into_inner(self) -> Stream {
        self.0
    }
}

impl<Stream> Transport for IoTransport<Stream>
where
    Stream: io::Read + io::Write,
{
    type Error = io::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let written = loop {
            match io::Write::write(&mut self.0, bytes) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => break result?,
            }
        };
        io::Write::flush(&mut self.0)?;
        Ok(written)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match io::Read::read(&mut self.0, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::UnexpectedEof) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn close(&mut self) {
        // Nothing useful can be done about a failed flush on release.
        let _ = io::Write::flush(&mut self.0);
    }
}
