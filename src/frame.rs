use core::fmt::Debug;

use scroll::{ctx::TryFromCtx, Endian, Pread, BE};

use crate::error::Error;

pub const OUTPUT_FRAME_SIZE: usize = 32;
pub const START_BYTES: [u8; 2] = [0x42, 0x4d];

const CHECKSUM_OFFSET: usize = OUTPUT_FRAME_SIZE - 2;

///
/// Decoded data frame. Concentrations are in µg/m³, particle counts are per 0.1 L of air.
///
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    pub frame_length: u16,
    /// PM1.0, CF=1 standard particle
    pub pm1_0: u16,
    /// PM2.5, CF=1 standard particle
    pub pm2_5: u16,
    /// PM10, CF=1 standard particle
    pub pm10: u16,
    /// PM1.0, atmospheric environment
    pub pm1_0_atm: u16,
    /// PM2.5, atmospheric environment
    pub pm2_5_atm: u16,
    /// PM10, atmospheric environment
    pub pm10_atm: u16,
    /// Particles beyond 0.3 µm
    pub beyond_0_3: u16,
    /// Particles beyond 0.5 µm
    pub beyond_0_5: u16,
    /// Particles beyond 1.0 µm
    pub beyond_1_0: u16,
    /// Particles beyond 2.5 µm
    pub beyond_2_5: u16,
    /// Particles beyond 5.0 µm
    pub beyond_5_0: u16,
    /// Particles beyond 10 µm
    pub beyond_10_0: u16,
    pub reserved: u16,
    /// Checksum as transmitted by the sensor
    pub checksum: u16,
}

impl<'a> TryFromCtx<'a, Endian> for SensorReading {
    type Error = scroll::Error;

    fn try_from_ctx(src: &'a [u8], endian: Endian) -> Result<(Self, usize), Self::Error> {
        let offset = &mut 0;
        let reading = SensorReading {
            frame_length: src.gread_with(offset, endian)?,
            pm1_0: src.gread_with(offset, endian)?,
            pm2_5: src.gread_with(offset, endian)?,
            pm10: src.gread_with(offset, endian)?,
            pm1_0_atm: src.gread_with(offset, endian)?,
            pm2_5_atm: src.gread_with(offset, endian)?,
            pm10_atm: src.gread_with(offset, endian)?,
            beyond_0_3: src.gread_with(offset, endian)?,
            beyond_0_5: src.gread_with(offset, endian)?,
            beyond_1_0: src.gread_with(offset, endian)?,
            beyond_2_5: src.gread_with(offset, endian)?,
            beyond_5_0: src.gread_with(offset, endian)?,
            beyond_10_0: src.gread_with(offset, endian)?,
            reserved: src.gread_with(offset, endian)?,
            checksum: src.gread_with(offset, endian)?,
        };
        Ok((reading, *offset))
    }
}

///
/// Result of a frame read: the decoded reading and whether its checksum matched.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub reading: SensorReading,
    /// Sum of bytes 0..30 as computed on the host
    pub computed_checksum: u16,
    pub checksum_valid: bool,
}

///
/// Wrapping 16 bit sum of every byte before the trailing checksum
///
pub fn checksum(frame: &[u8; OUTPUT_FRAME_SIZE]) -> u16 {
    frame[..CHECKSUM_OFFSET]
        .iter()
        .fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)))
}

pub(crate) fn decode<E: Debug>(
    buffer: &[u8; OUTPUT_FRAME_SIZE],
) -> Result<Measurement, Error<E>> {
    let found = [buffer[0], buffer[1]];
    if found != START_BYTES {
        return Err(Error::Framing { found });
    }

    let reading: SensorReading = buffer
        .pread_with(START_BYTES.len(), BE)
        .map_err(Error::Decode)?;
    let computed_checksum = checksum(buffer);

    Ok(Measurement {
        reading,
        computed_checksum,
        checksum_valid: computed_checksum == reading.checksum,
    })
}
