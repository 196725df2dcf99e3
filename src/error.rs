use core::fmt::Debug;

use crate::command::{Command, CMD_FRAME_SIZE};
use crate::config::Mode;
use crate::SessionState;

/// Errors returned by the sensor, generic over the transport error `E`.
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: Debug,
{
    /// The device could not be opened (bad path, missing permissions).
    #[error("unable to open transport: {0}")]
    TransportOpen(String),

    /// A control command was rejected or only partially written.
    #[error("{command:?} command failed: {cause}")]
    CommandWrite {
        command: Command,
        cause: WriteFailure<E>,
    },

    /// A data frame could not be read in full.
    #[error("frame read failed: {0}")]
    TransportRead(ReadFailure<E>),

    /// The frame did not start with `0x42 0x4D`.
    #[error("frame starts with {found:02x?} instead of [42, 4d]")]
    Framing { found: [u8; 2] },

    /// The frame checksum does not match, only under `ChecksumPolicy::Reject`.
    #[error("checksum mismatch: frame says {expected:#06x}, computed {computed:#06x}")]
    Checksum { expected: u16, computed: u16 },

    /// The frame payload could not be decoded.
    #[error("frame decode failed: {0}")]
    Decode(scroll::Error),

    /// The session was closed and no longer owns a transport.
    #[error("session is closed")]
    SessionClosed,

    /// The operation is not valid in the current session state.
    #[error("operation not valid while session is {state:?}")]
    InvalidState { state: SessionState },

    /// The operation is not valid in the session's mode.
    #[error("operation not valid in {mode:?} mode")]
    WrongMode { mode: Mode },
}

#[derive(Debug, thiserror::Error)]
pub enum WriteFailure<E>
where
    E: Debug,
{
    #[error("only {0} of {max} bytes accepted", max = CMD_FRAME_SIZE)]
    Short(usize),
    #[error("transport error: {0:?}")]
    Transport(E),
}

#[derive(Debug, thiserror::Error)]
pub enum ReadFailure<E>
where
    E: Debug,
{
    #[error("got {got} of {expected} bytes")]
    Short { expected: usize, got: usize },
    #[error("transport error: {0:?}")]
    Transport(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_write_names_command_frame_size() {
        let failure: WriteFailure<()> = WriteFailure::Short(3);
        assert_eq!("only 3 of 7 bytes accepted", failure.to_string());
    }

    #[test]
    fn command_write_error_includes_cause() {
        let error: Error<()> = Error::CommandWrite {
            command: Command::Wake,
            cause: WriteFailure::Short(0),
        };
        assert!(error.to_string().contains("only 0 of 7 bytes accepted"));
    }
}
