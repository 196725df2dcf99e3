/// Operating mode of the sensor, fixed for the lifetime of a session.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Mode {
    /// The sensor pushes frames continuously.
    Active,
    /// The sensor answers on request. Frames are still read with a plain blocking
    /// read since the sensor keeps streaming in practice.
    Passive,
}

/// What `read` does with a frame whose trailing checksum does not match.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum ChecksumPolicy {
    /// Return the reading and report the mismatch in `Measurement::checksum_valid`.
    Report,
    /// Fail the read with `Error::Checksum`.
    Reject,
}

/// How `read` locates the start of a frame.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum FrameSync {
    /// Take the next 32 bytes as a frame; wrong start bytes fail the read.
    Strict,
    /// Discard bytes until `0x42 0x4D` is seen, giving up after `max_skipped` bytes.
    Scan { max_skipped: usize },
}

/// Number of bytes `FrameSync::scan` discards before giving up.
pub const DEFAULT_MAX_SKIPPED: usize = 100;

impl FrameSync {
    pub fn scan() -> Self {
        FrameSync::Scan {
            max_skipped: DEFAULT_MAX_SKIPPED,
        }
    }
}

/// Session configuration for the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// The operating mode selected during initialization.
    pub mode: Mode,
    /// Checksum mismatch handling.
    pub checksum: ChecksumPolicy,
    /// Frame start handling.
    pub sync: FrameSync,
}

impl Config {
    /// Creates a new `Config` with the given mode, reporting checksum mismatches and
    /// reading frames strictly.
    pub fn new(mode: Mode) -> Config {
        Config {
            mode,
            checksum: ChecksumPolicy::Report,
            sync: FrameSync::Strict,
        }
    }

    /// Sets the operating mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the checksum mismatch policy.
    pub fn checksum(mut self, checksum: ChecksumPolicy) -> Self {
        self.checksum = checksum;
        self
    }

    /// Sets the frame synchronization policy.
    pub fn sync(mut self, sync: FrameSync) -> Self {
        self.sync = sync;
        self
    }
}

/// Active mode is what the sensor uses after power-on.
impl Default for Config {
    fn default() -> Config {
        Config::new(Mode::Active)
    }
}

impl From<Mode> for Config {
    fn from(mode: Mode) -> Self {
        Config::new(mode)
    }
}
