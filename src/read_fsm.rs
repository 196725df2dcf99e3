use crate::frame::START_BYTES;

#[derive(PartialEq, Debug)]
pub(crate) enum ReadStatus {
    InProgress,
    Finished,
    Failed,
}

enum State {
    WaitingForFirstMagicNumber,
    WaitingForSecondMagicNumber,
    Reading,
    Finished,
    Failed,
}

///
/// Assembles a frame from single bytes, discarding everything before the magic number.
///
pub(crate) struct ReadStateMachine<'a> {
    buffer: &'a mut [u8],
    index: usize,
    state: State,
    skips_left: usize,
    last: [u8; 2],
}

impl<'a> ReadStateMachine<'a> {
    pub(crate) fn new(buffer: &'a mut [u8], max_skipped: usize) -> Self {
        Self {
            buffer,
            index: 0,
            state: State::WaitingForFirstMagicNumber,
            skips_left: max_skipped,
            last: [0; 2],
        }
    }

    /// Last two bytes seen, reported when no magic number turned up
    pub(crate) fn last_seen(&self) -> [u8; 2] {
        self.last
    }

    fn skip(&mut self) {
        if self.skips_left == 0 {
            self.state = State::Failed;
        } else {
            self.skips_left -= 1;
        }
    }

    fn magic_number_read(&mut self) {
        self.index = 2;
        self.buffer[0] = START_BYTES[0];
        self.buffer[1] = START_BYTES[1];
        self.state = State::Reading;
    }

    fn byte_read(&mut self, byte: u8) {
        self.buffer[self.index] = byte;
        self.index += 1;
        if self.index == self.buffer.len() {
            self.state = State::Finished;
        }
    }

    pub(crate) fn update(&mut self, byte: u8) -> ReadStatus {
        self.last = [self.last[1], byte];

        match self.state {
            State::WaitingForFirstMagicNumber => match byte {
                b if b == START_BYTES[0] => self.state = State::WaitingForSecondMagicNumber,
                _ => self.skip(),
            },
            State::WaitingForSecondMagicNumber => match byte {
                b if b == START_BYTES[1] => self.magic_number_read(),
                // The pending first byte is dropped, this one may start the frame.
                b if b == START_BYTES[0] => self.skip(),
                _ => {
                    self.skip();
                    self.skip();
                    if let State::WaitingForSecondMagicNumber = self.state {
                        self.state = State::WaitingForFirstMagicNumber;
                    }
                }
            },
            State::Reading => self.byte_read(byte),
            _ => {}
        };

        match self.state {
            State::WaitingForFirstMagicNumber
            | State::WaitingForSecondMagicNumber
            | State::Reading => ReadStatus::InProgress,
            State::Finished => ReadStatus::Finished,
            State::Failed => ReadStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(fsm: &mut ReadStateMachine, bytes: &[u8]) -> ReadStatus {
        let mut status = ReadStatus::InProgress;
        for byte in bytes {
            status = fsm.update(*byte);
        }
        status
    }

    #[test]
    fn read_is_in_progress_until_finished() {
        let mut buffer = [0u8; 2];
        let mut fsm = ReadStateMachine::new(&mut buffer, 0);
        assert_eq!(ReadStatus::InProgress, fsm.update(0x42));
    }

    #[test]
    fn read_is_finished_when_required_number_of_bytes_read() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 0);

        fsm.update(0x42);
        fsm.update(0x4D);
        fsm.update(0x11);

        assert_eq!(ReadStatus::Finished, fsm.update(0x33));
        assert_eq!([0x42, 0x4D, 0x11, 0x33], buffer);
    }

    #[test]
    fn ignores_everything_until_magic_number_is_read() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 5);

        let status = feed(&mut fsm, &[0x00, 0x00, 0x00, 0x00, 0x00, 0x42, 0x4D, 0x11, 0x33]);

        assert_eq!(ReadStatus::Finished, status);
        assert_eq!([0x42, 0x4D, 0x11, 0x33], buffer);
    }

    #[test]
    fn if_second_magic_number_is_not_received_just_after_the_first_one_reset() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 2);

        let status = feed(&mut fsm, &[0x42, 0x00, 0x42, 0x4D, 0x11, 0x33]);

        assert_eq!(ReadStatus::Finished, status);
        assert_eq!([0x42, 0x4D, 0x11, 0x33], buffer);
    }

    #[test]
    fn repeated_first_magic_number_still_starts_a_frame() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 1);

        let status = feed(&mut fsm, &[0x42, 0x42, 0x4D, 0x11, 0x33]);

        assert_eq!(ReadStatus::Finished, status);
        assert_eq!([0x42, 0x4D, 0x11, 0x33], buffer);
    }

    #[test]
    fn if_magic_number_is_not_received_fail_after_n_skipped_bytes() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 3);

        assert_eq!(ReadStatus::InProgress, feed(&mut fsm, &[0x00, 0x01, 0x02]));
        assert_eq!(ReadStatus::Failed, fsm.update(0x33));
        assert_eq!([0x02, 0x33], fsm.last_seen());
    }

    #[test]
    fn magic_number_in_the_payload_is_plain_data() {
        let mut buffer = [0u8; 4];
        let mut fsm = ReadStateMachine::new(&mut buffer, 0);

        let status = feed(&mut fsm, &[0x42, 0x4D, 0x42, 0x4D]);

        assert_eq!(ReadStatus::Finished, status);
        assert_eq!([0x42, 0x4D, 0x42, 0x4D], buffer);
    }
}
