//! LineSession: owns a serial connection and moves whole lines over it.
//!
//! Writes CRLF-terminated command frames and reads LF-terminated replies.
//! Pure translation lives in `encode` / `decode`. LineSession only handles I/O.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::domain::{Usc3Error, Usc3Result};
use crate::ports::SerialConnection;

use super::decode::LINE_END;

/// Chunk size for each serial read call
const READ_CHUNK_SIZE: usize = 64;

/// Longest reply accepted without a terminator. Vector replies are a few
/// dozen bytes, so anything past this is line noise or a wrong baud rate.
pub const MAX_LINE_LEN: usize = 1024;

/// Owns a serial connection and exchanges lines with the controller.
pub struct LineSession {
    serial: Box<dyn SerialConnection>,
    /// Bytes read past the last LF, kept for the next reply
    pending: VecDeque<u8>,
    response_timeout: Option<Duration>,
}

impl LineSession {
    pub fn new(serial: Box<dyn SerialConnection>) -> Self {
        Self {
            serial,
            pending: VecDeque::new(),
            response_timeout: None,
        }
    }

    /// Bound how long `receive` waits for a terminator. Without this a
    /// silent device blocks the caller indefinitely.
    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Write one frame, exactly once.
    pub fn send(&mut self, frame: &str) -> Usc3Result<()> {
        log::debug!("USC-3 TX: {:?}", frame);
        self.serial
            .write(frame.as_bytes())
            .map_err(|e| Usc3Error::Serial(format!("Command {frame:?} write failed: {e}")))?;
        Ok(())
    }

    /// Read until an LF arrives and return everything up to and including it.
    ///
    /// Zero-byte reads are serial timeouts; keep waiting unless a response
    /// timeout was configured and has elapsed.
    pub fn receive(&mut self) -> Usc3Result<Vec<u8>> {
        let started = Instant::now();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            if let Some(end) = self.pending.iter().position(|&b| b == LINE_END) {
                let line: Vec<u8> = self.pending.drain(..=end).collect();
                log::debug!("USC-3 RX: {:?}", String::from_utf8_lossy(&line));
                return Ok(line);
            }

            if self.pending.len() > MAX_LINE_LEN {
                let dropped = self.pending.len();
                self.pending.clear();
                return Err(Usc3Error::InvalidResponse(format!(
                    "no line terminator within {MAX_LINE_LEN} bytes ({dropped} bytes discarded)"
                )));
            }

            if let Some(limit) = self.response_timeout {
                if started.elapsed() >= limit {
                    return Err(Usc3Error::Serial(format!(
                        "no response from controller within {} ms ({} bytes buffered)",
                        limit.as_millis(),
                        self.pending.len()
                    )));
                }
            }

            let n = self.serial.read(&mut chunk)?;
            self.pending.extend(&chunk[..n]);
        }
    }

    /// Send a frame and wait for its reply line.
    pub fn transact(&mut self, frame: &str) -> Usc3Result<Vec<u8>> {
        self.send(frame)?;
        self.receive()
    }

    /// Close the underlying port.
    pub fn close(&mut self) -> Usc3Result<()> {
        self.pending.clear();
        self.serial.close()
    }

    pub fn is_connected(&self) -> bool {
        self.serial.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_serial::MockSerial;
    use std::sync::{Arc, Mutex};

    // ---------------------------------------------------------------------------
    // StreamingSerial: hands out its bytes a few at a time, with idle reads
    // ---------------------------------------------------------------------------

    struct StreamingSerial {
        bytes: Vec<u8>,
        cursor: usize,
        step: usize,
        idle_reads: usize,
        reads: Arc<Mutex<usize>>,
    }

    impl SerialConnection for StreamingSerial {
        fn write(&mut self, data: &[u8]) -> Usc3Result<usize> {
            Ok(data.len())
        }
        fn read(&mut self, buf: &mut [u8]) -> Usc3Result<usize> {
            *self.reads.lock().unwrap() += 1;
            if self.idle_reads > 0 {
                self.idle_reads -= 1;
                return Ok(0);
            }
            let end = (self.cursor + self.step).min(self.bytes.len());
            let n = end - self.cursor;
            buf[..n].copy_from_slice(&self.bytes[self.cursor..end]);
            self.cursor = end;
            Ok(n)
        }
        fn close(&mut self) -> Usc3Result<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    fn streaming(bytes: &[u8], step: usize, idle_reads: usize) -> (LineSession, Arc<Mutex<usize>>) {
        let reads = Arc::new(Mutex::new(0));
        let serial = StreamingSerial {
            bytes: bytes.to_vec(),
            cursor: 0,
            step,
            idle_reads,
            reads: Arc::clone(&reads),
        };
        (LineSession::new(Box::new(serial)), reads)
    }

    #[test]
    fn send_writes_frame_once() {
        let mock = MockSerial::new(["0\n"]);
        let log = mock.log();
        let mut session = LineSession::new(Box::new(mock));
        session.send("POW 50\r\n").unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["POW 50\r\n".to_string()]);
    }

    #[test]
    fn receive_includes_terminator() {
        let mut session = LineSession::new(Box::new(MockSerial::new(["0\r\n"])));
        assert_eq!(session.transact("M 1\r\n").unwrap(), b"0\r\n");
    }

    #[test]
    fn receive_accumulates_partial_reads() {
        let reply = b"12345 67890 -13579 24680 11111 22222 33333 44444 55555 66666 77777\n";
        assert!(reply.len() > READ_CHUNK_SIZE);
        let (mut session, _) = streaming(reply, 1, 0);
        assert_eq!(session.receive().unwrap(), reply.to_vec());
    }

    #[test]
    fn receive_waits_through_idle_reads() {
        let (mut session, reads) = streaming(b"42\n", 2, 10);
        assert_eq!(session.receive().unwrap(), b"42\n");
        assert_eq!(*reads.lock().unwrap(), 12);
    }

    #[test]
    fn bytes_after_terminator_are_kept_for_next_reply() {
        let (mut session, _) = streaming(b"0\n7\n", 4, 0);
        assert_eq!(session.receive().unwrap(), b"0\n");
        assert_eq!(session.receive().unwrap(), b"7\n");
    }

    #[test]
    fn response_timeout_stops_waiting() {
        let (session, _) = streaming(b"", 1, usize::MAX);
        let mut session = session.with_response_timeout(Some(Duration::from_millis(20)));
        let err = session.receive().unwrap_err();
        assert!(err.to_string().contains("no response"), "{err}");
    }

    #[test]
    fn unterminated_stream_is_cut_off() {
        let noise = vec![b'x'; MAX_LINE_LEN * 4];
        let (mut session, reads) = streaming(&noise, READ_CHUNK_SIZE, 0);
        let err = session.receive().unwrap_err();
        assert!(matches!(err, Usc3Error::InvalidResponse(_)), "{err}");
        assert!(*reads.lock().unwrap() <= MAX_LINE_LEN / READ_CHUNK_SIZE + 1);
        assert!(session.pending.is_empty());
    }

    #[test]
    fn read_error_propagates() {
        let mut session = LineSession::new(Box::new(MockSerial::new(Vec::<&str>::new())));
        assert!(matches!(session.receive(), Err(Usc3Error::Serial(_))));
    }
}
