//! In-memory serial connection for development and testing without hardware.
//!
//! `MockSerial` records every write and plays back scripted replies, one
//! reply per write, so a request/response exchange behaves like a real
//! half-duplex controller. Activate in the `usc3-probe` binary with USC3_MOCK=1:
//!
//!   USC3_MOCK=1 RUST_LOG=usc3_lib=debug cargo run --bin usc3-probe

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::{Usc3Error, Usc3Result};
use crate::ports::SerialConnection;

/// Shared view of everything written to a `MockSerial`, one entry per write.
pub type WriteLog = Arc<Mutex<Vec<String>>>;

pub struct MockSerial {
    log: WriteLog,
    replies: VecDeque<Vec<u8>>,
    pending: VecDeque<u8>,
    connected: bool,
}

impl MockSerial {
    /// Create a mock that answers successive writes with `replies`, in order.
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            replies: replies.into_iter().map(|r| r.as_ref().to_vec()).collect(),
            pending: VecDeque::new(),
            connected: true,
        }
    }

    /// Handle on the write log that stays valid after the mock is boxed.
    pub fn log(&self) -> WriteLog {
        Arc::clone(&self.log)
    }
}

impl SerialConnection for MockSerial {
    fn write(&mut self, data: &[u8]) -> Usc3Result<usize> {
        if !self.connected {
            return Err(Usc3Error::Serial("Write failed: port closed".into()));
        }
        log::info!("[MOCK USC-3] RX {:?}", String::from_utf8_lossy(data));
        self.log
            .lock()
            .map_err(|_| Usc3Error::Serial("Mock write log poisoned".into()))?
            .push(String::from_utf8_lossy(data).into());
        if let Some(reply) = self.replies.pop_front() {
            self.pending.extend(reply);
        }
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Usc3Result<usize> {
        if self.pending.is_empty() {
            // Nothing scripted: a real port would block, the mock reports it
            return Err(Usc3Error::Serial("Read failed: mock has no reply queued".into()));
        }
        let n = self.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn close(&mut self) -> Usc3Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
