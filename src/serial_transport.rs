use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use crate::transport::{ScpiTransport, TransportError};

/// Per-read poll interval; the response timeout is enforced on top of it.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// SCPI over a serial line (`ASRL` resources).
///
/// Like [`TcpTransport`](crate::tcp_transport::TcpTransport), responses owed
/// to timed out queries are drained before the next query is sent.
pub struct SerialTransport {
    serial: Box<dyn SerialPort>,
    terminator: String,
    timeout: Duration,
    partial: Vec<u8>,
    unanswered: usize,
}

impl SerialTransport {
    pub fn open(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
        terminator: &str,
    ) -> Result<Self, TransportError> {
        log::debug!("Opening serial port {} at {} baud", path, baud_rate);
        let serial = serialport::new(path, baud_rate)
            .timeout(POLL_INTERVAL)
            .open()?;

        let mut transport = Self {
            serial,
            terminator: terminator.to_string(),
            timeout,
            partial: Vec::new(),
            unanswered: 0,
        };

        transport.flush()?;
        Ok(transport)
    }

    /// Drop anything left in the port buffers from a previous session.
    fn flush(&mut self) -> Result<(), TransportError> {
        self.serial.clear(serialport::ClearBuffer::All)?;
        Ok(())
    }

    /// Bytes read before a timeout are kept and completed by the next read.
    fn read_line(&mut self, command: &str) -> Result<String, TransportError> {
        let start = Instant::now();

        loop {
            let mut byte = [0u8; 1];
            match self.serial.read_exact(&mut byte) {
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    self.partial.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    if start.elapsed() >= self.timeout {
                        return Err(TransportError::Timeout {
                            command: command.to_string(),
                            timeout: self.timeout,
                        });
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut response = std::mem::take(&mut self.partial);
        if response.last() == Some(&b'\r') {
            response.pop();
        }
        Ok(String::from_utf8(response)?)
    }

    fn resync(&mut self, command: &str) -> Result<(), TransportError> {
        while self.unanswered > 0 {
            let stale = self.read_line(command)?;
            self.unanswered -= 1;
            log::warn!("Discarding late response {:?}", stale);
        }
        Ok(())
    }
}

impl ScpiTransport for SerialTransport {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let line = format!("{}{}", command, self.terminator);
        self.serial.write_all(line.as_bytes())?;
        self.serial.flush()?;
        Ok(())
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        self.resync(command)?;
        self.send(command)?;
        self.unanswered += 1;

        let line = self.read_line(command)?;
        self.unanswered -= 1;
        Ok(line)
    }
}
