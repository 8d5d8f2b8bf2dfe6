use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::transport::{ScpiTransport, TransportError};

/// Raw SCPI socket port of X-Series analyzers.
pub const DEFAULT_SCPI_PORT: u16 = 5025;

/// SCPI over a raw TCP socket (`TCPIP::<host>::<port>::SOCKET` resources).
///
/// A query that times out still owes a response line. It is read and dropped
/// before the next query is sent, so responses never shift onto later queries.
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    terminator: String,
    timeout: Duration,
    /// Bytes of a response line read before a timeout.
    partial: Vec<u8>,
    /// Queries sent whose response has not been read yet.
    unanswered: usize,
}

impl TcpTransport {
    pub fn connect(
        host: &str,
        port: u16,
        timeout: Duration,
        terminator: &str,
    ) -> Result<Self, TransportError> {
        log::debug!("Connecting to {}:{}", host, port);

        let mut last_error = None;
        let mut stream = None;
        for addr in (host, port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    log::debug!("Connecting to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        let stream = match (stream, last_error) {
            (Some(stream), _) => stream,
            (None, Some(e)) => return Err(e.into()),
            (None, None) => {
                return Err(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("{} did not resolve to any address", host),
                )
                .into())
            }
        };

        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            terminator: terminator.to_string(),
            timeout,
            partial: Vec::new(),
            unanswered: 0,
        })
    }

    fn read_line(&mut self, command: &str) -> Result<String, TransportError> {
        match self.reader.read_until(b'\n', &mut self.partial) {
            Ok(_) if self.partial.last() == Some(&b'\n') => {
                let line = String::from_utf8(std::mem::take(&mut self.partial))?;
                Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
            }
            Ok(_) => Err(TransportError::ConnectionClosed),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Err(TransportError::Timeout {
                    command: command.to_string(),
                    timeout: self.timeout,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop responses still owed to queries that timed out.
    fn resync(&mut self, command: &str) -> Result<(), TransportError> {
        while self.unanswered > 0 {
            let stale = self.read_line(command)?;
            self.unanswered -= 1;
            log::warn!("Discarding late response {:?}", stale);
        }
        Ok(())
    }
}

impl ScpiTransport for TcpTransport {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let line = format!("{}{}", command, self.terminator);
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
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
