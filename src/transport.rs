use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout after {timeout:?} waiting for the response to '{command}'")]
    Timeout { command: String, timeout: Duration },

    #[error("Connection closed by the instrument")]
    ConnectionClosed,

    #[error("No response available for '{command}'")]
    NoResponse { command: String },

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A synchronous, ordered request/response channel to one instrument.
///
/// Implementations own framing (terminators) and timeouts. Responses are
/// returned as read from the wire, only the line terminator removed; callers
/// clean quoting and padding themselves.
pub trait ScpiTransport {
    /// Write a command without waiting for a response.
    fn send(&mut self, command: &str) -> Result<(), TransportError>;

    /// Write a query and block until one response line is read.
    fn query(&mut self, command: &str) -> Result<String, TransportError>;
}

impl<T: ScpiTransport + ?Sized> ScpiTransport for Box<T> {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        (**self).send(command)
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        (**self).query(command)
    }
}
