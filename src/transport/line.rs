//! Line-oriented transport over a byte stream.
//!
//! Commands are written with a terminator appended and flushed immediately. Responses are
//! read byte by byte until the response delimiter, so a second line already sitting in the
//! receive buffer is left for the next query.

use super::Transport;
use crate::error::TransportError;
use log::debug;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

#[cfg(feature = "instrument_serial")]
use crate::config::ConnectionConfig;
#[cfg(feature = "instrument_serial")]
use log::info;

/// Default time allowed for a complete response line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Terminator-delimited command link over any `Read + Write` stream.
pub struct LineTransport<S> {
    stream: S,
    name: String,
    terminator: String,
    response_delimiter: u8,
    timeout: Duration,
}

impl<S: Read + Write> LineTransport<S> {
    /// Wrap `stream`, using `name` in log messages.
    ///
    /// Default configuration:
    /// * timeout: 3 seconds
    /// * terminator: "\n"
    /// * response_delimiter: b'\n'
    pub fn new(stream: S, name: impl Into<String>) -> Self {
        Self {
            stream,
            name: name.into(),
            terminator: "\n".to_string(),
            response_delimiter: b'\n',
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the string appended to every command.
    #[must_use]
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    /// Set the byte that ends a response line.
    #[must_use]
    pub fn with_response_delimiter(mut self, delimiter: u8) -> Self {
        self.response_delimiter = delimiter;
        self
    }

    /// Set the time allowed for a complete response.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Give back the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn read_line(&mut self, command: &str) -> Result<String, TransportError> {
        let timeout_error = || TransportError::Timeout {
            command: command.to_string(),
            timeout: self.timeout,
        };
        let deadline = Instant::now() + self.timeout;
        let mut response = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            if Instant::now() > deadline {
                return Err(timeout_error());
            }
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(TransportError::UnexpectedEof(command.to_string())),
                Ok(_) => {
                    if byte[0] == self.response_delimiter {
                        break;
                    }
                    response.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut => return Err(timeout_error()),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(String::from_utf8_lossy(&response).trim().to_string())
    }
}

impl<S: Read + Write> Transport for LineTransport<S> {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let line = format!("{}{}", command, self.terminator);
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;
        debug!("[{}] Sent command: {}", self.name, command);
        Ok(())
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        self.send(command)?;
        let response = self.read_line(command)?;
        debug!("[{}] Received response: {}", self.name, response);
        Ok(response)
    }
}

/// Line transport over a serial port.
#[cfg(feature = "instrument_serial")]
pub type SerialTransport = LineTransport<Box<dyn serialport::SerialPort>>;

#[cfg(feature = "instrument_serial")]
impl LineTransport<Box<dyn serialport::SerialPort>> {
    /// Open the serial port described by `config`.
    pub fn open_serial(config: &ConnectionConfig) -> Result<Self, TransportError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(timeout)
            .open()?;
        info!(
            "Opened serial port '{}' at {} baud",
            config.port, config.baud_rate
        );

        Ok(LineTransport::new(port, config.port.clone())
            .with_terminator(config.terminator.clone())
            .with_timeout(timeout))
    }
}
