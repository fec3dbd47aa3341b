//! Custom error types for the electrometer access layer.
//!
//! This module defines the primary error type, `ElectrometerError`, together with the
//! `TransportError` raised by the byte-level link. Using the `thiserror` crate, it provides
//! a single place where every failure of a property access is classified.
//!
//! ## Error Hierarchy
//!
//! - **`Transport`**: Wraps `TransportError` (I/O, timeouts, EOF, serial port failures).
//!   Never recovered locally; retries, if any, belong to the transport.
//! - **`Protocol`**: The instrument answered with a token or number the driver does not
//!   recognise. Usually a firmware mismatch or a corrupted line.
//! - **`UnitMismatch`**: The caller supplied a quantity whose dimension does not match the
//!   active measurement mode.
//! - **`Range`**: The requested full-scale range is not one of the discrete values the
//!   instrument accepts in the active mode.
//! - **`Configuration`**: Invalid names, quantity strings or settings supplied by the user.
//!
//! `UnitMismatch` and `Range` are always raised before any command is written, so a
//! rejected request never leaves the instrument half-configured.

use crate::instrument::keithley6514::Mode;
use crate::units::PhysicalUnit;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, ElectrometerError>;

/// Failures of the command link itself.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Reading from or writing to the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No complete response arrived in time.
    #[error("Timed out after {timeout:?} waiting for a response to '{command}'")]
    Timeout {
        /// Command whose response never arrived.
        command: String,
        /// Timeout that was exceeded.
        timeout: Duration,
    },

    /// The stream closed before a terminator was received.
    #[error("Unexpected EOF while waiting for a response to '{0}'")]
    UnexpectedEof(String),

    /// The serial port could not be opened.
    #[cfg(feature = "instrument_serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Failure injected by the in-memory mock transport.
    #[error("Injected transport failure on '{0}'")]
    Injected(String),

    /// The mock transport has neither a stored value nor a scripted reply for a query.
    #[error("No response available for '{0}'")]
    NoResponse(String),
}

/// Primary error type for every operation on an electrometer.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ElectrometerError {
    /// The link to the instrument failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The instrument replied with something the driver cannot interpret.
    #[error("Protocol error: unrecognized response token '{response}' to '{command}'")]
    Protocol {
        /// Command that produced the response.
        command: String,
        /// Trimmed response text.
        response: String,
    },

    /// The supplied quantity has the wrong physical dimension for the active mode.
    #[error("Unit mismatch: expected a value in {expected}, got {found}")]
    UnitMismatch {
        /// Unit required by the active mode.
        expected: PhysicalUnit,
        /// Unit of the supplied value.
        found: PhysicalUnit,
    },

    /// The value is not one of the instrument's full-scale ranges.
    #[error("Range error: {value:e} {unit} is not a supported range for {mode} mode")]
    Range {
        /// Active measurement mode.
        mode: Mode,
        /// Rejected magnitude, in the mode's unit.
        value: f64,
        /// Unit of the rejected magnitude.
        unit: PhysicalUnit,
    },

    /// Invalid user-supplied names, quantities or settings.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ElectrometerError {
    pub(crate) fn protocol(command: &str, response: &str) -> Self {
        Self::Protocol {
            command: command.to_string(),
            response: response.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ElectrometerError::protocol("FUNCTION?", "BOGUS");
        assert_eq!(
            err.to_string(),
            "Protocol error: unrecognized response token 'BOGUS' to 'FUNCTION?'"
        );
    }

    #[test]
    fn test_transport_error_wraps() {
        let err: ElectrometerError = TransportError::UnexpectedEof("READ?".into()).into();
        assert!(matches!(err, ElectrometerError::Transport(_)));
        assert!(err.to_string().contains("READ?"));
    }

    #[test]
    fn test_range_error_names_mode() {
        let err = ElectrometerError::Range {
            mode: Mode::Current,
            value: 3e-9,
            unit: PhysicalUnit::Ampere,
        };
        let text = err.to_string();
        assert!(text.contains("not a supported range"));
        assert!(text.contains("current"));
    }
}
