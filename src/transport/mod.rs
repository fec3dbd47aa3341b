//! Command transports.
//!
//! A [`Transport`] moves one command line to the instrument and, for queries, one response
//! line back. Framing, timeouts and port handling live entirely behind this trait; the
//! property and instrument layers only ever see whole command strings.
//!
//! Implementations:
//! - [`MockTransport`]: deterministic in-memory stand-in with a call log, for tests.
//! - [`LineTransport`]: terminator-delimited lines over any `Read + Write` stream, with a
//!   serial port constructor behind the `instrument_serial` feature.

pub mod line;
pub mod mock;

pub use line::LineTransport;
#[cfg(feature = "instrument_serial")]
pub use line::SerialTransport;
pub use mock::{MockTransport, TransportCall};

use crate::error::TransportError;

/// Synchronous, ordered command link to one instrument.
///
/// Commands are delivered in the order they are issued; implementations must not
/// reorder or batch them, since later commands depend on state set by earlier ones.
/// Sharing one transport between threads requires external serialization.
pub trait Transport {
    /// Send a command that produces no response.
    fn send(&mut self, command: &str) -> Result<(), TransportError>;

    /// Send a command and return its response line.
    fn query(&mut self, command: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        (**self).send(command)
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        (**self).query(command)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        (**self).send(command)
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        (**self).query(command)
    }
}
