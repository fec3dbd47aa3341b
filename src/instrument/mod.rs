//! Instrument drivers.
//!
//! Drivers compose [`crate::property`] adapters and a borrowed
//! [`crate::transport::Transport`] into typed accessors for one instrument model.

pub mod capabilities;
pub mod keithley6514;

pub use capabilities::{read_quantity, Electrometer};
pub use keithley6514::Keithley6514;
