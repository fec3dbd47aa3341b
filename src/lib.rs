//! Core library for the electrometer_daq crate.
//!
//! A typed access layer for the Keithley 6514 electrometer. Each setting is exposed as a
//! typed accessor that translates into one SCPI command, and range requests are checked
//! against the instrument's per-mode range tables before anything reaches the wire.
//!
//! - [`units`]: physical quantities with SI prefixes
//! - [`property`]: reusable enum/boolean SCPI property adapters
//! - [`transport`]: the command link (mock and line-oriented implementations)
//! - [`instrument`]: the Keithley 6514 driver and the `Electrometer` capability
//! - [`measurement`]: parsed readings
//! - [`config`]: file and environment configuration

pub mod config;
pub mod error;
pub mod instrument;
pub mod measurement;
pub mod property;
pub mod transport;
pub mod units;

pub use error::{AppResult, ElectrometerError, TransportError};
