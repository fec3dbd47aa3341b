//! Capability traits shared by electrometer drivers.

use crate::error::AppResult;
use crate::measurement::Reading;
use crate::units::{PhysicalUnit, Quantity};

/// Capability for instruments that measure small voltages, currents, resistances or charges.
pub trait Electrometer {
    /// Driver-specific measurement mode.
    type Mode;

    /// Active measurement mode.
    fn mode(&mut self) -> AppResult<Self::Mode>;
    /// Switch the measurement mode.
    fn set_mode(&mut self, mode: Self::Mode) -> AppResult<()>;
    /// Unit of readings in the active mode.
    fn unit(&mut self) -> AppResult<PhysicalUnit>;
    /// Full-scale range of the active mode.
    fn input_range(&mut self) -> AppResult<Quantity>;
    /// Select a full-scale range, validated against the active mode.
    fn set_input_range(&mut self, value: Quantity) -> AppResult<()>;
    /// Zero check state.
    fn zero_check(&mut self) -> AppResult<bool>;
    /// Enable or disable zero check.
    fn set_zero_check(&mut self, enabled: bool) -> AppResult<()>;
    /// Zero correct state.
    fn zero_correct(&mut self) -> AppResult<bool>;
    /// Enable or disable zero correct.
    fn set_zero_correct(&mut self, enabled: bool) -> AppResult<()>;
    /// Latest reading, without triggering.
    fn fetch(&mut self) -> AppResult<Reading>;
    /// Trigger and return a new reading.
    fn read(&mut self) -> AppResult<Reading>;
}

/// Trigger a new reading and tag it with the unit of the active mode.
///
/// The mode is read before the acquisition so the unit matches the reading.
pub fn read_quantity<E: Electrometer + ?Sized>(meter: &mut E) -> AppResult<Quantity> {
    let unit = meter.unit()?;
    let reading = meter.read()?;
    Ok(reading.quantity(unit))
}
