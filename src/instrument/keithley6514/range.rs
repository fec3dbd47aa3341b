//! Units and full-scale range tables per measurement mode.
//!
//! The instrument only accepts a fixed, discrete set of full-scale ranges in each mode.
//! Requests are checked against these tables before anything is written to the link.

use super::modes::Mode;
use crate::error::{AppResult, ElectrometerError};
use crate::units::{PhysicalUnit, Quantity};
use log::debug;

/// One row of the mode table.
#[derive(Debug)]
pub struct ModeEntry {
    /// Mode this row describes.
    pub mode: Mode,
    /// Protocol keyword (`FUNCTION` token and command prefix).
    pub keyword: &'static str,
    /// Unit of readings and ranges.
    pub unit: PhysicalUnit,
    /// Legal full-scale ranges, ascending, in `unit`.
    pub ranges: &'static [f64],
}

/// Mode table, indexed by `Mode as usize`.
pub static MODE_TABLE: [ModeEntry; 4] = [
    ModeEntry {
        mode: Mode::Voltage,
        keyword: "VOLT",
        unit: PhysicalUnit::Volt,
        ranges: &[2.0, 20.0, 200.0],
    },
    ModeEntry {
        mode: Mode::Current,
        keyword: "CURR",
        unit: PhysicalUnit::Ampere,
        ranges: &[
            20e-12, 200e-12, 2e-9, 20e-9, 200e-9, 2e-6, 20e-6, 200e-6, 2e-3, 20e-3,
        ],
    },
    ModeEntry {
        mode: Mode::Resistance,
        keyword: "RES",
        unit: PhysicalUnit::Ohm,
        ranges: &[2e3, 20e3, 200e3, 2e6, 20e6, 200e6, 2e9, 20e9, 200e9],
    },
    ModeEntry {
        mode: Mode::Charge,
        keyword: "CHAR",
        unit: PhysicalUnit::Coulomb,
        ranges: &[20e-9, 200e-9, 2e-6, 20e-6],
    },
];

/// Table row for `mode`.
#[must_use]
pub fn entry_for(mode: Mode) -> &'static ModeEntry {
    &MODE_TABLE[mode as usize]
}

/// Unit of readings and ranges in `mode`.
#[must_use]
pub fn unit_for(mode: Mode) -> PhysicalUnit {
    entry_for(mode).unit
}

/// Legal full-scale ranges in `mode`, in [`unit_for`] units.
#[must_use]
pub fn legal_ranges(mode: Mode) -> &'static [f64] {
    entry_for(mode).ranges
}

/// Check that `value` is a full-scale range the instrument accepts in `mode`.
///
/// Membership is exact. Returns the matching table magnitude in the mode's unit.
pub fn validate_range(mode: Mode, value: Quantity) -> AppResult<f64> {
    let entry = entry_for(mode);
    let magnitude = value.value_in(entry.unit)?;

    entry
        .ranges
        .iter()
        .copied()
        .find(|&legal| legal == magnitude)
        .ok_or_else(|| {
            debug!("Rejected range {} for {} mode", value, mode);
            ElectrometerError::Range {
                mode,
                value: magnitude,
                unit: entry.unit,
            }
        })
}
