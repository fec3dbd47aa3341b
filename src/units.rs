//! Physical quantities with SI prefixes.
//!
//! Only the four dimensions an electrometer measures are modelled. A [`Quantity`] always
//! stores its magnitude in base units (volts, amperes, ohms, coulombs) so converting it to
//! the unit of a measurement mode is a dimension check rather than arithmetic.

use crate::error::{AppResult, ElectrometerError};
use std::fmt;
use std::str::FromStr;

/// Base units understood by the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalUnit {
    /// Volt (V)
    Volt,
    /// Ampere (A)
    Ampere,
    /// Ohm (Ω)
    Ohm,
    /// Coulomb (C)
    Coulomb,
}

impl PhysicalUnit {
    /// Canonical ASCII symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            PhysicalUnit::Volt => "V",
            PhysicalUnit::Ampere => "A",
            PhysicalUnit::Ohm => "Ohm",
            PhysicalUnit::Coulomb => "C",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "V" => Some(PhysicalUnit::Volt),
            "A" => Some(PhysicalUnit::Ampere),
            "Ohm" | "ohm" | "Ω" => Some(PhysicalUnit::Ohm),
            "C" => Some(PhysicalUnit::Coulomb),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// SI prefix applied to a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// 10^-12
    Pico,
    /// 10^-9
    Nano,
    /// 10^-6
    Micro,
    /// 10^-3
    Milli,
    /// 10^0
    Base,
    /// 10^3
    Kilo,
    /// 10^6
    Mega,
    /// 10^9
    Giga,
}

impl Prefix {
    /// Power of ten represented by the prefix.
    #[must_use]
    pub fn exponent(self) -> i32 {
        match self {
            Prefix::Pico => -12,
            Prefix::Nano => -9,
            Prefix::Micro => -6,
            Prefix::Milli => -3,
            Prefix::Base => 0,
            Prefix::Kilo => 3,
            Prefix::Mega => 6,
            Prefix::Giga => 9,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Prefix::Pico),
            'n' => Some(Prefix::Nano),
            'u' | 'µ' | 'μ' => Some(Prefix::Micro),
            'm' => Some(Prefix::Milli),
            'k' => Some(Prefix::Kilo),
            'M' => Some(Prefix::Mega),
            'G' => Some(Prefix::Giga),
            _ => None,
        }
    }

    /// Scale `value` into base units.
    ///
    /// Both operands are exact in f64 and IEEE division/multiplication round correctly,
    /// so `2 n` gives the same bits as the literal `2e-9`.
    fn scale(self, value: f64) -> f64 {
        let exp = self.exponent();
        if exp < 0 {
            value / 10f64.powi(-exp)
        } else {
            value * 10f64.powi(exp)
        }
    }
}

/// A magnitude together with its physical unit, stored in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    value: f64,
    unit: PhysicalUnit,
}

impl Quantity {
    /// Quantity of `value` base units.
    #[must_use]
    pub fn new(value: f64, unit: PhysicalUnit) -> Self {
        Self { value, unit }
    }

    /// Quantity of `value` prefixed units, e.g. `(2.0, Prefix::Nano, Ampere)` for 2 nA.
    #[must_use]
    pub fn with_prefix(value: f64, prefix: Prefix, unit: PhysicalUnit) -> Self {
        Self::new(prefix.scale(value), unit)
    }

    /// Shorthand for a voltage in volts.
    #[must_use]
    pub fn volts(value: f64) -> Self {
        Self::new(value, PhysicalUnit::Volt)
    }

    /// Shorthand for a current in amperes.
    #[must_use]
    pub fn amperes(value: f64) -> Self {
        Self::new(value, PhysicalUnit::Ampere)
    }

    /// Shorthand for a resistance in ohms.
    #[must_use]
    pub fn ohms(value: f64) -> Self {
        Self::new(value, PhysicalUnit::Ohm)
    }

    /// Shorthand for a charge in coulombs.
    #[must_use]
    pub fn coulombs(value: f64) -> Self {
        Self::new(value, PhysicalUnit::Coulomb)
    }

    /// Magnitude in base units.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Physical unit of the magnitude.
    #[must_use]
    pub fn unit(&self) -> PhysicalUnit {
        self.unit
    }

    /// Magnitude expressed in `unit`, failing if the dimensions differ.
    pub fn value_in(&self, unit: PhysicalUnit) -> AppResult<f64> {
        if self.unit == unit {
            Ok(self.value)
        } else {
            Err(ElectrometerError::UnitMismatch {
                expected: unit,
                found: self.unit,
            })
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e} {}", self.value, self.unit)
    }
}

impl FromStr for Quantity {
    type Err = ElectrometerError;

    /// Parses `"2 nA"`, `"200GOhm"`, `"20e-12 A"` or `"2 kΩ"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ElectrometerError::Configuration(format!("Invalid quantity '{}'", s));
        let text = s.trim();

        let (number, unit) = ["Ohm", "ohm", "Ω", "V", "A", "C"]
            .iter()
            .find_map(|symbol| {
                text.strip_suffix(symbol)
                    .and_then(|rest| PhysicalUnit::from_symbol(symbol).map(|u| (rest, u)))
            })
            .ok_or_else(invalid)?;
        let number = number.trim_end();

        if let Ok(value) = number.parse::<f64>() {
            return Ok(Quantity::new(value, unit));
        }

        let mut chars = number.chars();
        let prefix = chars.next_back().and_then(Prefix::from_char).ok_or_else(invalid)?;
        let value = chars.as_str().trim_end().parse::<f64>().map_err(|_| invalid())?;
        Ok(Quantity::with_prefix(value, prefix, unit))
    }
}

/// Formats a magnitude the way the instrument expects range arguments:
/// six fractional digits and a signed, two-digit exponent (`2.000000e-09`).
#[must_use]
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}
