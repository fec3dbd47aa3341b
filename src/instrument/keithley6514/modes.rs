//! Discrete settings of the Keithley 6514 and their protocol tokens.

use super::range::MODE_TABLE;
use crate::error::{AppResult, ElectrometerError};
use crate::property::ScpiEnum;
use std::fmt;
use std::str::FromStr;

/// Quantity being measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Volts
    Voltage,
    /// Amperes
    Current,
    /// Ohms
    Resistance,
    /// Coulombs
    Charge,
}

/// Trigger layer event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    /// Trigger immediately.
    Immediate,
    /// Wait for a trigger link input.
    Tlink,
}

/// Arm layer event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmSource {
    /// Arm immediately.
    Immediate,
    /// Arm on the internal timer.
    Timer,
    /// Arm on a bus trigger (`*TRG`/GET).
    Bus,
    /// Arm on a trigger link input.
    Tlink,
    /// Arm on either edge of the start test input.
    Stest,
    /// Arm on the positive edge of the start test input.
    Pstest,
    /// Arm on the negative edge of the start test input.
    Nstest,
    /// Arm from the front panel TRIG key.
    Manual,
}

impl Mode {
    /// Lowercase name used in messages and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Mode::Voltage => "voltage",
            Mode::Current => "current",
            Mode::Resistance => "resistance",
            Mode::Charge => "charge",
        }
    }
}

impl TriggerMode {
    /// Lowercase name used in messages and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TriggerMode::Immediate => "immediate",
            TriggerMode::Tlink => "tlink",
        }
    }
}

impl ArmSource {
    /// Lowercase name used in messages and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ArmSource::Immediate => "immediate",
            ArmSource::Timer => "timer",
            ArmSource::Bus => "bus",
            ArmSource::Tlink => "tlink",
            ArmSource::Stest => "stest",
            ArmSource::Pstest => "pstest",
            ArmSource::Nstest => "nstest",
            ArmSource::Manual => "manual",
        }
    }
}

impl ScpiEnum for Mode {
    const ALL: &'static [Self] = &[Mode::Voltage, Mode::Current, Mode::Resistance, Mode::Charge];

    fn token(self) -> &'static str {
        MODE_TABLE[self as usize].keyword
    }
}

impl ScpiEnum for TriggerMode {
    const ALL: &'static [Self] = &[TriggerMode::Immediate, TriggerMode::Tlink];

    fn token(self) -> &'static str {
        match self {
            TriggerMode::Immediate => "IMM",
            TriggerMode::Tlink => "TLINK",
        }
    }
}

impl ScpiEnum for ArmSource {
    const ALL: &'static [Self] = &[
        ArmSource::Immediate,
        ArmSource::Timer,
        ArmSource::Bus,
        ArmSource::Tlink,
        ArmSource::Stest,
        ArmSource::Pstest,
        ArmSource::Nstest,
        ArmSource::Manual,
    ];

    fn token(self) -> &'static str {
        match self {
            ArmSource::Immediate => "IMM",
            ArmSource::Timer => "TIM",
            ArmSource::Bus => "BUS",
            ArmSource::Tlink => "TLIN",
            ArmSource::Stest => "STES",
            ArmSource::Pstest => "PST",
            ArmSource::Nstest => "NST",
            ArmSource::Manual => "MAN",
        }
    }
}

/// Accepts a member's name or its protocol token, ignoring case.
fn parse_member<E: ScpiEnum>(text: &str, name: fn(E) -> &'static str, what: &str) -> AppResult<E> {
    let text = text.trim();
    E::ALL
        .iter()
        .copied()
        .find(|&member| {
            name(member).eq_ignore_ascii_case(text) || member.token().eq_ignore_ascii_case(text)
        })
        .ok_or_else(|| {
            let choices: Vec<&str> = E::ALL.iter().map(|&member| name(member)).collect();
            ElectrometerError::Configuration(format!(
                "Unknown {} '{}'. Must be one of: {}",
                what,
                text,
                choices.join(", ")
            ))
        })
}

impl FromStr for Mode {
    type Err = ElectrometerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(s, Mode::name, "mode")
    }
}

impl FromStr for TriggerMode {
    type Err = ElectrometerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(s, TriggerMode::name, "trigger source")
    }
}

impl FromStr for ArmSource {
    type Err = ElectrometerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(s, ArmSource::name, "arm source")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ArmSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
