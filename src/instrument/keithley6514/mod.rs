//! Keithley 6514 electrometer driver
//!
//! The 6514 measures voltage, current, resistance and charge. Its measurement mode
//! decides both the unit of every reading and which full-scale ranges are legal, so every
//! range operation first reads the mode back from the instrument.
//!
//! The driver holds no device state of its own. Every getter queries the instrument and
//! every setter writes immediately; the instrument is the single source of truth.
//!
//! # Example
//!
//! ```
//! use electrometer_daq::instrument::keithley6514::{Keithley6514, Mode};
//! use electrometer_daq::transport::MockTransport;
//! use electrometer_daq::units::Quantity;
//!
//! let mut transport = MockTransport::new().with_response("FUNCTION?", "CURR");
//! let mut meter = Keithley6514::new(&mut transport);
//!
//! meter.set_input_range(Quantity::amperes(2e-9)).unwrap();
//! assert!(meter.set_input_range(Quantity::amperes(3e-9)).is_err());
//! assert_eq!(meter.mode().unwrap(), Mode::Current);
//! ```

mod modes;
pub mod range;

pub use modes::{ArmSource, Mode, TriggerMode};
pub use range::{legal_ranges, unit_for, validate_range};

use crate::error::{AppResult, ElectrometerError};
use crate::instrument::capabilities::Electrometer;
use crate::measurement::Reading;
use crate::property::{BoolProperty, EnumProperty, ScpiEnum};
use crate::transport::Transport;
use crate::units::{format_scientific, PhysicalUnit, Quantity};
use log::debug;

const MODE: EnumProperty<Mode> = EnumProperty::new("FUNCTION");
const TRIGGER_SOURCE: EnumProperty<TriggerMode> = EnumProperty::new("TRIGGER:SOURCE");
const ARM_SOURCE: EnumProperty<ArmSource> = EnumProperty::new("ARM:SOURCE");
const ZERO_CHECK: BoolProperty = BoolProperty::new("SYST:ZCH", "ON", "OFF");
const ZERO_CORRECT: BoolProperty = BoolProperty::new("SYST:ZCOR", "ON", "OFF");

/// Keithley 6514 instrument driver over a borrowed transport.
pub struct Keithley6514<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: Transport + ?Sized> Keithley6514<'a, T> {
    /// Drive the instrument behind `transport`.
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// Measurement mode.
    pub fn mode(&mut self) -> AppResult<Mode> {
        MODE.get(self.transport)
    }

    /// Switch the measurement mode.
    pub fn set_mode(&mut self, mode: Mode) -> AppResult<()> {
        MODE.set(self.transport, mode)
    }

    /// Trigger layer source.
    pub fn trigger_source(&mut self) -> AppResult<TriggerMode> {
        TRIGGER_SOURCE.get(self.transport)
    }

    /// Set the trigger layer source.
    pub fn set_trigger_source(&mut self, source: TriggerMode) -> AppResult<()> {
        TRIGGER_SOURCE.set(self.transport, source)
    }

    /// Arm layer source.
    pub fn arm_source(&mut self) -> AppResult<ArmSource> {
        ARM_SOURCE.get(self.transport)
    }

    /// Set the arm layer source.
    pub fn set_arm_source(&mut self, source: ArmSource) -> AppResult<()> {
        ARM_SOURCE.set(self.transport, source)
    }

    /// Zero check state.
    pub fn zero_check(&mut self) -> AppResult<bool> {
        ZERO_CHECK.get(self.transport)
    }

    /// Enable or disable zero check.
    pub fn set_zero_check(&mut self, enabled: bool) -> AppResult<()> {
        ZERO_CHECK.set(self.transport, enabled)
    }

    /// Zero correct state.
    pub fn zero_correct(&mut self) -> AppResult<bool> {
        ZERO_CORRECT.get(self.transport)
    }

    /// Enable or disable zero correct.
    pub fn set_zero_correct(&mut self, enabled: bool) -> AppResult<()> {
        ZERO_CORRECT.set(self.transport, enabled)
    }

    /// Unit of readings in the active mode.
    pub fn unit(&mut self) -> AppResult<PhysicalUnit> {
        Ok(unit_for(self.mode()?))
    }

    /// Whether auto-ranging is enabled in the active mode.
    ///
    /// Anything other than `ON` reads as disabled.
    pub fn auto_range(&mut self) -> AppResult<bool> {
        let mode = self.mode()?;
        let response = self
            .transport
            .query(&format!("{}:RANGE:AUTO?", mode.token()))?;
        Ok(response.trim() == "ON")
    }

    /// Enable or disable auto-ranging in the active mode.
    ///
    /// The instrument's current range must be a legal range for the active mode;
    /// otherwise the request is rejected and nothing is written.
    pub fn set_auto_range(&mut self, enabled: bool) -> AppResult<()> {
        let mode = self.mode()?;
        let current = self.query_range(mode)?;
        validate_range(mode, current)?;

        let state = if enabled { "ON" } else { "OFF" };
        self.transport
            .send(&format!("{}:RANGE AUTO {}", mode.token(), state))?;
        Ok(())
    }

    /// Full-scale range of the active mode.
    pub fn input_range(&mut self) -> AppResult<Quantity> {
        let mode = self.mode()?;
        self.query_range(mode)
    }

    /// Select a full-scale range for the active mode.
    ///
    /// `value` must be in the active mode's unit and one of its legal ranges.
    pub fn set_input_range(&mut self, value: Quantity) -> AppResult<()> {
        let mode = self.mode()?;
        let magnitude = validate_range(mode, value)?;
        self.transport.send(&format!(
            "{}:RANGE:LOWER {}",
            mode.token(),
            format_scientific(magnitude)
        ))?;
        Ok(())
    }

    /// Switch to `mode` and reset the related controls to instrument defaults.
    ///
    /// Besides the mode change, the instrument sets trigger and arm sources to immediate,
    /// trigger and arm counts to 1, trigger delays to 0, disables math and buffer
    /// operation, enables autozero and goes idle.
    pub fn auto_config(&mut self, mode: Mode) -> AppResult<()> {
        self.transport.send(&format!("CONF:{}", mode.token()))?;
        Ok(())
    }

    /// Latest post-processed reading, without triggering a new one.
    pub fn fetch(&mut self) -> AppResult<Reading> {
        self.reading("FETC?")
    }

    /// Trigger a new acquisition and return its reading.
    pub fn read(&mut self) -> AppResult<Reading> {
        self.reading("READ?")
    }

    fn reading(&mut self, command: &str) -> AppResult<Reading> {
        let response = self.transport.query(command)?;
        Reading::parse(command, &response)
    }

    // The range is read from the UPPER node but written to the LOWER node.
    fn query_range(&mut self, mode: Mode) -> AppResult<Quantity> {
        let command = format!("{}:RANGE:UPPER?", mode.token());
        let response = self.transport.query(&command)?;
        let value: f64 = response.trim().parse().map_err(|_| {
            debug!("Unparsable range response '{}'", response.trim());
            ElectrometerError::protocol(&command, response.trim())
        })?;
        Ok(Quantity::new(value, unit_for(mode)))
    }
}

impl<T: Transport + ?Sized> Electrometer for Keithley6514<'_, T> {
    type Mode = Mode;

    fn mode(&mut self) -> AppResult<Mode> {
        Keithley6514::mode(self)
    }

    fn set_mode(&mut self, mode: Mode) -> AppResult<()> {
        Keithley6514::set_mode(self, mode)
    }

    fn unit(&mut self) -> AppResult<PhysicalUnit> {
        Keithley6514::unit(self)
    }

    fn input_range(&mut self) -> AppResult<Quantity> {
        Keithley6514::input_range(self)
    }

    fn set_input_range(&mut self, value: Quantity) -> AppResult<()> {
        Keithley6514::set_input_range(self, value)
    }

    fn zero_check(&mut self) -> AppResult<bool> {
        Keithley6514::zero_check(self)
    }

    fn set_zero_check(&mut self, enabled: bool) -> AppResult<()> {
        Keithley6514::set_zero_check(self, enabled)
    }

    fn zero_correct(&mut self) -> AppResult<bool> {
        Keithley6514::zero_correct(self)
    }

    fn set_zero_correct(&mut self, enabled: bool) -> AppResult<()> {
        Keithley6514::set_zero_correct(self, enabled)
    }

    fn fetch(&mut self) -> AppResult<Reading> {
        Keithley6514::fetch(self)
    }

    fn read(&mut self) -> AppResult<Reading> {
        Keithley6514::read(self)
    }
}
