//! Measurement records returned by the instrument.

use crate::error::{AppResult, ElectrometerError};
use crate::units::{PhysicalUnit, Quantity};

/// One reading as returned by `FETC?` or `READ?`.
///
/// The instrument answers with a comma-separated element list: the reading itself,
/// optionally followed by a timestamp and a status word. Elements may carry a unit suffix
/// (`+1.234E-09NADC`) when unit reporting is enabled on the instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Measured value in the unit of the mode that was active when it was taken.
    pub value: f64,
    /// Seconds since the instrument's timestamp reference, if reported.
    pub timestamp: Option<f64>,
    /// Status word, if reported.
    pub status: Option<f64>,
    /// Trimmed response text.
    pub raw: String,
}

impl Reading {
    /// Parse a `FETC?`/`READ?` response produced by `command`.
    ///
    /// The reading is required. Timestamp and status may be absent, but an element that is
    /// present and not a number is a protocol error.
    pub fn parse(command: &str, response: &str) -> AppResult<Self> {
        let raw = response.trim();
        let invalid = || ElectrometerError::protocol(command, raw);
        let mut elements = raw.split(',').map(str::trim);

        let value = elements
            .next()
            .and_then(parse_element)
            .ok_or_else(invalid)?;
        let mut optional = || match elements.next() {
            None | Some("") => Ok(None),
            Some(element) => parse_element(element).map(Some).ok_or_else(invalid),
        };
        let timestamp = optional()?;
        let status = optional()?;

        Ok(Self {
            value,
            timestamp,
            status,
            raw: raw.to_string(),
        })
    }

    /// Attach a unit to the reading value.
    ///
    /// The instrument does not report the mode with each reading; pass the unit of the mode
    /// the reading was taken in.
    #[must_use]
    pub fn quantity(&self, unit: PhysicalUnit) -> Quantity {
        Quantity::new(self.value, unit)
    }
}

fn parse_element(element: &str) -> Option<f64> {
    element
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '#')
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_value() {
        let reading = Reading::parse("FETC?", "+1.234567E-09\n").unwrap();
        assert_eq!(reading.value, 1.234567e-9);
        assert_eq!(reading.timestamp, None);
        assert_eq!(reading.status, None);
        assert_eq!(reading.raw, "+1.234567E-09");
    }

    #[test]
    fn test_parse_full_element_list() {
        let reading = Reading::parse("READ?", "-2.500000E+00,+1.523400E+02,+0.000000E+00").unwrap();
        assert_eq!(reading.value, -2.5);
        assert_eq!(reading.timestamp, Some(152.34));
        assert_eq!(reading.status, Some(0.0));
    }

    #[test]
    fn test_parse_with_unit_suffixes() {
        let reading = Reading::parse("READ?", "+1.000000E-09NADC,+3.000000E+00SECS").unwrap();
        assert_eq!(reading.value, 1e-9);
        assert_eq!(reading.timestamp, Some(3.0));
        assert_eq!(reading.quantity(PhysicalUnit::Ampere), Quantity::amperes(1e-9));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            Reading::parse("FETC?", "ERROR"),
            Err(ElectrometerError::Protocol { .. })
        ));
        assert!(Reading::parse("FETC?", "").is_err());
    }

    #[test]
    fn test_parse_rejects_garbled_optional_elements() {
        match Reading::parse("FETC?", "+1.0E-09,garbage,xyz") {
            Err(ElectrometerError::Protocol { command, response }) => {
                assert_eq!(command, "FETC?");
                assert_eq!(response, "+1.0E-09,garbage,xyz");
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
        assert!(Reading::parse("READ?", "+1.0E-09,+2.0E+00,?").is_err());
    }
}
