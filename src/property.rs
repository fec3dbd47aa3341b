//! Reusable get/set adapters for discrete SCPI settings.
//!
//! Every discrete setting of an instrument follows the same pattern: `KEYWORD?` returns a
//! token, `KEYWORD TOKEN` changes it. [`EnumProperty`] and [`BoolProperty`] capture that
//! pattern once so each driver only declares the keyword and the token table.
//!
//! # Example
//!
//! ```
//! use electrometer_daq::property::EnumProperty;
//! use electrometer_daq::instrument::keithley6514::Mode;
//! use electrometer_daq::transport::MockTransport;
//!
//! const MODE: EnumProperty<Mode> = EnumProperty::new("FUNCTION");
//!
//! let mut transport = MockTransport::new();
//! MODE.set(&mut transport, Mode::Charge).unwrap();
//! assert_eq!(MODE.get(&mut transport).unwrap(), Mode::Charge);
//! ```

use crate::error::{AppResult, ElectrometerError};
use crate::transport::Transport;
use std::marker::PhantomData;

/// An enumeration whose members map one-to-one onto protocol tokens.
pub trait ScpiEnum: Copy + Sized + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Token sent to and returned by the instrument.
    fn token(self) -> &'static str;

    /// Exact reverse lookup of a token.
    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.token() == token)
    }
}

/// A setting whose value is one member of a [`ScpiEnum`].
#[derive(Debug, Clone, Copy)]
pub struct EnumProperty<E> {
    keyword: &'static str,
    _member: PhantomData<E>,
}

impl<E: ScpiEnum> EnumProperty<E> {
    /// Property rooted at `keyword`, e.g. `"TRIGGER:SOURCE"`.
    #[must_use]
    pub const fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            _member: PhantomData,
        }
    }

    /// Query the instrument and decode its answer.
    pub fn get<T: Transport + ?Sized>(&self, transport: &mut T) -> AppResult<E> {
        let command = format!("{}?", self.keyword);
        let response = transport.query(&command)?;
        let token = response.trim();
        E::from_token(token).ok_or_else(|| ElectrometerError::protocol(&command, token))
    }

    /// Write `value` to the instrument.
    pub fn set<T: Transport + ?Sized>(&self, transport: &mut T, value: E) -> AppResult<()> {
        transport.send(&format!("{} {}", self.keyword, value.token()))?;
        Ok(())
    }
}

/// A two-state setting with fixed on/off tokens.
#[derive(Debug, Clone, Copy)]
pub struct BoolProperty {
    keyword: &'static str,
    on: &'static str,
    off: &'static str,
}

impl BoolProperty {
    /// Property rooted at `keyword` using `on`/`off` as the true/false tokens.
    #[must_use]
    pub const fn new(keyword: &'static str, on: &'static str, off: &'static str) -> Self {
        Self { keyword, on, off }
    }

    /// Query the instrument and decode its answer.
    pub fn get<T: Transport + ?Sized>(&self, transport: &mut T) -> AppResult<bool> {
        let command = format!("{}?", self.keyword);
        let response = transport.query(&command)?;
        match response.trim() {
            token if token == self.on => Ok(true),
            token if token == self.off => Ok(false),
            token => Err(ElectrometerError::protocol(&command, token)),
        }
    }

    /// Write `value` to the instrument.
    pub fn set<T: Transport + ?Sized>(&self, transport: &mut T, value: bool) -> AppResult<()> {
        let token = if value { self.on } else { self.off };
        transport.send(&format!("{} {}", self.keyword, token))?;
        Ok(())
    }
}
