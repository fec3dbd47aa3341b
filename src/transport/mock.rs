//! In-memory transport for testing
//!
//! Stands in for a connected instrument without any hardware. It provides:
//! - Echo of written settings (`KEY VALUE` is answered by `KEY?`)
//! - Scripted responses for queries
//! - Single-shot failure injection
//! - Call logging for test verification

use super::Transport;
use crate::error::TransportError;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One exchange recorded by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// `send(command)`
    Send(String),
    /// `query(command)`
    Query(String),
}

impl TransportCall {
    /// Command text of the call.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            TransportCall::Send(command) | TransportCall::Query(command) => command,
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<TransportCall>,
    settings: HashMap<String, String>,
    responses: HashMap<String, String>,
}

/// Mock transport for testing
///
/// Clones share state, so a test can keep one handle for inspection while the
/// instrument under test borrows another.
///
/// # Example
///
/// ```
/// use electrometer_daq::transport::{MockTransport, Transport, TransportCall};
///
/// let mut transport = MockTransport::new().with_response("*IDN?", "KEITHLEY,6514");
/// transport.send("SYST:ZCH ON").unwrap();
/// assert_eq!(transport.query("SYST:ZCH?").unwrap(), "ON");
/// assert_eq!(transport.query("*IDN?").unwrap(), "KEITHLEY,6514");
/// assert_eq!(transport.calls().len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    should_fail_next: Arc<AtomicBool>,
}

impl MockTransport {
    /// Create an empty mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `response` until a `send` overwrites the setting.
    #[must_use]
    pub fn with_response(self, query: &str, response: &str) -> Self {
        self.set_response(query, response);
        self
    }

    /// Script a response on a shared handle.
    pub fn set_response(&self, query: &str, response: &str) {
        self.lock()
            .responses
            .insert(query.to_string(), response.to_string());
    }

    /// Inject a failure for the next operation
    pub fn fail_next(&self) {
        self.should_fail_next.store(true, Ordering::SeqCst);
    }

    /// Get the call log
    #[must_use]
    pub fn calls(&self) -> Vec<TransportCall> {
        self.lock().calls.clone()
    }

    /// Commands passed to `send`, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Send(command) => Some(command.clone()),
                TransportCall::Query(_) => None,
            })
            .collect()
    }

    /// Clear the call log, keeping settings and scripted responses.
    pub fn clear_log(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(&self, command: &str) -> Result<(), TransportError> {
        if self.should_fail_next.swap(false, Ordering::SeqCst) {
            Err(TransportError::Injected(command.to_string()))
        } else {
            Ok(())
        }
    }
}

impl Transport for MockTransport {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        debug!("[mock] send: {}", command);
        self.lock().calls.push(TransportCall::Send(command.to_string()));
        self.check_failure(command)?;

        if let Some((keyword, value)) = command.split_once(' ') {
            self.lock()
                .settings
                .insert(keyword.to_string(), value.to_string());
        }
        Ok(())
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        debug!("[mock] query: {}", command);
        self.lock().calls.push(TransportCall::Query(command.to_string()));
        self.check_failure(command)?;

        let state = self.lock();
        let response = command
            .strip_suffix('?')
            .and_then(|keyword| state.settings.get(keyword))
            .or_else(|| state.responses.get(command))
            .cloned();
        response.ok_or_else(|| TransportError::NoResponse(command.to_string()))
    }
}
