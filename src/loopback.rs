use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::transport::{ScpiTransport, TransportError};

#[derive(Debug, Default)]
struct LoopbackState {
    traffic: Vec<Traffic>,
    settings: HashMap<String, String>,
    stubs: HashMap<String, String>,
    disconnected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Traffic {
    Write(String),
    Query(String),
}

/// In-memory stand-in for an instrument.
///
/// A write `HEADER value` stores `value` under `HEADER`; a later query
/// `HEADER?` answers it verbatim. Stubs registered with [`stub`] take
/// precedence and answer a query with a fixed response. Clones share state, so
/// a test can keep one clone and hand the other to an instrument.
///
/// [`stub`]: LoopbackTransport::stub
#[derive(Debug, Clone, Default)]
pub struct LoopbackTransport {
    state: Rc<RefCell<LoopbackState>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `response` every time it is asked.
    pub fn stub(&self, query: &str, response: &str) -> &Self {
        self.state
            .borrow_mut()
            .stubs
            .insert(normalize_header(query), response.to_string());
        self
    }

    /// Make every following operation fail as if the link dropped.
    pub fn disconnect(&self) {
        self.state.borrow_mut().disconnected = true;
    }

    /// Writes and queries in the order they were issued.
    pub fn traffic(&self) -> Vec<String> {
        self.state
            .borrow()
            .traffic
            .iter()
            .map(|t| match t {
                Traffic::Write(s) | Traffic::Query(s) => s.clone(),
            })
            .collect()
    }

    /// Writes only, in order.
    pub fn writes(&self) -> Vec<String> {
        self.state
            .borrow()
            .traffic
            .iter()
            .filter_map(|t| match t {
                Traffic::Write(s) => Some(s.clone()),
                Traffic::Query(_) => None,
            })
            .collect()
    }

    pub fn clear_traffic(&self) {
        self.state.borrow_mut().traffic.clear();
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().trim_end_matches('?').to_ascii_uppercase()
}

impl ScpiTransport for LoopbackTransport {
    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        if state.disconnected {
            return Err(TransportError::ConnectionClosed);
        }
        state.traffic.push(Traffic::Write(command.to_string()));

        if let Some((header, value)) = command.split_once(' ') {
            state
                .settings
                .insert(normalize_header(header), value.to_string());
        }
        Ok(())
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        let mut state = self.state.borrow_mut();
        if state.disconnected {
            return Err(TransportError::ConnectionClosed);
        }
        state.traffic.push(Traffic::Query(command.to_string()));

        let key = normalize_header(command);
        state
            .stubs
            .get(&key)
            .or_else(|| state.settings.get(&key))
            .cloned()
            .ok_or_else(|| TransportError::NoResponse {
                command: command.to_string(),
            })
    }
}
