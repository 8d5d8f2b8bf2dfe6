//! Conversions between semantic values and SCPI wire strings.
//!
//! Everything here is pure: no transport access. Accessors pick the boolean
//! encoding, unit and range policy that the real instrument command expects.

use std::fmt;

use crate::error::ScpiError;

/// Boolean token convention of a particular SCPI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolEncoding {
    /// `1` / `0`
    Numeric,
    /// `ON` / `OFF`
    OnOff,
}

impl BoolEncoding {
    pub fn encode(&self, value: bool) -> &'static str {
        match (self, value) {
            (BoolEncoding::Numeric, true) => "1",
            (BoolEncoding::Numeric, false) => "0",
            (BoolEncoding::OnOff, true) => "ON",
            (BoolEncoding::OnOff, false) => "OFF",
        }
    }

    /// True only if the cleaned response equals this encoding's "true" token.
    pub fn decode(&self, response: &str) -> bool {
        clean_response(response) == self.encode(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    pub fn scale(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric bounds of an instrument parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Substitute the nearest bound for an out-of-range value. NaN has no
    /// nearest bound and is rejected.
    pub fn clamp(&self, parameter: &'static str, value: f64) -> Result<f64, ScpiError> {
        if value.is_nan() {
            return Err(ScpiError::InvalidArgument {
                parameter,
                reason: "not a number",
            });
        }
        Ok(value.max(self.min).min(self.max))
    }

    /// Reject an out-of-range value instead of clamping it.
    pub fn check(&self, parameter: &'static str, value: f64) -> Result<f64, ScpiError> {
        if value < self.min || value > self.max || value.is_nan() {
            return Err(ScpiError::OutOfRange {
                parameter,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// `2.5e9, GHz` -> `"2.5 GHz"`
pub fn format_frequency(hz: f64, unit: FrequencyUnit) -> String {
    format!("{} {}", hz / unit.scale(), unit)
}

/// `[1e6, 2e6]` -> `"1000000Hz,2000000Hz"`
pub fn join_frequencies(values: &[f64]) -> String {
    values
        .iter()
        .map(|hz| format!("{}{}", hz, FrequencyUnit::Hz))
        .collect::<Vec<_>>()
        .join(",")
}

/// Strip surrounding quotes and whitespace/newline padding.
pub fn clean_response(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
}

pub fn parse_f64(raw: &str) -> Result<f64, ScpiError> {
    let cleaned = clean_response(raw);
    cleaned.parse::<f64>().map_err(|_| ScpiError::Parse {
        response: raw.to_string(),
        expected: "a floating point number",
    })
}

/// Split a comma separated response. Empty tokens between consecutive commas
/// are kept; a response that cleans to nothing is an empty list.
pub fn parse_list(raw: &str) -> Vec<String> {
    let cleaned = clean_response(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }
    cleaned.split(',').map(str::to_string).collect()
}

pub fn parse_f64_list(raw: &str) -> Result<Vec<f64>, ScpiError> {
    parse_list(raw).iter().map(|token| parse_f64(token)).collect()
}
