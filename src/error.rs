use std::fmt;

use crate::transport::TransportError;

/// Which registry a missing capability was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Mode,
    Measurement,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Mode => f.write_str("Mode"),
            CapabilityKind::Measurement => f.write_str("Measurement"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScpiError {
    #[error("{parameter} value {value} is out of range. Must be between {min} and {max}")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{kind} \"{name}\" is not available on this instrument")]
    CapabilityNotFound {
        kind: CapabilityKind,
        name: &'static str,
    },

    #[error("Invalid {parameter}: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: &'static str,
    },

    #[error("Could not parse response '{response}' as {expected}")]
    Parse {
        response: String,
        expected: &'static str,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_not_found_names_capability() {
        let err = ScpiError::CapabilityNotFound {
            kind: CapabilityKind::Mode,
            name: "Wcdma",
        };
        assert_eq!(
            err.to_string(),
            "Mode \"Wcdma\" is not available on this instrument"
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ScpiError::OutOfRange {
            parameter: "CenterFrequency",
            value: 60e9,
            min: -80e6,
            max: 51e9,
        };
        assert!(err.to_string().starts_with("CenterFrequency value 60000000000"));
    }
}
