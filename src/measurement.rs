use std::fmt;

use crate::error::ScpiError;
use crate::node::{ScpiChannel, ScpiNode};
use crate::spectrum_analyzer::San;
use crate::wcdma::{Acp, CombinedWcdma, ListPowerStep};

/// Registry key of every measurement this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementId {
    San,
    ListPowerStep,
    CombinedWcdma,
    Acp,
}

impl MeasurementId {
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementId::San => "San",
            MeasurementId::ListPowerStep => "ListPowerStep",
            MeasurementId::CombinedWcdma => "CombinedWcdma",
            MeasurementId::Acp => "Acp",
        }
    }

    pub fn scpi_name(&self) -> &'static str {
        match self {
            MeasurementId::San => "SAN",
            MeasurementId::ListPowerStep => "LPST",
            MeasurementId::CombinedWcdma => "CWCD",
            MeasurementId::Acp => "ACP",
        }
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State shared by all measurements: the SCPI name and the instrument channel.
#[derive(Debug, Clone)]
pub struct MeasurementCore {
    scpi_name: &'static str,
    channel: ScpiChannel,
}

impl MeasurementCore {
    pub(crate) fn new(id: MeasurementId, channel: ScpiChannel) -> Self {
        Self {
            scpi_name: id.scpi_name(),
            channel,
        }
    }

    pub fn scpi_name(&self) -> &'static str {
        self.scpi_name
    }

    pub fn channel(&self) -> &ScpiChannel {
        &self.channel
    }
}

/// A measurement type that can be looked up by type in its mode's registry.
///
/// `configure` and `initiate` issue `CONF:<name>` and `INITiate:<name>`.
/// Types whose instrument command set is irregular override `initiate`.
pub trait MeasurementCapability: ScpiNode + Sized {
    const ID: MeasurementId;

    fn core(&self) -> &MeasurementCore;

    fn from_entry(entry: &Measurement) -> Option<&Self>;

    fn from_entry_mut(entry: &mut Measurement) -> Option<&mut Self>;

    fn scpi_name(&self) -> &'static str {
        self.core().scpi_name()
    }

    fn configure(&self) -> Result<(), ScpiError> {
        self.command(&format!("CONF:{}", self.scpi_name()))
    }

    fn initiate(&self) -> Result<(), ScpiError> {
        self.command(&format!("INITiate:{}", self.scpi_name()))
    }
}

/// Any registered measurement.
#[derive(Debug)]
pub enum Measurement {
    San(San),
    ListPowerStep(ListPowerStep),
    CombinedWcdma(CombinedWcdma),
    Acp(Acp),
}

impl Measurement {
    pub fn id(&self) -> MeasurementId {
        match self {
            Measurement::San(_) => San::ID,
            Measurement::ListPowerStep(_) => ListPowerStep::ID,
            Measurement::CombinedWcdma(_) => CombinedWcdma::ID,
            Measurement::Acp(_) => Acp::ID,
        }
    }

    pub fn scpi_name(&self) -> &'static str {
        match self {
            Measurement::San(m) => m.scpi_name(),
            Measurement::ListPowerStep(m) => m.scpi_name(),
            Measurement::CombinedWcdma(m) => m.scpi_name(),
            Measurement::Acp(m) => m.scpi_name(),
        }
    }

    pub fn configure(&self) -> Result<(), ScpiError> {
        match self {
            Measurement::San(m) => m.configure(),
            Measurement::ListPowerStep(m) => m.configure(),
            Measurement::CombinedWcdma(m) => m.configure(),
            Measurement::Acp(m) => m.configure(),
        }
    }

    pub fn initiate(&self) -> Result<(), ScpiError> {
        match self {
            Measurement::San(m) => m.initiate(),
            Measurement::ListPowerStep(m) => m.initiate(),
            Measurement::CombinedWcdma(m) => m.initiate(),
            Measurement::Acp(m) => m.initiate(),
        }
    }
}

impl From<San> for Measurement {
    fn from(m: San) -> Self {
        Self::San(m)
    }
}

impl From<ListPowerStep> for Measurement {
    fn from(m: ListPowerStep) -> Self {
        Self::ListPowerStep(m)
    }
}

impl From<CombinedWcdma> for Measurement {
    fn from(m: CombinedWcdma) -> Self {
        Self::CombinedWcdma(m)
    }
}

impl From<Acp> for Measurement {
    fn from(m: Acp) -> Self {
        Self::Acp(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackTransport;

    #[test]
    fn test_default_lifecycle_commands() {
        let loopback = LoopbackTransport::new();
        let acp = Acp::new(ScpiChannel::new(loopback.clone()));

        acp.configure().unwrap();
        acp.initiate().unwrap();
        acp.configure().unwrap();

        assert_eq!(loopback.writes(), vec!["CONF:ACP", "INITiate:ACP", "CONF:ACP"]);
    }

    #[test]
    fn test_untyped_dispatch_keeps_override() {
        let loopback = LoopbackTransport::new();
        let entry: Measurement = San::new(ScpiChannel::new(loopback.clone())).into();

        assert_eq!(entry.id(), MeasurementId::San);
        entry.initiate().unwrap();

        assert_eq!(loopback.writes(), vec!["INITiate:SAN"]);
    }

    #[test]
    fn test_scpi_names() {
        assert_eq!(MeasurementId::ListPowerStep.scpi_name(), "LPST");
        assert_eq!(MeasurementId::CombinedWcdma.scpi_name(), "CWCD");
        assert_eq!(MeasurementId::Acp.scpi_name(), "ACP");
        assert_eq!(MeasurementId::San.scpi_name(), "SAN");
    }

    #[test]
    fn test_names_match_type_names() {
        assert_eq!(MeasurementId::San.name(), "San");
        assert_eq!(MeasurementId::ListPowerStep.name(), "ListPowerStep");
        assert_eq!(MeasurementId::CombinedWcdma.name(), "CombinedWcdma");
        assert_eq!(MeasurementId::Acp.name(), "Acp");
        assert_eq!(MeasurementId::Acp.to_string(), "Acp");
    }
}
