use std::fmt;

use crate::codec;
use crate::error::ScpiError;
use crate::mode::ModeId;
use crate::node::ScpiChannel;

/// Supported members of the X-Series family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentModel {
    Pxa,
    Mxa,
    Exa,
    Cxa,
}

impl InstrumentModel {
    pub const ALL: [InstrumentModel; 4] = [
        InstrumentModel::Pxa,
        InstrumentModel::Mxa,
        InstrumentModel::Exa,
        InstrumentModel::Cxa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InstrumentModel::Pxa => "PXA",
            InstrumentModel::Mxa => "MXA",
            InstrumentModel::Exa => "EXA",
            InstrumentModel::Cxa => "CXA",
        }
    }

    pub fn model_number(&self) -> &'static str {
        match self {
            InstrumentModel::Pxa => "N9030A",
            InstrumentModel::Mxa => "N9020A",
            InstrumentModel::Exa => "N9010A",
            InstrumentModel::Cxa => "N9000A",
        }
    }

    /// Matches on the family digits so later revisions (`N9030B`) are accepted.
    pub fn from_model_number(model_number: &str) -> Option<InstrumentModel> {
        let model_number = model_number.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| model_number.starts_with(&m.model_number()[..5]))
    }

    pub fn from_identity(identity: &Identity) -> Option<InstrumentModel> {
        Self::from_model_number(&identity.model)
    }

    /// Modes registered when no discovery is requested. Every model gets the
    /// same set; instruments lacking a mode reject its commands.
    pub fn default_modes(&self) -> Vec<ModeId> {
        ModeId::ALL.to_vec()
    }
}

impl fmt::Display for InstrumentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.model_number())
    }
}

/// Parsed `*IDN?` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub firmware: String,
}

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, ScpiError> {
        let fields = codec::parse_list(raw);
        match fields.as_slice() {
            [manufacturer, model, serial, firmware, ..] => Ok(Self {
                manufacturer: manufacturer.trim().to_string(),
                model: model.trim().to_string(),
                serial: serial.trim().to_string(),
                firmware: firmware.trim().to_string(),
            }),
            _ => Err(ScpiError::Parse {
                response: raw.to_string(),
                expected: "an identification string",
            }),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (serial {}, firmware {})",
            self.manufacturer, self.model, self.serial, self.firmware
        )
    }
}

/// Decides which modes an instrument gets when it is built.
pub trait DiscoverModes {
    fn discover(&self, channel: &ScpiChannel) -> Result<Vec<ModeId>, ScpiError>;
}

/// A fixed mode list, no instrument traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedModes(pub Vec<ModeId>);

impl Default for FixedModes {
    fn default() -> Self {
        Self(ModeId::ALL.to_vec())
    }
}

impl DiscoverModes for FixedModes {
    fn discover(&self, _channel: &ScpiChannel) -> Result<Vec<ModeId>, ScpiError> {
        Ok(self.0.clone())
    }
}

/// Registers the known modes listed by `INST:CAT?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstrumentCatalog;

impl InstrumentCatalog {
    /// `"SA 1,WCDMA 9,PNOISE 14"` -> `[SpectrumAnalyzer, Wcdma]`
    pub fn parse(raw: &str) -> Vec<ModeId> {
        let mut modes = Vec::new();
        for entry in codec::parse_list(raw) {
            let Some(name) = entry.split_whitespace().next() else {
                continue;
            };
            match ModeId::from_scpi_name(name) {
                Some(id) if !modes.contains(&id) => modes.push(id),
                Some(_) => {}
                None => log::debug!("Skipping unsupported catalog mode {}", name),
            }
        }
        modes
    }
}

impl DiscoverModes for InstrumentCatalog {
    fn discover(&self, channel: &ScpiChannel) -> Result<Vec<ModeId>, ScpiError> {
        let modes = Self::parse(&channel.query("INST:CAT?")?);
        log::debug!("Instrument catalog lists modes {:?}", modes);
        Ok(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackTransport;

    #[test]
    fn test_identity_parse() {
        let identity =
            Identity::parse("Agilent Technologies,N9030A,US51350123,A.14.16\n").unwrap();
        assert_eq!(identity.manufacturer, "Agilent Technologies");
        assert_eq!(identity.model, "N9030A");
        assert_eq!(identity.serial, "US51350123");
        assert_eq!(identity.firmware, "A.14.16");
    }

    #[test]
    fn test_identity_parse_rejects_short_response() {
        assert!(matches!(
            Identity::parse("Keysight,N9020A"),
            Err(ScpiError::Parse { .. })
        ));
    }

    #[test]
    fn test_model_from_number() {
        assert_eq!(
            InstrumentModel::from_model_number("N9030A"),
            Some(InstrumentModel::Pxa)
        );
        assert_eq!(
            InstrumentModel::from_model_number("n9020b"),
            Some(InstrumentModel::Mxa)
        );
        assert_eq!(
            InstrumentModel::from_model_number("N9010A"),
            Some(InstrumentModel::Exa)
        );
        assert_eq!(
            InstrumentModel::from_model_number("N9000A"),
            Some(InstrumentModel::Cxa)
        );
        assert_eq!(InstrumentModel::from_model_number("E4440A"), None);
    }

    #[test]
    fn test_catalog_parse_skips_unknown_modes() {
        assert_eq!(
            InstrumentCatalog::parse("\"SA 1,PNOISE 14,WCDMA 9\"\n"),
            vec![ModeId::SpectrumAnalyzer, ModeId::Wcdma]
        );
        assert_eq!(InstrumentCatalog::parse("\"SA 1\""), vec![ModeId::SpectrumAnalyzer]);
        assert!(InstrumentCatalog::parse("\"\"").is_empty());
    }

    #[test]
    fn test_catalog_discovery_queries_instrument() {
        let loopback = LoopbackTransport::new();
        loopback.stub("INST:CAT?", "\"SA 1,BASIC 8\"\n");
        let channel = ScpiChannel::new(loopback.clone());

        let modes = InstrumentCatalog.discover(&channel).unwrap();
        assert_eq!(modes, vec![ModeId::SpectrumAnalyzer]);
        assert_eq!(loopback.traffic(), vec!["INST:CAT?"]);
    }

    #[test]
    fn test_fixed_modes_send_nothing() {
        let loopback = LoopbackTransport::new();
        let channel = ScpiChannel::new(loopback.clone());

        let modes = FixedModes::default().discover(&channel).unwrap();
        assert_eq!(modes, vec![ModeId::SpectrumAnalyzer, ModeId::Wcdma]);
        assert!(loopback.traffic().is_empty());
    }
}
