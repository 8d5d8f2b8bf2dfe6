use crate::codec::{self, BoolEncoding, FrequencyUnit, Limits};
use crate::error::{CapabilityKind, ScpiError};
use crate::menus::{MarkerMenu, TriggerMenu};
use crate::mode::{Mode, ModeCapability, ModeId};
use crate::models::{DiscoverModes, FixedModes, Identity, InstrumentModel};
use crate::node::{ScpiChannel, ScpiNode};
use crate::registry::Registry;
use crate::transport::ScpiTransport;

/// Mechanical attenuator range in dB. Writes outside it are clamped.
pub const MECHANICAL_ATTENUATION: Limits = Limits::new(0.0, 70.0);

/// Accepted center frequency range in Hz. Writes outside it are rejected.
pub const CENTER_FREQUENCY: Limits = Limits::new(-80e6, 51e9);

/// Upper bound on `SYST:ERR?` reads per [`SignalAnalyzer::drain_errors`] call.
const MAX_ERROR_QUEUE: usize = 32;

/// One entry of the instrument error queue, e.g. `-113,"Undefined header"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub code: i32,
    pub message: String,
}

impl ErrorEntry {
    pub fn parse(raw: &str) -> Result<Self, ScpiError> {
        let parse_error = || ScpiError::Parse {
            response: raw.to_string(),
            expected: "an error queue entry",
        };
        let (code, message) = raw.trim().split_once(',').ok_or_else(parse_error)?;
        Ok(Self {
            code: code.trim().parse().map_err(|_| parse_error())?,
            message: codec::clean_response(message).to_string(),
        })
    }

    pub fn is_no_error(&self) -> bool {
        self.code == 0
    }
}

/// An X-Series signal analyzer on one SCPI connection.
///
/// Holds the transport, the mode registry and the instrument level menus.
/// Modes and their measurements are built once, when the analyzer is built,
/// and share the analyzer's channel.
#[derive(Debug)]
pub struct SignalAnalyzer {
    channel: ScpiChannel,
    model: Option<InstrumentModel>,
    modes: Registry<ModeId, Mode>,
    markers: MarkerMenu,
    trigger: TriggerMenu,
}

impl SignalAnalyzer {
    pub fn builder<T: ScpiTransport + 'static>(transport: T) -> SignalAnalyzerBuilder {
        SignalAnalyzerBuilder::new(ScpiChannel::new(transport))
    }

    pub fn pxa<T: ScpiTransport + 'static>(transport: T) -> Self {
        Self::for_model(ScpiChannel::new(transport), InstrumentModel::Pxa)
    }

    pub fn mxa<T: ScpiTransport + 'static>(transport: T) -> Self {
        Self::for_model(ScpiChannel::new(transport), InstrumentModel::Mxa)
    }

    pub fn exa<T: ScpiTransport + 'static>(transport: T) -> Self {
        Self::for_model(ScpiChannel::new(transport), InstrumentModel::Exa)
    }

    pub fn cxa<T: ScpiTransport + 'static>(transport: T) -> Self {
        Self::for_model(ScpiChannel::new(transport), InstrumentModel::Cxa)
    }

    pub(crate) fn for_model(channel: ScpiChannel, model: InstrumentModel) -> Self {
        Self::assemble(channel, Some(model), &model.default_modes())
    }

    fn assemble(channel: ScpiChannel, model: Option<InstrumentModel>, modes: &[ModeId]) -> Self {
        let mut registry = Registry::new();
        for id in modes {
            registry.register(*id, Mode::build(*id, channel.clone()));
        }

        Self {
            markers: MarkerMenu::new(channel.clone()),
            trigger: TriggerMenu::new(channel.clone()),
            channel,
            model,
            modes: registry,
        }
    }

    pub fn model(&self) -> Option<InstrumentModel> {
        self.model
    }

    pub fn modes(&self) -> &Registry<ModeId, Mode> {
        &self.modes
    }

    pub fn mode<M: ModeCapability>(&self) -> Result<&M, ScpiError> {
        self.modes
            .get(&M::ID)
            .and_then(M::from_entry)
            .ok_or(ScpiError::CapabilityNotFound {
                kind: CapabilityKind::Mode,
                name: M::ID.name(),
            })
    }

    pub fn mode_mut<M: ModeCapability>(&mut self) -> Result<&mut M, ScpiError> {
        self.modes
            .get_mut(&M::ID)
            .and_then(M::from_entry_mut)
            .ok_or(ScpiError::CapabilityNotFound {
                kind: CapabilityKind::Mode,
                name: M::ID.name(),
            })
    }

    pub fn has_mode<M: ModeCapability>(&self) -> bool {
        self.modes.contains(&M::ID)
    }

    pub fn markers(&self) -> &MarkerMenu {
        &self.markers
    }

    pub fn trigger(&self) -> &TriggerMenu {
        &self.trigger
    }

    pub fn mechanical_attenuation(&self) -> Result<f64, ScpiError> {
        self.read_f64("POW:ATT")
    }

    /// Out-of-range values are clamped to 0..=70 dB, not rejected. NaN is an
    /// [`ScpiError::InvalidArgument`] and nothing is sent.
    pub fn set_mechanical_attenuation(&self, db: f64) -> Result<(), ScpiError> {
        let db = MECHANICAL_ATTENUATION.clamp("MechanicalAttenuation", db)?;
        self.write_value("POW:ATT", db)
    }

    pub fn center_frequency(&self) -> Result<f64, ScpiError> {
        self.read_f64("FREQ:CENT")
    }

    /// Fails with [`ScpiError::OutOfRange`] before sending anything when `hz`
    /// is outside -80 MHz..=51 GHz.
    pub fn set_center_frequency(&self, hz: f64) -> Result<(), ScpiError> {
        let hz = CENTER_FREQUENCY.check("CenterFrequency", hz)?;
        self.write_value("FREQ:CENT", codec::format_frequency(hz, FrequencyUnit::GHz))
    }

    pub fn span(&self) -> Result<f64, ScpiError> {
        self.read_f64("FREQ:SPAN")
    }

    pub fn set_span(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("FREQ:SPAN", hz)
    }

    pub fn continuous_sweep(&self) -> Result<bool, ScpiError> {
        self.read_bool("INIT:CONT", BoolEncoding::Numeric)
    }

    pub fn set_continuous_sweep(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("INIT:CONT", enabled, BoolEncoding::Numeric)
    }

    /// Inverse view of [`continuous_sweep`]. The setting is global to all
    /// measurements.
    ///
    /// [`continuous_sweep`]: SignalAnalyzer::continuous_sweep
    pub fn single_sweep(&self) -> Result<bool, ScpiError> {
        Ok(self.read_clean("INIT:CONT")? == BoolEncoding::Numeric.encode(false))
    }

    pub fn set_single_sweep(&self, enabled: bool) -> Result<(), ScpiError> {
        self.set_continuous_sweep(!enabled)
    }

    pub fn preselector_enabled(&self) -> Result<bool, ScpiError> {
        self.read_bool("POW:MW:PRES", BoolEncoding::Numeric)
    }

    pub fn set_preselector_enabled(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("POW:MW:PRES", enabled, BoolEncoding::Numeric)
    }

    pub fn display_enabled(&self) -> Result<bool, ScpiError> {
        self.read_bool("DISP:ENAB", BoolEncoding::Numeric)
    }

    pub fn set_display_enabled(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("DISP:ENAB", enabled, BoolEncoding::Numeric)
    }

    pub fn auto_cal(&self) -> Result<bool, ScpiError> {
        self.read_bool("CAL:AUTO", BoolEncoding::OnOff)
    }

    pub fn set_auto_cal(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("CAL:AUTO", enabled, BoolEncoding::OnOff)
    }

    pub fn auto_rbw(&self) -> Result<bool, ScpiError> {
        self.read_bool("BAND:AUTO", BoolEncoding::Numeric)
    }

    pub fn set_auto_rbw(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("BAND:AUTO", enabled, BoolEncoding::Numeric)
    }

    pub fn auto_vbw(&self) -> Result<bool, ScpiError> {
        self.read_bool("BAND:VID:AUTO", BoolEncoding::Numeric)
    }

    pub fn set_auto_vbw(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("BAND:VID:AUTO", enabled, BoolEncoding::Numeric)
    }

    pub fn auto_sweep_time(&self) -> Result<bool, ScpiError> {
        self.read_bool("SWE:TIME:AUTO", BoolEncoding::Numeric)
    }

    pub fn set_auto_sweep_time(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("SWE:TIME:AUTO", enabled, BoolEncoding::Numeric)
    }

    pub fn resolution_bandwidth(&self) -> Result<f64, ScpiError> {
        self.read_f64("BAND")
    }

    pub fn set_resolution_bandwidth(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("BAND", hz)
    }

    pub fn video_bandwidth(&self) -> Result<f64, ScpiError> {
        self.read_f64("BAND:VID")
    }

    pub fn set_video_bandwidth(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("BAND:VID", hz)
    }

    /// Installed options, in the order the instrument lists them.
    pub fn options(&self) -> Result<Vec<String>, ScpiError> {
        Ok(codec::parse_list(&self.query("*OPT?")?))
    }

    pub fn identify(&self) -> Result<Identity, ScpiError> {
        Identity::parse(&self.query("*IDN?")?)
    }

    /// `*RST` then `*CLS`. Mode trigger caches are dropped once `*RST` is
    /// sent, whether or not `*CLS` succeeds.
    pub fn reset(&mut self) -> Result<(), ScpiError> {
        self.command("*RST")?;
        for mode in self.modes.values_mut() {
            mode.trigger_mut().invalidate_cache();
        }
        self.clear_errors()
    }

    pub fn clear_errors(&self) -> Result<(), ScpiError> {
        self.command("*CLS")
    }

    /// Next entry of the error queue as the instrument reports it.
    pub fn get_error(&self) -> Result<String, ScpiError> {
        let response = self.query("SYST:ERR?")?;
        Ok(response.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    /// Read the error queue until it reports no error.
    pub fn drain_errors(&self) -> Result<Vec<ErrorEntry>, ScpiError> {
        let mut entries = Vec::new();
        for _ in 0..MAX_ERROR_QUEUE {
            let entry = ErrorEntry::parse(&self.get_error()?)?;
            if entry.is_no_error() {
                break;
            }
            log::warn!("Instrument error {}: {}", entry.code, entry.message);
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn init_imm(&self) -> Result<(), ScpiError> {
        self.command("INIT:IMM")
    }

    /// Block until pending operations finish (`*OPC?`).
    pub fn wait_for_completion(&self) -> Result<(), ScpiError> {
        let response = self.query("*OPC?")?;
        if codec::clean_response(&response) == "1" {
            Ok(())
        } else {
            Err(ScpiError::Parse {
                response,
                expected: "operation complete (1)",
            })
        }
    }
}

impl ScpiNode for SignalAnalyzer {
    fn channel(&self) -> &ScpiChannel {
        &self.channel
    }
}

/// Assembles a [`SignalAnalyzer`] with a chosen model and mode discovery.
///
/// Without a discovery strategy every known mode is registered, which is what
/// the per-model constructors do.
pub struct SignalAnalyzerBuilder {
    channel: ScpiChannel,
    model: Option<InstrumentModel>,
    discovery: Box<dyn DiscoverModes>,
}

impl SignalAnalyzerBuilder {
    pub fn new(channel: ScpiChannel) -> Self {
        Self {
            channel,
            model: None,
            discovery: Box::new(FixedModes::default()),
        }
    }

    pub fn model(mut self, model: InstrumentModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn discovery<D: DiscoverModes + 'static>(mut self, discovery: D) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    pub fn build(self) -> Result<SignalAnalyzer, ScpiError> {
        let _span = tracing::debug_span!("build_analyzer", model = ?self.model).entered();

        let modes = self.discovery.discover(&self.channel)?;
        log::debug!("Registering modes {:?}", modes);
        Ok(SignalAnalyzer::assemble(self.channel, self.model, &modes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackTransport;
    use crate::measurement::MeasurementCapability;
    use crate::menus::TriggerSource;
    use crate::models::InstrumentCatalog;
    use crate::spectrum_analyzer::SpectrumAnalyzer;
    use crate::transport::TransportError;
    use crate::wcdma::{Acp, Wcdma};

    /// Loopback that loses the link on `*CLS`.
    struct FailingClear(LoopbackTransport);

    impl ScpiTransport for FailingClear {
        fn send(&mut self, command: &str) -> Result<(), TransportError> {
            if command == "*CLS" {
                return Err(TransportError::ConnectionClosed);
            }
            self.0.send(command)
        }

        fn query(&mut self, command: &str) -> Result<String, TransportError> {
            self.0.query(command)
        }
    }

    fn pxa() -> (LoopbackTransport, SignalAnalyzer) {
        let loopback = LoopbackTransport::new();
        let analyzer = SignalAnalyzer::pxa(loopback.clone());
        (loopback, analyzer)
    }

    #[test]
    fn test_attenuation_is_clamped() {
        let (loopback, analyzer) = pxa();
        for (input, expected) in [(85.0, 70.0), (-5.0, 0.0), (35.0, 35.0)] {
            analyzer.set_mechanical_attenuation(input).unwrap();
            assert_eq!(analyzer.mechanical_attenuation().unwrap(), expected);
        }
        assert_eq!(loopback.writes(), vec!["POW:ATT 70", "POW:ATT 0", "POW:ATT 35"]);
    }

    #[test]
    fn test_attenuation_nan_sends_nothing() {
        let (loopback, analyzer) = pxa();
        let err = analyzer.set_mechanical_attenuation(f64::NAN).unwrap_err();

        assert!(matches!(
            err,
            ScpiError::InvalidArgument {
                parameter: "MechanicalAttenuation",
                ..
            }
        ));
        assert!(loopback.traffic().is_empty());
    }

    #[test]
    fn test_center_frequency_in_range_sends_gigahertz() {
        let (loopback, analyzer) = pxa();
        analyzer.set_center_frequency(2.5e9).unwrap();
        analyzer.set_center_frequency(51e9).unwrap();
        analyzer.set_center_frequency(-80e6).unwrap();
        assert_eq!(
            loopback.writes(),
            vec!["FREQ:CENT 2.5 GHz", "FREQ:CENT 51 GHz", "FREQ:CENT -0.08 GHz"]
        );
    }

    #[test]
    fn test_center_frequency_out_of_range_sends_nothing() {
        let (loopback, analyzer) = pxa();
        for hz in [51.5e9, -81e6] {
            assert!(matches!(
                analyzer.set_center_frequency(hz),
                Err(ScpiError::OutOfRange {
                    parameter: "CenterFrequency",
                    ..
                })
            ));
        }
        assert!(loopback.traffic().is_empty());
    }

    #[test]
    fn test_center_frequency_query_parses_hz() {
        let (loopback, analyzer) = pxa();
        loopback.stub("FREQ:CENT?", "+2.50000000E+009\n");
        assert_eq!(analyzer.center_frequency().unwrap(), 2.5e9);
    }

    #[test]
    fn test_boolean_round_trips_use_accessor_encoding() {
        let (loopback, analyzer) = pxa();
        for value in [true, false] {
            analyzer.set_continuous_sweep(value).unwrap();
            assert_eq!(analyzer.continuous_sweep().unwrap(), value);
            analyzer.set_auto_cal(value).unwrap();
            assert_eq!(analyzer.auto_cal().unwrap(), value);
            analyzer.set_preselector_enabled(value).unwrap();
            assert_eq!(analyzer.preselector_enabled().unwrap(), value);
            analyzer.set_display_enabled(value).unwrap();
            assert_eq!(analyzer.display_enabled().unwrap(), value);
            analyzer.set_auto_rbw(value).unwrap();
            assert_eq!(analyzer.auto_rbw().unwrap(), value);
            analyzer.set_auto_vbw(value).unwrap();
            assert_eq!(analyzer.auto_vbw().unwrap(), value);
            analyzer.set_auto_sweep_time(value).unwrap();
            assert_eq!(analyzer.auto_sweep_time().unwrap(), value);
        }
        let writes = loopback.writes();
        assert!(writes.contains(&"INIT:CONT 1".to_string()));
        assert!(writes.contains(&"CAL:AUTO ON".to_string()));
        assert!(writes.contains(&"CAL:AUTO OFF".to_string()));
        assert!(writes.contains(&"SWE:TIME:AUTO 0".to_string()));
    }

    #[test]
    fn test_boolean_queries_tolerate_padding() {
        let (loopback, analyzer) = pxa();
        loopback.stub("DISP:ENAB?", "\"1\"\r\n").stub("CAL:AUTO?", "ON\n");
        assert!(analyzer.display_enabled().unwrap());
        assert!(analyzer.auto_cal().unwrap());
    }

    #[test]
    fn test_single_and_continuous_are_inverse() {
        let (loopback, analyzer) = pxa();
        analyzer.set_single_sweep(true).unwrap();
        assert!(!analyzer.continuous_sweep().unwrap());
        assert!(analyzer.single_sweep().unwrap());

        analyzer.set_continuous_sweep(true).unwrap();
        assert!(!analyzer.single_sweep().unwrap());
        assert_eq!(loopback.writes(), vec!["INIT:CONT 0", "INIT:CONT 1"]);
    }

    #[test]
    fn test_bandwidths_and_span() {
        let (loopback, analyzer) = pxa();
        analyzer.set_resolution_bandwidth(1e3).unwrap();
        analyzer.set_video_bandwidth(3e3).unwrap();
        analyzer.set_span(10e6).unwrap();
        assert_eq!(analyzer.resolution_bandwidth().unwrap(), 1e3);
        assert_eq!(analyzer.video_bandwidth().unwrap(), 3e3);
        assert_eq!(analyzer.span().unwrap(), 10e6);
        assert_eq!(
            loopback.writes(),
            vec!["BAND 1000", "BAND:VID 3000", "FREQ:SPAN 10000000"]
        );
    }

    #[test]
    fn test_options_query() {
        let (loopback, analyzer) = pxa();
        loopback.stub("*OPT?", "\"OPT1,OPT2,OPT3\"\r\n");
        assert_eq!(analyzer.options().unwrap(), vec!["OPT1", "OPT2", "OPT3"]);
    }

    #[test]
    fn test_reset_then_clear() {
        let (loopback, mut analyzer) = pxa();
        analyzer.reset().unwrap();
        assert_eq!(loopback.traffic(), vec!["*RST", "*CLS"]);
    }

    #[test]
    fn test_failed_clear_after_reset_still_drops_trigger_cache() {
        let loopback = LoopbackTransport::new();
        let mut analyzer = SignalAnalyzer::pxa(FailingClear(loopback.clone()));

        let sa = analyzer.mode_mut::<SpectrumAnalyzer>().unwrap();
        sa.trigger_mut().set_source(TriggerSource::External2).unwrap();
        loopback.clear_traffic();

        assert!(matches!(
            analyzer.reset(),
            Err(ScpiError::Transport(TransportError::ConnectionClosed))
        ));
        let sa = analyzer.mode_mut::<SpectrumAnalyzer>().unwrap();
        assert_eq!(sa.trigger().cache().source(), None);
        sa.trigger_mut().set_source(TriggerSource::External2).unwrap();

        assert_eq!(loopback.writes(), vec!["*RST", "TRIG:SOUR EXT2"]);
    }

    #[test]
    fn test_reset_invalidates_mode_trigger_cache() {
        let (loopback, mut analyzer) = pxa();
        let sa = analyzer.mode_mut::<SpectrumAnalyzer>().unwrap();
        sa.trigger_mut().set_source(TriggerSource::External2).unwrap();
        analyzer.reset().unwrap();
        let sa = analyzer.mode_mut::<SpectrumAnalyzer>().unwrap();
        sa.trigger_mut().set_source(TriggerSource::External2).unwrap();
        assert_eq!(
            loopback.writes(),
            vec!["TRIG:SOUR EXT2", "*RST", "*CLS", "TRIG:SOUR EXT2"]
        );
    }

    #[test]
    fn test_get_error_trims_newline() {
        let (loopback, analyzer) = pxa();
        loopback.stub("SYST:ERR?", "+0,\"No error\"\n");
        assert_eq!(analyzer.get_error().unwrap(), "+0,\"No error\"");
    }

    #[test]
    fn test_drain_errors_stops_at_no_error() {
        let (loopback, analyzer) = pxa();
        loopback.stub("SYST:ERR?", "+0,\"No error\"\n");
        assert!(analyzer.drain_errors().unwrap().is_empty());
        assert_eq!(loopback.traffic(), vec!["SYST:ERR?"]);
    }

    #[test]
    fn test_drain_errors_is_bounded() {
        let (loopback, analyzer) = pxa();
        loopback.stub("SYST:ERR?", "-113,\"Undefined header\"\n");
        let entries = analyzer.drain_errors().unwrap();
        assert_eq!(entries.len(), MAX_ERROR_QUEUE);
        assert_eq!(
            entries[0],
            ErrorEntry {
                code: -113,
                message: "Undefined header".to_string()
            }
        );
    }

    #[test]
    fn test_simple_commands() {
        let (loopback, analyzer) = pxa();
        analyzer.init_imm().unwrap();
        analyzer.clear_errors().unwrap();
        loopback.stub("*OPC?", "1\n");
        analyzer.wait_for_completion().unwrap();
        assert_eq!(loopback.traffic(), vec!["INIT:IMM", "*CLS", "*OPC?"]);
    }

    #[test]
    fn test_identify() {
        let (loopback, analyzer) = pxa();
        loopback.stub("*IDN?", "Agilent Technologies,N9030A,US1,A.10.01\n");
        let identity = analyzer.identify().unwrap();
        assert_eq!(InstrumentModel::from_identity(&identity), Some(InstrumentModel::Pxa));
        assert_eq!(analyzer.model(), Some(InstrumentModel::Pxa));
    }

    #[test]
    fn test_modes_are_built_eagerly_and_identity_stable() {
        let (loopback, analyzer) = pxa();
        assert!(analyzer.has_mode::<SpectrumAnalyzer>());
        assert!(analyzer.has_mode::<Wcdma>());
        assert_eq!(analyzer.modes().len(), 2);

        let first = analyzer.mode::<Wcdma>().unwrap();
        let second = analyzer.mode::<Wcdma>().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(loopback.traffic().is_empty());
    }

    #[test]
    fn test_unregistered_mode_is_reported_by_name() {
        let loopback = LoopbackTransport::new();
        loopback.stub("INST:CAT?", "\"SA 1\"\n");
        let analyzer = SignalAnalyzer::builder(loopback.clone())
            .model(InstrumentModel::Exa)
            .discovery(InstrumentCatalog)
            .build()
            .unwrap();

        assert!(analyzer.has_mode::<SpectrumAnalyzer>());
        assert!(!analyzer.has_mode::<Wcdma>());
        let err = analyzer.mode::<Wcdma>().unwrap_err();
        assert!(matches!(
            err,
            ScpiError::CapabilityNotFound {
                kind: CapabilityKind::Mode,
                name: "Wcdma"
            }
        ));
        assert_eq!(
            err.to_string(),
            "Mode \"Wcdma\" is not available on this instrument"
        );
    }

    #[test]
    fn test_builder_defaults_to_every_mode() {
        let loopback = LoopbackTransport::new();
        let analyzer = SignalAnalyzer::builder(loopback.clone()).build().unwrap();
        assert!(analyzer.has_mode::<SpectrumAnalyzer>());
        assert!(analyzer.has_mode::<Wcdma>());
        assert_eq!(analyzer.model(), None);
        assert!(loopback.traffic().is_empty());
    }

    #[test]
    fn test_all_nodes_share_one_channel() {
        let (_loopback, analyzer) = pxa();
        let wcdma = analyzer.mode::<Wcdma>().unwrap();
        let acp = wcdma.measurement::<Acp>().unwrap();
        assert!(analyzer.channel().same_channel(wcdma.channel()));
        assert!(analyzer.channel().same_channel(acp.channel()));
        assert!(analyzer.channel().same_channel(analyzer.markers().channel()));
        assert!(analyzer.channel().same_channel(analyzer.trigger().channel()));
    }

    #[test]
    fn test_mode_and_measurement_flow() {
        let (loopback, analyzer) = pxa();
        let wcdma = analyzer.mode::<Wcdma>().unwrap();
        wcdma.load().unwrap();
        let acp = wcdma.acp().unwrap();
        acp.configure().unwrap();
        acp.set_averaging_count(10).unwrap();
        acp.initiate().unwrap();
        assert_eq!(
            loopback.writes(),
            vec!["INST:SEL WCDMA", "CONF:ACP", "ACP:AVER:COUN 10", "INITiate:ACP"]
        );
    }
}
