use crate::codec::{self, BoolEncoding};
use crate::error::ScpiError;
use crate::measurement::{Measurement, MeasurementCapability, MeasurementCore, MeasurementId};
use crate::menus::{ModeTriggerMenu, TriggerSource};
use crate::mode::{Mode, ModeCapability, ModeCore, ModeId};
use crate::node::{ScpiChannel, ScpiNode};

/// W-CDMA mode (`INST:SEL WCDMA`).
///
/// The mode trigger menu here sends every write; nothing is cached.
#[derive(Debug)]
pub struct Wcdma {
    core: ModeCore,
    trigger: ModeTriggerMenu,
}

impl Wcdma {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        let mut core = ModeCore::new(Self::ID, channel.clone());
        core.register(ListPowerStep::new(channel.clone()));
        core.register(CombinedWcdma::new(channel.clone()));
        core.register(Acp::new(channel.clone()));

        Self {
            core,
            trigger: ModeTriggerMenu::uncached(channel),
        }
    }

    pub fn list_power_step(&self) -> Result<&ListPowerStep, ScpiError> {
        self.measurement::<ListPowerStep>()
    }

    pub fn combined_wcdma(&self) -> Result<&CombinedWcdma, ScpiError> {
        self.measurement::<CombinedWcdma>()
    }

    pub fn acp(&self) -> Result<&Acp, ScpiError> {
        self.measurement::<Acp>()
    }

    pub fn trigger(&self) -> &ModeTriggerMenu {
        &self.trigger
    }

    pub fn trigger_mut(&mut self) -> &mut ModeTriggerMenu {
        &mut self.trigger
    }
}

impl ScpiNode for Wcdma {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl ModeCapability for Wcdma {
    const ID: ModeId = ModeId::Wcdma;

    fn core(&self) -> &ModeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModeCore {
        &mut self.core
    }

    fn from_entry(entry: &Mode) -> Option<&Self> {
        match entry {
            Mode::Wcdma(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Mode) -> Option<&mut Self> {
        match entry {
            Mode::Wcdma(m) => Some(m),
            _ => None,
        }
    }
}

/// List Power Step measurement (`LPST`).
#[derive(Debug, Clone)]
pub struct ListPowerStep {
    core: MeasurementCore,
}

impl ListPowerStep {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self {
            core: MeasurementCore::new(Self::ID, channel),
        }
    }

    pub fn set_frequency(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:LIST:FREQ", hz)
    }

    /// Per-step results of the list sequence.
    pub fn calc_list(&self) -> Result<Vec<f64>, ScpiError> {
        codec::parse_f64_list(&self.query("CALC:LPST:LIST?")?)
    }

    pub fn set_trigger_source(&self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("LPST:TRIG:SOUR", source)
    }

    pub fn set_average_count(&self, count: u32) -> Result<(), ScpiError> {
        self.write_value("LPST:AVER:COUN", count)
    }

    pub fn set_averaging(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("LPST:AVER", enabled, BoolEncoding::Numeric)
    }

    pub fn set_resolution_bandwidth(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:BAND", hz)
    }

    pub fn set_video_bandwidth(&self, hz: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:BAND:VID", hz)
    }

    pub fn set_sweep_points(&self, points: u32) -> Result<(), ScpiError> {
        self.write_value("LPST:SWE:POIN", points)
    }

    pub fn set_sweep_step_time(&self, seconds: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:SWE:STEP:TIME", seconds)
    }

    pub fn set_sweep_step_length(&self, seconds: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:SWE:STEP:LENG", seconds)
    }

    pub fn set_steps_count(&self, steps: u32) -> Result<(), ScpiError> {
        self.write_value("LPST:LIST:STEP", steps)
    }

    pub fn set_sweep_step_offset(&self, seconds: f64) -> Result<(), ScpiError> {
        self.write_value("LPST:LIST:SWE:STEP:OFFS", seconds)
    }

    /// Raw argument, the instrument accepts a comma separated time list.
    pub fn set_list_time(&self, times: &str) -> Result<(), ScpiError> {
        self.write_value("LPST:LIST:TIME", times)
    }

    pub fn set_list_state(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("LPST:LIST:STAT", enabled, BoolEncoding::Numeric)
    }

    pub fn set_display(&self, view: &str) -> Result<(), ScpiError> {
        self.write_value("DISP:LPST:VIEW", view)
    }
}

impl ScpiNode for ListPowerStep {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl MeasurementCapability for ListPowerStep {
    const ID: MeasurementId = MeasurementId::ListPowerStep;

    fn core(&self) -> &MeasurementCore {
        &self.core
    }

    fn from_entry(entry: &Measurement) -> Option<&Self> {
        match entry {
            Measurement::ListPowerStep(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Measurement) -> Option<&mut Self> {
        match entry {
            Measurement::ListPowerStep(m) => Some(m),
            _ => None,
        }
    }
}

/// Combined W-CDMA measurement (`CWCD`).
#[derive(Debug, Clone)]
pub struct CombinedWcdma {
    core: MeasurementCore,
}

impl CombinedWcdma {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self {
            core: MeasurementCore::new(Self::ID, channel),
        }
    }

    pub fn fetch1(&self) -> Result<Vec<f64>, ScpiError> {
        codec::parse_f64_list(&self.query("FETC:CWCD?")?)
    }

    pub fn fetch2(&self) -> Result<Vec<f64>, ScpiError> {
        codec::parse_f64_list(&self.query("FETC:CWCD2?")?)
    }

    pub fn set_averaging_count(&self, count: u32) -> Result<(), ScpiError> {
        self.write_value("CWCD:AVER:COUN", count)
    }

    pub fn set_averaging(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("CWCD:AVER", enabled, BoolEncoding::Numeric)
    }

    pub fn set_frequency_list(&self, frequencies: &[f64]) -> Result<(), ScpiError> {
        if frequencies.is_empty() {
            return Err(ScpiError::InvalidArgument {
                parameter: "FrequencyList",
                reason: "at least one frequency is required",
            });
        }
        self.write_value("CWCD:LIST:FREQ", codec::join_frequencies(frequencies))
    }

    pub fn set_include_iq_offset(&self, include: bool) -> Result<(), ScpiError> {
        self.write_bool("CALC:CWCD:RHO:IQOF:INCL", include, BoolEncoding::Numeric)
    }

    pub fn set_trigger_source(&self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("TRIG:CWCD:SOUR", source)
    }
}

impl ScpiNode for CombinedWcdma {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl MeasurementCapability for CombinedWcdma {
    const ID: MeasurementId = MeasurementId::CombinedWcdma;

    fn core(&self) -> &MeasurementCore {
        &self.core
    }

    fn from_entry(entry: &Measurement) -> Option<&Self> {
        match entry {
            Measurement::CombinedWcdma(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Measurement) -> Option<&mut Self> {
        match entry {
            Measurement::CombinedWcdma(m) => Some(m),
            _ => None,
        }
    }
}

/// Adjacent Channel Power measurement (`ACP`).
#[derive(Debug, Clone)]
pub struct Acp {
    core: MeasurementCore,
}

impl Acp {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self {
            core: MeasurementCore::new(Self::ID, channel),
        }
    }

    pub fn fetch(&self) -> Result<Vec<f64>, ScpiError> {
        codec::parse_f64_list(&self.query("FETC:ACP?")?)
    }

    pub fn set_trigger_source(&self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("TRIG:ACP:SOUR", source)
    }

    pub fn set_averaging_count(&self, count: u32) -> Result<(), ScpiError> {
        self.write_value("ACP:AVER:COUN", count)
    }

    pub fn set_averaging(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("ACP:AVER", enabled, BoolEncoding::Numeric)
    }
}

impl ScpiNode for Acp {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl MeasurementCapability for Acp {
    const ID: MeasurementId = MeasurementId::Acp;

    fn core(&self) -> &MeasurementCore {
        &self.core
    }

    fn from_entry(entry: &Measurement) -> Option<&Self> {
        match entry {
            Measurement::Acp(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Measurement) -> Option<&mut Self> {
        match entry {
            Measurement::Acp(m) => Some(m),
            _ => None,
        }
    }
}
