use crate::codec;
use crate::error::ScpiError;
use crate::measurement::{Measurement, MeasurementCapability, MeasurementCore, MeasurementId};
use crate::menus::{ModeTriggerMenu, TriggerSource};
use crate::mode::{Mode, ModeCapability, ModeCore, ModeId};
use crate::node::{ScpiChannel, ScpiNode};

/// Spectrum Analyzer mode (`INST:SEL SA`).
#[derive(Debug)]
pub struct SpectrumAnalyzer {
    core: ModeCore,
    trigger: ModeTriggerMenu,
}

impl SpectrumAnalyzer {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        let mut core = ModeCore::new(Self::ID, channel.clone());
        core.register(San::new(channel.clone()));

        Self {
            core,
            trigger: ModeTriggerMenu::cached(channel),
        }
    }

    pub fn san(&self) -> Result<&San, ScpiError> {
        self.measurement::<San>()
    }

    /// Source and RF burst level writes are cached.
    pub fn trigger(&self) -> &ModeTriggerMenu {
        &self.trigger
    }

    pub fn trigger_mut(&mut self) -> &mut ModeTriggerMenu {
        &mut self.trigger
    }
}

impl ScpiNode for SpectrumAnalyzer {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl ModeCapability for SpectrumAnalyzer {
    const ID: ModeId = ModeId::SpectrumAnalyzer;

    fn core(&self) -> &ModeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModeCore {
        &mut self.core
    }

    fn from_entry(entry: &Mode) -> Option<&Self> {
        match entry {
            Mode::SpectrumAnalyzer(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Mode) -> Option<&mut Self> {
        match entry {
            Mode::SpectrumAnalyzer(m) => Some(m),
            _ => None,
        }
    }
}

/// Swept SA measurement.
#[derive(Debug, Clone)]
pub struct San {
    core: MeasurementCore,
}

impl San {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self {
            core: MeasurementCore::new(Self::ID, channel),
        }
    }

    pub fn set_trigger_source(&self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("TRIG:SAN:SOUR", source)
    }

    /// Trace data of the last sweep.
    pub fn fetch(&self) -> Result<Vec<f64>, ScpiError> {
        codec::parse_f64_list(&self.query("FETC:SAN?")?)
    }
}

impl ScpiNode for San {
    fn channel(&self) -> &ScpiChannel {
        self.core.channel()
    }
}

impl MeasurementCapability for San {
    const ID: MeasurementId = MeasurementId::San;

    fn core(&self) -> &MeasurementCore {
        &self.core
    }

    fn from_entry(entry: &Measurement) -> Option<&Self> {
        match entry {
            Measurement::San(m) => Some(m),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut Measurement) -> Option<&mut Self> {
        match entry {
            Measurement::San(m) => Some(m),
            _ => None,
        }
    }

    // Fixed mnemonic, independent of the configure name.
    fn initiate(&self) -> Result<(), ScpiError> {
        self.command("INITiate:SAN")
    }
}
