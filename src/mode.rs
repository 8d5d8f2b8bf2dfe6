use std::fmt;

use crate::error::{CapabilityKind, ScpiError};
use crate::measurement::{Measurement, MeasurementCapability, MeasurementId};
use crate::menus::ModeTriggerMenu;
use crate::node::{ScpiChannel, ScpiNode};
use crate::registry::Registry;
use crate::spectrum_analyzer::SpectrumAnalyzer;
use crate::wcdma::Wcdma;

/// Registry key of every mode this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    SpectrumAnalyzer,
    Wcdma,
}

impl ModeId {
    pub const ALL: [ModeId; 2] = [ModeId::SpectrumAnalyzer, ModeId::Wcdma];

    pub fn name(&self) -> &'static str {
        match self {
            ModeId::SpectrumAnalyzer => "SpectrumAnalyzer",
            ModeId::Wcdma => "Wcdma",
        }
    }

    /// Argument of `INST:SEL`.
    pub fn scpi_name(&self) -> &'static str {
        match self {
            ModeId::SpectrumAnalyzer => "SA",
            ModeId::Wcdma => "WCDMA",
        }
    }

    pub fn from_scpi_name(name: &str) -> Option<ModeId> {
        Self::ALL
            .into_iter()
            .find(|id| id.scpi_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State shared by all modes: SCPI name, channel and measurement registry.
#[derive(Debug)]
pub struct ModeCore {
    scpi_name: &'static str,
    channel: ScpiChannel,
    measurements: Registry<MeasurementId, Measurement>,
}

impl ModeCore {
    pub(crate) fn new(id: ModeId, channel: ScpiChannel) -> Self {
        Self {
            scpi_name: id.scpi_name(),
            channel,
            measurements: Registry::new(),
        }
    }

    pub(crate) fn register<T>(&mut self, measurement: T)
    where
        T: MeasurementCapability + Into<Measurement>,
    {
        self.measurements.register(T::ID, measurement.into());
    }

    pub fn scpi_name(&self) -> &'static str {
        self.scpi_name
    }

    pub fn channel(&self) -> &ScpiChannel {
        &self.channel
    }

    pub fn measurements(&self) -> &Registry<MeasurementId, Measurement> {
        &self.measurements
    }

    pub fn measurement<T: MeasurementCapability>(&self) -> Result<&T, ScpiError> {
        self.measurements
            .get(&T::ID)
            .and_then(T::from_entry)
            .ok_or(ScpiError::CapabilityNotFound {
                kind: CapabilityKind::Measurement,
                name: T::ID.name(),
            })
    }

    pub fn measurement_mut<T: MeasurementCapability>(&mut self) -> Result<&mut T, ScpiError> {
        self.measurements
            .get_mut(&T::ID)
            .and_then(T::from_entry_mut)
            .ok_or(ScpiError::CapabilityNotFound {
                kind: CapabilityKind::Measurement,
                name: T::ID.name(),
            })
    }

    pub fn has_measurement<T: MeasurementCapability>(&self) -> bool {
        self.measurements.contains(&T::ID)
    }
}

/// A mode type that can be looked up by type in the instrument's registry.
///
/// The client keeps no notion of the active mode. Call [`load`] before using
/// accessors that only make sense in this mode; the instrument rejects or
/// ignores them otherwise.
///
/// [`load`]: ModeCapability::load
pub trait ModeCapability: ScpiNode + Sized {
    const ID: ModeId;

    fn core(&self) -> &ModeCore;

    fn core_mut(&mut self) -> &mut ModeCore;

    fn from_entry(entry: &Mode) -> Option<&Self>;

    fn from_entry_mut(entry: &mut Mode) -> Option<&mut Self>;

    fn scpi_name(&self) -> &'static str {
        self.core().scpi_name()
    }

    fn load(&self) -> Result<(), ScpiError> {
        tracing::debug!(mode = Self::ID.name(), "selecting mode");
        self.command(&format!("INST:SEL {}", self.scpi_name()))
    }

    fn measurement<T: MeasurementCapability>(&self) -> Result<&T, ScpiError> {
        self.core().measurement::<T>()
    }

    fn measurement_mut<T: MeasurementCapability>(&mut self) -> Result<&mut T, ScpiError> {
        self.core_mut().measurement_mut::<T>()
    }

    fn has_measurement<T: MeasurementCapability>(&self) -> bool {
        self.core().has_measurement::<T>()
    }
}

/// Any registered mode.
#[derive(Debug)]
pub enum Mode {
    SpectrumAnalyzer(SpectrumAnalyzer),
    Wcdma(Wcdma),
}

impl Mode {
    /// Construct the mode for `id` on `channel`, with all its measurements.
    pub fn build(id: ModeId, channel: ScpiChannel) -> Self {
        match id {
            ModeId::SpectrumAnalyzer => SpectrumAnalyzer::new(channel).into(),
            ModeId::Wcdma => Wcdma::new(channel).into(),
        }
    }

    pub fn id(&self) -> ModeId {
        match self {
            Mode::SpectrumAnalyzer(_) => SpectrumAnalyzer::ID,
            Mode::Wcdma(_) => Wcdma::ID,
        }
    }

    pub fn core(&self) -> &ModeCore {
        match self {
            Mode::SpectrumAnalyzer(m) => m.core(),
            Mode::Wcdma(m) => m.core(),
        }
    }

    pub fn scpi_name(&self) -> &'static str {
        self.core().scpi_name()
    }

    pub fn trigger_mut(&mut self) -> &mut ModeTriggerMenu {
        match self {
            Mode::SpectrumAnalyzer(m) => m.trigger_mut(),
            Mode::Wcdma(m) => m.trigger_mut(),
        }
    }

    pub fn load(&self) -> Result<(), ScpiError> {
        match self {
            Mode::SpectrumAnalyzer(m) => m.load(),
            Mode::Wcdma(m) => m.load(),
        }
    }
}

impl From<SpectrumAnalyzer> for Mode {
    fn from(m: SpectrumAnalyzer) -> Self {
        Self::SpectrumAnalyzer(m)
    }
}

impl From<Wcdma> for Mode {
    fn from(m: Wcdma) -> Self {
        Self::Wcdma(m)
    }
}
