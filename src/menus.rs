//! Cross-cutting accessor groups: markers and triggers.

use std::fmt;
use std::str::FromStr;

use crate::codec::{BoolEncoding, Limits};
use crate::error::ScpiError;
use crate::node::{ScpiChannel, ScpiNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Immediate,
    Video,
    Line,
    External1,
    External2,
    RfBurst,
    Periodic,
    If,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Immediate => "IMM",
            TriggerSource::Video => "VID",
            TriggerSource::Line => "LINE",
            TriggerSource::External1 => "EXT1",
            TriggerSource::External2 => "EXT2",
            TriggerSource::RfBurst => "RFB",
            TriggerSource::Periodic => "PER",
            TriggerSource::If => "IF",
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerSource {
    type Err = ScpiError;

    /// Accepts short and long SCPI forms, e.g. `EXT1` and `EXTernal1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = crate::codec::clean_response(s).to_ascii_uppercase();
        let source = match upper.as_str() {
            "IMM" | "IMMEDIATE" => TriggerSource::Immediate,
            "VID" | "VIDEO" => TriggerSource::Video,
            "LINE" => TriggerSource::Line,
            "EXT1" | "EXTERNAL1" => TriggerSource::External1,
            "EXT2" | "EXTERNAL2" => TriggerSource::External2,
            "RFB" | "RFBURST" => TriggerSource::RfBurst,
            "PER" | "PERIODIC" => TriggerSource::Periodic,
            "IF" => TriggerSource::If,
            _ => {
                return Err(ScpiError::Parse {
                    response: s.to_string(),
                    expected: "a trigger source",
                })
            }
        };
        Ok(source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMode {
    Position,
    Delta,
    Fixed,
    Off,
}

impl MarkerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerMode::Position => "POS",
            MarkerMode::Delta => "DELT",
            MarkerMode::Fixed => "FIX",
            MarkerMode::Off => "OFF",
        }
    }
}

/// X-Series analyzers have markers 1 to 12.
const MARKER_NUMBERS: Limits = Limits::new(1.0, 12.0);

#[derive(Debug, Clone)]
pub struct MarkerMenu {
    channel: ScpiChannel,
}

impl ScpiNode for MarkerMenu {
    fn channel(&self) -> &ScpiChannel {
        &self.channel
    }
}

impl MarkerMenu {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self { channel }
    }

    fn header(marker: u8, suffix: &str) -> Result<String, ScpiError> {
        MARKER_NUMBERS.check("Marker", f64::from(marker))?;
        Ok(format!("CALC:MARK{}:{}", marker, suffix))
    }

    pub fn enable_marker(&self, marker: u8) -> Result<(), ScpiError> {
        self.write_bool(&Self::header(marker, "STAT")?, true, BoolEncoding::Numeric)
    }

    pub fn disable_marker(&self, marker: u8) -> Result<(), ScpiError> {
        self.write_bool(&Self::header(marker, "STAT")?, false, BoolEncoding::Numeric)
    }

    pub fn set_mode(&self, marker: u8, mode: MarkerMode) -> Result<(), ScpiError> {
        self.write_value(&Self::header(marker, "MODE")?, mode.as_str())
    }

    pub fn set_frequency(&self, marker: u8, hz: f64) -> Result<(), ScpiError> {
        self.write_value(&Self::header(marker, "X")?, hz)
    }

    pub fn set_counter(&self, marker: u8, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool(&Self::header(marker, "FCO")?, enabled, BoolEncoding::Numeric)
    }

    /// Move the marker to the highest peak of the trace.
    pub fn peak_search(&self, marker: u8) -> Result<(), ScpiError> {
        self.command(&Self::header(marker, "MAX")?)
    }

    /// Amplitude at the marker.
    pub fn y(&self, marker: u8) -> Result<f64, ScpiError> {
        self.read_f64(&Self::header(marker, "Y")?)
    }

    /// Frequency reported by the marker counter.
    pub fn counter_x(&self, marker: u8) -> Result<f64, ScpiError> {
        self.read_f64(&Self::header(marker, "FCO:X")?)
    }
}

/// Instrument-wide trigger settings. Every write is sent.
#[derive(Debug, Clone)]
pub struct TriggerMenu {
    channel: ScpiChannel,
}

impl ScpiNode for TriggerMenu {
    fn channel(&self) -> &ScpiChannel {
        &self.channel
    }
}

impl TriggerMenu {
    pub(crate) fn new(channel: ScpiChannel) -> Self {
        Self { channel }
    }

    pub fn set_source(&self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("TRIG:SOUR", source)
    }

    pub fn source(&self) -> Result<TriggerSource, ScpiError> {
        self.query("TRIG:SOUR?")?.parse()
    }
}

/// Last values a mode trigger menu wrote.
///
/// This is a local record of this process's own writes, not a mirror of the
/// instrument: changes made from the front panel or another client are not
/// seen until a getter re-queries. Anything that may have changed the
/// instrument behind our back (a reset, a preset) must call [`invalidate`].
///
/// [`invalidate`]: TriggerCache::invalidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerCache {
    source: Option<TriggerSource>,
    rf_burst_level: Option<f64>,
}

impl TriggerCache {
    pub fn source(&self) -> Option<TriggerSource> {
        self.source
    }

    pub fn rf_burst_level(&self) -> Option<f64> {
        self.rf_burst_level
    }

    pub fn invalidate(&mut self) {
        self.source = None;
        self.rf_burst_level = None;
    }
}

/// RF burst trigger settings scoped to a mode.
///
/// With caching enabled, writing the same source or level twice in a row only
/// sends the first write. The `force_*` setters always send.
#[derive(Debug, Clone)]
pub struct ModeTriggerMenu {
    channel: ScpiChannel,
    caching: bool,
    cache: TriggerCache,
}

impl ScpiNode for ModeTriggerMenu {
    fn channel(&self) -> &ScpiChannel {
        &self.channel
    }
}

impl ModeTriggerMenu {
    pub(crate) fn cached(channel: ScpiChannel) -> Self {
        Self {
            channel,
            caching: true,
            cache: TriggerCache::default(),
        }
    }

    pub(crate) fn uncached(channel: ScpiChannel) -> Self {
        Self {
            channel,
            caching: false,
            cache: TriggerCache::default(),
        }
    }

    pub fn is_caching(&self) -> bool {
        self.caching
    }

    pub fn cache(&self) -> &TriggerCache {
        &self.cache
    }

    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn set_source(&mut self, source: TriggerSource) -> Result<(), ScpiError> {
        if self.caching && self.cache.source == Some(source) {
            log::trace!("Trigger source already {}, skipping write", source);
            return Ok(());
        }
        self.force_source(source)
    }

    pub fn force_source(&mut self, source: TriggerSource) -> Result<(), ScpiError> {
        self.write_value("TRIG:SOUR", source)?;
        if self.caching {
            self.cache.source = Some(source);
        }
        Ok(())
    }

    pub fn set_rf_burst_level(&mut self, dbm: f64) -> Result<(), ScpiError> {
        if self.caching && self.cache.rf_burst_level == Some(dbm) {
            log::trace!("RF burst level already {}, skipping write", dbm);
            return Ok(());
        }
        self.force_rf_burst_level(dbm)
    }

    pub fn force_rf_burst_level(&mut self, dbm: f64) -> Result<(), ScpiError> {
        self.write_value("TRIG:RFB:LEV:ABS", dbm)?;
        if self.caching {
            self.cache.rf_burst_level = Some(dbm);
        }
        Ok(())
    }

    /// Queries the instrument and refreshes the cache with the answer.
    pub fn rf_burst_level(&mut self) -> Result<f64, ScpiError> {
        let level = self.read_f64("TRIG:RFB:LEV:ABS")?;
        if self.caching {
            self.cache.rf_burst_level = Some(level);
        }
        Ok(level)
    }

    /// Sets the delay and enables the delay only when it is positive.
    pub fn set_rf_burst_delay(&self, seconds: f64) -> Result<(), ScpiError> {
        self.write_value("TRIG:RFB:DEL", seconds)?;
        self.set_rf_burst_delay_state(seconds > 0.0)
    }

    pub fn set_rf_burst_delay_state(&self, enabled: bool) -> Result<(), ScpiError> {
        self.write_bool("TRIG:RFB:DEL:STAT", enabled, BoolEncoding::Numeric)
    }
}
