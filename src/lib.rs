//! # xsa-scpi
//!
//! A typed SCPI client for Keysight/Agilent X-Series signal analyzers
//! (PXA N9030A, MXA N9020A, EXA N9010A, CXA N9000A).
//!
//! Every instrument property is exposed as a typed getter/setter that builds
//! the SCPI command string, sends it over a pluggable transport and parses the
//! response. Operating modes (Spectrum Analyzer, WCDMA) and their measurements
//! are looked up by type, so asking for a measurement a mode does not have is
//! a `CapabilityNotFound` error rather than a cast failure.
//!
//! ## Features
//!
//! - **Transports**: raw TCP socket (port 5025), serial line, and an in-memory
//!   loopback for tests
//! - **Range handling**: attenuation is clamped, center frequency is rejected
//!   before anything is sent
//! - **Mode discovery**: fixed mode set by default, or read from `INST:CAT?`
//! - **Write caches**: mode trigger menus skip redundant source and RF-burst
//!   level writes
//!
//! ## Examples
//!
//! ### Connecting
//!
//! ```rust,no_run
//! use xsa_scpi::{ConnectionSettings, Connector};
//!
//! let analyzer = Connector::connect(&ConnectionSettings::new("TCPIP0::192.168.1.20::SOCKET"))?;
//! println!("{}", analyzer.identify()?);
//!
//! analyzer.set_center_frequency(1.9e9)?;
//! analyzer.set_mechanical_attenuation(10.0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Measurements
//!
//! ```rust
//! use xsa_scpi::{
//!     Acp, LoopbackTransport, MeasurementCapability, ModeCapability, SignalAnalyzer, TriggerSource,
//!     Wcdma,
//! };
//!
//! let loopback = LoopbackTransport::new();
//! loopback.stub("FETC:ACP?", "-12.5,-45.1,-47.3");
//!
//! let analyzer = SignalAnalyzer::pxa(loopback.clone());
//! let wcdma = analyzer.mode::<Wcdma>()?;
//! wcdma.load()?;
//!
//! let acp = wcdma.measurement::<Acp>()?;
//! acp.configure()?;
//! acp.set_trigger_source(TriggerSource::External1)?;
//! acp.initiate()?;
//!
//! assert_eq!(acp.fetch()?, vec![-12.5, -45.1, -47.3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Error queue
//!
//! ```rust,no_run
//! use xsa_scpi::{ConnectionSettings, Connector};
//!
//! let analyzer = Connector::connect(&ConnectionSettings::new("pxa.lab:5025"))?;
//! for entry in analyzer.drain_errors()? {
//!     println!("{}: {}", entry.code, entry.message);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyzer;
pub mod codec;
pub mod connector;
pub mod error;
pub mod loopback;
pub mod measurement;
pub mod menus;
pub mod mode;
pub mod models;
pub mod node;
pub mod registry;
pub mod serial_transport;
pub mod spectrum_analyzer;
pub mod tcp_transport;
pub mod transport;
pub mod wcdma;

// Re-export the main types for convenience
pub use analyzer::{ErrorEntry, SignalAnalyzer, SignalAnalyzerBuilder};

pub use codec::{BoolEncoding, FrequencyUnit, Limits};

pub use connector::{ConnectionSettings, Connector, ConnectorError, Resource};

pub use error::{CapabilityKind, ScpiError};

pub use loopback::LoopbackTransport;

pub use measurement::{Measurement, MeasurementCapability, MeasurementId};

pub use menus::{MarkerMenu, MarkerMode, ModeTriggerMenu, TriggerCache, TriggerMenu, TriggerSource};

pub use mode::{Mode, ModeCapability, ModeId};

pub use models::{DiscoverModes, FixedModes, Identity, InstrumentCatalog, InstrumentModel};

pub use node::{ScpiChannel, ScpiNode};

pub use spectrum_analyzer::{San, SpectrumAnalyzer};

pub use transport::{ScpiTransport, TransportError};

pub use serial_transport::SerialTransport;
pub use tcp_transport::TcpTransport;

pub use wcdma::{Acp, CombinedWcdma, ListPowerStep, Wcdma};
