use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::analyzer::{SignalAnalyzer, SignalAnalyzerBuilder};
use crate::error::ScpiError;
use crate::models::{Identity, InstrumentCatalog, InstrumentModel};
use crate::node::ScpiChannel;
use crate::serial_transport::SerialTransport;
use crate::tcp_transport::{TcpTransport, DEFAULT_SCPI_PORT};
use crate::transport::{ScpiTransport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Invalid resource string '{resource}': {reason}")]
    InvalidResource {
        resource: String,
        reason: &'static str,
    },

    #[error("'{identity}' is not a supported X-Series signal analyzer")]
    UnsupportedInstrument { identity: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("SCPI error: {0}")]
    Scpi(#[from] ScpiError),
}

/// Where an instrument lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Tcp { host: String, port: u16 },
    Serial { path: String },
}

impl FromStr for Resource {
    type Err = ConnectorError;

    /// Accepts `TCPIP[n]::<host>[::<port>]::SOCKET`, `<host>:<port>` and
    /// `ASRL<path>::INSTR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ConnectorError::InvalidResource {
            resource: s.to_string(),
            reason,
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let upper = trimmed.to_ascii_uppercase();
        if upper.starts_with("TCPIP") {
            let parts: Vec<&str> = trimmed.split("::").collect();
            let board = &parts[0]["TCPIP".len()..];
            if !board.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid("bad TCPIP board number"));
            }
            return match parts.as_slice() {
                [_, host, suffix] if suffix.eq_ignore_ascii_case("SOCKET") => {
                    tcp(host, DEFAULT_SCPI_PORT).ok_or_else(|| invalid("missing host"))
                }
                [_, host, port, suffix] if suffix.eq_ignore_ascii_case("SOCKET") => {
                    let port = port.parse().map_err(|_| invalid("bad port"))?;
                    tcp(host, port).ok_or_else(|| invalid("missing host"))
                }
                _ => Err(invalid("expected TCPIP::<host>[::<port>]::SOCKET")),
            };
        }

        if upper.starts_with("ASRL") {
            if !upper.ends_with("::INSTR") {
                return Err(invalid("expected ASRL<path>::INSTR"));
            }
            let path = &trimmed["ASRL".len()..trimmed.len() - "::INSTR".len()];
            if path.is_empty() {
                return Err(invalid("missing serial port path"));
            }
            return Ok(Resource::Serial {
                path: path.to_string(),
            });
        }

        match trimmed.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse().map_err(|_| invalid("bad port"))?;
                tcp(host, port).ok_or_else(|| invalid("missing host"))
            }
            None => Err(invalid("unrecognised resource form")),
        }
    }
}

fn tcp(host: &str, port: u16) -> Option<Resource> {
    let host = host.trim();
    if host.is_empty() {
        return None;
    }
    Some(Resource::Tcp {
        host: host.to_string(),
        port,
    })
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Tcp { host, port } => write!(f, "TCPIP::{}::{}::SOCKET", host, port),
            Resource::Serial { path } => write!(f, "ASRL{}::INSTR", path),
        }
    }
}

/// How to reach an instrument and talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub resource: String,
    /// Applied to connecting and to every response.
    pub timeout: Duration,
    pub terminator: String,
    /// Serial resources only.
    pub baud_rate: u32,
    /// Register the modes listed by `INST:CAT?` instead of every known mode.
    pub discover_modes: bool,
}

impl ConnectionSettings {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            resource: String::new(),
            timeout: Duration::from_secs(5),
            terminator: "\n".to_string(),
            baud_rate: 9600,
            discover_modes: false,
        }
    }
}

pub struct Connector;

impl Connector {
    /// Open the transport named by the settings' resource string.
    pub fn open(settings: &ConnectionSettings) -> Result<Box<dyn ScpiTransport>, ConnectorError> {
        let resource: Resource = settings.resource.parse()?;
        log::debug!("Opening {}", resource);

        let transport: Box<dyn ScpiTransport> = match resource {
            Resource::Tcp { host, port } => Box::new(TcpTransport::connect(
                &host,
                port,
                settings.timeout,
                &settings.terminator,
            )?),
            Resource::Serial { path } => Box::new(SerialTransport::open(
                &path,
                settings.baud_rate,
                settings.timeout,
                &settings.terminator,
            )?),
        };
        Ok(transport)
    }

    /// Open the resource, check `*IDN?` names a known analyzer and build it.
    #[tracing::instrument(skip(settings), fields(resource = %settings.resource))]
    pub fn connect(settings: &ConnectionSettings) -> Result<SignalAnalyzer, ConnectorError> {
        let transport = Self::open(settings)?;
        Self::attach(transport, settings.discover_modes)
    }

    pub(crate) fn attach(
        transport: Box<dyn ScpiTransport>,
        discover_modes: bool,
    ) -> Result<SignalAnalyzer, ConnectorError> {
        let channel = ScpiChannel::from_boxed(transport);

        let raw = channel.query("*IDN?")?;
        let model = Identity::parse(&raw)
            .ok()
            .as_ref()
            .and_then(InstrumentModel::from_identity)
            .ok_or_else(|| ConnectorError::UnsupportedInstrument {
                identity: raw.trim().to_string(),
            })?;
        log::debug!("Connected to {}", model);

        let builder = SignalAnalyzerBuilder::new(channel).model(model);
        let builder = if discover_modes {
            builder.discovery(InstrumentCatalog)
        } else {
            builder
        };
        Ok(builder.build()?)
    }

    /// Serial ports present on this machine, for `ASRL` resources.
    pub fn available_serial_ports() -> Result<Vec<String>, ConnectorError> {
        let ports = serialport::available_ports().map_err(TransportError::from)?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackTransport;
    use crate::mode::ModeId;

    #[test]
    fn test_parse_tcpip_socket() {
        assert_eq!(
            "TCPIP0::192.168.1.20::5025::SOCKET".parse::<Resource>().unwrap(),
            Resource::Tcp {
                host: "192.168.1.20".to_string(),
                port: 5025
            }
        );
        assert_eq!(
            "TCPIP::pxa.lab::SOCKET".parse::<Resource>().unwrap(),
            Resource::Tcp {
                host: "pxa.lab".to_string(),
                port: DEFAULT_SCPI_PORT
            }
        );
    }

    #[test]
    fn test_parse_host_port_and_serial() {
        assert_eq!(
            "10.0.0.5:5025".parse::<Resource>().unwrap(),
            Resource::Tcp {
                host: "10.0.0.5".to_string(),
                port: 5025
            }
        );
        assert_eq!(
            "ASRL/dev/ttyUSB0::INSTR".parse::<Resource>().unwrap(),
            Resource::Serial {
                path: "/dev/ttyUSB0".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for resource in [
            "",
            "pxa.lab",
            "TCPIP0::host::INSTR",
            "TCPIP0::host::notaport::SOCKET",
            "ASRL::INSTR",
            ":5025",
        ] {
            assert!(
                matches!(
                    resource.parse::<Resource>(),
                    Err(ConnectorError::InvalidResource { .. })
                ),
                "{resource:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resource_display_round_trips() {
        let resource = Resource::Tcp {
            host: "pxa.lab".to_string(),
            port: 5025,
        };
        assert_eq!(resource.to_string().parse::<Resource>().unwrap(), resource);
    }

    #[test]
    fn test_attach_identifies_model() {
        let loopback = LoopbackTransport::new();
        loopback.stub("*IDN?", "Agilent Technologies,N9020A,MY1234,A.14.16");

        let analyzer = Connector::attach(Box::new(loopback.clone()), false).unwrap();

        assert_eq!(analyzer.model(), Some(InstrumentModel::Mxa));
        assert_eq!(analyzer.modes().len(), ModeId::ALL.len());
        assert_eq!(loopback.traffic(), vec!["*IDN?"]);
    }

    #[test]
    fn test_attach_with_catalog_discovery() {
        let loopback = LoopbackTransport::new();
        loopback
            .stub("*IDN?", "Keysight Technologies,N9010A,MY1,A.20.01")
            .stub("INST:CAT?", "\"SA 1,PNOISE 14\"");

        let analyzer = Connector::attach(Box::new(loopback), true).unwrap();

        assert!(analyzer.modes().contains(&ModeId::SpectrumAnalyzer));
        assert!(!analyzer.modes().contains(&ModeId::Wcdma));
    }

    #[test]
    fn test_attach_rejects_unknown_instrument() {
        let loopback = LoopbackTransport::new();
        loopback.stub("*IDN?", "Rigol,DSA815,DSA1,00.01.19");

        match Connector::attach(Box::new(loopback), false) {
            Err(ConnectorError::UnsupportedInstrument { identity }) => {
                assert_eq!(identity, "Rigol,DSA815,DSA1,00.01.19");
            }
            other => panic!("expected UnsupportedInstrument, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_connect_rejects_bad_resource_before_io() {
        let settings = ConnectionSettings::new("GPIB0::18::INSTR");
        assert!(matches!(
            Connector::connect(&settings),
            Err(ConnectorError::InvalidResource { .. })
        ));
    }
}
