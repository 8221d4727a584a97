//! Async client for TESS-family photometers.
//!
//! A photometer streams readings over serial, TCP or UDP. The transport
//! timestamps and decodes each payload and pushes `Reading` records into
//! a bounded queue for the consumer to drain.

pub mod builder;
pub mod payload;
pub mod transport;

use std::fmt;
use std::str::FromStr;

pub use builder::{Photometer, PhotometerBuilder};
pub use payload::{PayloadDecoder, Reading};
pub use transport::Transport;

use crate::config;
use crate::consts::{DEFAULT_SERIAL_BAUDRATE, DEFAULT_TCP_PORT, DEFAULT_UDP_PORT};
use crate::error::{PhotolabError, Result};

/// Place of a photometer on the calibration bench.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Ref,
    Test,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Ref => "REF.",
            Role::Test => "TEST",
        }
    }

    pub fn other(&self) -> Role {
        match self {
            Role::Ref => Role::Test,
            Role::Test => Role::Ref,
        }
    }

    pub fn endpoint_var(&self) -> &'static str {
        match self {
            Role::Ref => "REF_ENDPOINT",
            Role::Test => "TEST_ENDPOINT",
        }
    }

    /// Endpoint configured for this role in the environment.
    pub fn endpoint(&self) -> Result<Endpoint> {
        config::var(self.endpoint_var())?.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ref" | "ref." => Ok(Role::Ref),
            "test" => Ok(Role::Test),
            other => Err(PhotolabError::InvalidValue(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Photometer hardware model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    TessW,
    TessP,
    Tas,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Model::TessW => "TESS-W",
            Model::TessP => "TESS-P",
            Model::Tas => "TAS",
        };
        f.write_str(name)
    }
}

impl FromStr for Model {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TESS-W" | "TESSW" => Ok(Model::TessW),
            "TESS-P" | "TESSP" => Ok(Model::TessP),
            "TAS" => Ok(Model::Tas),
            other => Err(PhotolabError::InvalidValue(format!(
                "unknown photometer model: {other}"
            ))),
        }
    }
}

/// Where a photometer is reachable, parsed from a `kind:name:number` URL
/// such as `serial:/dev/ttyUSB0:9600`, `tcp:192.168.4.1:23` or `udp::2255`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Serial { port: String, baudrate: u32 },
    Tcp { host: String, port: u16 },
    Udp { port: u16 },
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Serial { port, baudrate } => write!(f, "serial:{port}:{baudrate}"),
            Endpoint::Tcp { host, port } => write!(f, "tcp:{host}:{port}"),
            Endpoint::Udp { port } => write!(f, "udp::{port}"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || PhotolabError::InvalidEndpoint(s.to_string());
        let mut parts = s.splitn(3, ':');
        let kind = parts.next().ok_or_else(bad)?;
        let name = parts.next().ok_or_else(bad)?;
        let number = parts.next().unwrap_or("");

        fn parse_number<T: FromStr>(raw: &str, default: T) -> Option<T> {
            if raw.is_empty() {
                Some(default)
            } else {
                raw.parse().ok()
            }
        }

        match kind {
            "serial" => {
                if name.is_empty() {
                    return Err(bad());
                }
                let baudrate = parse_number(number, DEFAULT_SERIAL_BAUDRATE).ok_or_else(bad)?;
                Ok(Endpoint::Serial {
                    port: name.to_string(),
                    baudrate,
                })
            }
            "tcp" => {
                if name.is_empty() {
                    return Err(bad());
                }
                let port = parse_number(number, DEFAULT_TCP_PORT).ok_or_else(bad)?;
                Ok(Endpoint::Tcp {
                    host: name.to_string(),
                    port,
                })
            }
            "udp" => {
                let port = parse_number(number, DEFAULT_UDP_PORT).ok_or_else(bad)?;
                Ok(Endpoint::Udp { port })
            }
            _ => Err(bad()),
        }
    }
}
