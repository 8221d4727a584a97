//! Photometer assembly and role/model/endpoint validation.

use tokio::sync::mpsc;

use crate::consts::READING_QUEUE_SIZE;
use crate::error::{PhotolabError, Result};
use crate::photometer::payload::{PayloadDecoder, Reading};
use crate::photometer::transport::Transport;
use crate::photometer::{Endpoint, Model, Role};

/// An assembled photometer client. Obtain one from [`PhotometerBuilder`].
pub struct Photometer {
    role: Role,
    model: Model,
    transport: Transport,
    tx: mpsc::Sender<Reading>,
}

impl Photometer {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn label(&self) -> &'static str {
        self.role.label()
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Stream readings into the queue handed out at build time. Meant to
    /// run as a task; ends when the receiver is dropped.
    pub async fn readings(&self) -> Result<()> {
        self.transport.readings(self.tx.clone()).await
    }
}

/// Validates the role/model/transport combination and wires the matching
/// payload decoder:
///
/// * the reference photometer is a TESS-W on a serial port speaking the
///   legacy payload format;
/// * a test photometer on serial is a TESS-P or TAS speaking JSON;
/// * a test photometer on TCP or UDP is a TESS-W speaking JSON.
#[derive(Default)]
pub struct PhotometerBuilder;

impl PhotometerBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build from the endpoint configured in the role's environment
    /// variable.
    pub fn build(&self, model: Model, role: Role) -> Result<(Photometer, mpsc::Receiver<Reading>)> {
        let endpoint = role.endpoint()?;
        self.build_with_endpoint(model, role, endpoint)
    }

    pub fn build_with_endpoint(
        &self,
        model: Model,
        role: Role,
        endpoint: Endpoint,
    ) -> Result<(Photometer, mpsc::Receiver<Reading>)> {
        let decoder = match role {
            Role::Ref => {
                if model != Model::TessW {
                    return Err(PhotolabError::Config(format!(
                        "reference photometer model should be TESS-W, not {model}"
                    )));
                }
                if !matches!(endpoint, Endpoint::Serial { .. }) {
                    return Err(PhotolabError::Config(format!(
                        "reference photometer should use a serial endpoint, not {endpoint}"
                    )));
                }
                PayloadDecoder::Old
            }
            Role::Test => {
                match endpoint {
                    Endpoint::Serial { .. } => {
                        if !matches!(model, Model::TessP | Model::Tas) {
                            return Err(PhotolabError::Config(format!(
                                "test photometer on a serial port should be TESS-P or TAS, not {model}"
                            )));
                        }
                    }
                    Endpoint::Tcp { .. } | Endpoint::Udp { .. } => {
                        if model != Model::TessW {
                            return Err(PhotolabError::Config(format!(
                                "test photometer on {endpoint} should be TESS-W, not {model}"
                            )));
                        }
                    }
                }
                PayloadDecoder::Json
            }
        };
        let (tx, rx) = mpsc::channel(READING_QUEUE_SIZE);
        let photometer = Photometer {
            role,
            model,
            transport: Transport::new(endpoint, decoder),
            tx,
        };
        Ok((photometer, rx))
    }
}
