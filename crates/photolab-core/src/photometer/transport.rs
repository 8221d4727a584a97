//! Async readers for the photometer endpoints.
//!
//! Each transport loops on its medium, timestamps every payload on
//! arrival, decodes it and pushes the reading into the bounded queue.
//! Dropping the receiving end stops the loop.

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::mpsc;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::consts::UDP_BUFFER_SIZE;
use crate::error::Result;
use crate::photometer::payload::{PayloadDecoder, Reading};
use crate::photometer::Endpoint;

/// Reading source bound to one endpoint.
pub struct Transport {
    endpoint: Endpoint,
    decoder: PayloadDecoder,
}

impl Transport {
    pub fn new(endpoint: Endpoint, decoder: PayloadDecoder) -> Self {
        Self { endpoint, decoder }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Stream readings into `tx` until the medium closes or the receiver
    /// is dropped. Meant to run as a task.
    pub async fn readings(&self, tx: mpsc::Sender<Reading>) -> Result<()> {
        info!("streaming readings from {}", self.endpoint);
        match &self.endpoint {
            Endpoint::Serial { port, baudrate } => self.serial_readings(port, *baudrate, tx).await,
            Endpoint::Tcp { host, port } => self.tcp_readings(host, *port, tx).await,
            Endpoint::Udp { port } => self.udp_readings(*port, tx).await,
        }
    }

    async fn serial_readings(
        &self,
        port: &str,
        baudrate: u32,
        tx: mpsc::Sender<Reading>,
    ) -> Result<()> {
        let stream = tokio_serial::new(port, baudrate).open_native_async()?;
        let mut lines = BufReader::new(stream).lines();
        let mut seq = 0;
        while let Some(line) = lines.next_line().await? {
            if !self.dispatch(&line, &mut seq, &tx).await {
                break;
            }
        }
        Ok(())
    }

    async fn tcp_readings(&self, host: &str, port: u16, tx: mpsc::Sender<Reading>) -> Result<()> {
        let stream = TcpStream::connect((host, port)).await?;
        let mut lines = BufReader::new(stream).lines();
        let mut seq = 0;
        while let Some(line) = lines.next_line().await? {
            if !self.dispatch(&line, &mut seq, &tx).await {
                break;
            }
        }
        Ok(())
    }

    async fn udp_readings(&self, port: u16, tx: mpsc::Sender<Reading>) -> Result<()> {
        let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
        let mut buf = [0u8; UDP_BUFFER_SIZE];
        let mut seq = 0;
        loop {
            let (len, _addr) = socket.recv_from(&mut buf).await?;
            let payload = String::from_utf8_lossy(&buf[..len]);
            if !self.dispatch(payload.trim_end(), &mut seq, &tx).await {
                return Ok(());
            }
        }
    }

    /// Timestamp, decode and enqueue one payload. Returns false when the
    /// receiver is gone.
    async fn dispatch(&self, payload: &str, seq: &mut u64, tx: &mpsc::Sender<Reading>) -> bool {
        let now = Utc::now();
        match self.decoder.decode(payload, now) {
            Some(mut reading) => {
                *seq += 1;
                reading.seq = Some(*seq);
                debug!("reading #{seq}: freq {} Hz", reading.freq);
                if tx.send(reading).await.is_err() {
                    info!("receiver gone, stopping {}", self.endpoint);
                    return false;
                }
            }
            None => warn!("discarding undecodable payload: {payload}"),
        }
        true
    }
}
