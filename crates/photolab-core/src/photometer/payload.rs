//! Reading payload decoders.
//!
//! Current firmware emits one JSON object per payload. Early TESS-W
//! units used a compact bracketed line instead, in two flavours: `<fH >`
//! carries the frequency in Hz, `<fm >` in mHz. Temperatures and the
//! zero point magnitude are transmitted as integers scaled by 100.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One photometer reading, timestamped on reception.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Reception timestamp (UTC).
    pub tstamp: DateTime<Utc>,
    /// Local sequence number assigned by the transport.
    pub seq: Option<u64>,
    /// Device name, when the payload carries one.
    pub name: Option<String>,
    /// Sensor frequency in Hz.
    pub freq: f64,
    /// Magnitude (zero point for legacy payloads).
    pub mag: Option<f64>,
    /// Ambient (box) temperature in degrees Celsius.
    pub tamb: Option<f64>,
    /// Sky temperature in degrees Celsius.
    pub tsky: Option<f64>,
}

/// JSON wire format, a subset of the fields the firmware sends.
#[derive(Debug, Deserialize)]
struct JsonReading {
    #[serde(default)]
    name: Option<String>,
    freq: f64,
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    tamb: Option<f64>,
    #[serde(default)]
    tsky: Option<f64>,
}

static HERTZ_PAYLOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<fH ([ +]?\d{4,5})><tA ([+-]\d{4})><tO ([+-]\d{4})><mZ ([+-]\d{4})>")
        .expect("valid regex")
});

static MILLIHERTZ_PAYLOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<fm ([ +]?\d{4,5})><tA ([+-]\d{4})><tO ([+-]\d{4})><mZ ([+-]\d{4})>")
        .expect("valid regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadDecoder {
    /// One JSON object per payload.
    Json,
    /// Legacy compact bracketed line.
    Old,
}

impl PayloadDecoder {
    /// Decode one payload; `None` means the payload is not a reading
    /// (banners, garbled lines) and should be discarded.
    pub fn decode(&self, payload: &str, tstamp: DateTime<Utc>) -> Option<Reading> {
        match self {
            PayloadDecoder::Json => decode_json(payload, tstamp),
            PayloadDecoder::Old => decode_old(payload, tstamp),
        }
    }
}

fn decode_json(payload: &str, tstamp: DateTime<Utc>) -> Option<Reading> {
    let wire: JsonReading = serde_json::from_str(payload.trim()).ok()?;
    Some(Reading {
        tstamp,
        seq: None,
        name: wire.name,
        freq: wire.freq,
        mag: wire.mag,
        tamb: wire.tamb,
        tsky: wire.tsky,
    })
}

fn decode_old(payload: &str, tstamp: DateTime<Utc>) -> Option<Reading> {
    let (caps, scale) = if let Some(caps) = HERTZ_PAYLOAD.captures(payload) {
        (caps, 1.0)
    } else if let Some(caps) = MILLIHERTZ_PAYLOAD.captures(payload) {
        (caps, 1000.0)
    } else {
        return None;
    };
    let number = |i: usize| -> Option<f64> { caps[i].trim().parse().ok() };
    Some(Reading {
        tstamp,
        seq: None,
        name: None,
        freq: number(1)? / scale,
        tamb: Some(number(2)? / 100.0),
        tsky: Some(number(3)? / 100.0),
        mag: Some(number(4)? / 100.0),
    })
}
