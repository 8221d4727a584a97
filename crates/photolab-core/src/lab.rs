//! Optical bench constants and reference photodiode datasheets.

use std::fmt;
use std::str::FromStr;

use crate::error::{PhotolabError, Result};

/// First wavelength of a bench scan, in nm.
pub const BENCH_WAVE_START: u32 = 350;

/// Last wavelength of a bench scan, in nm. The monochromator control
/// program cannot reach the 1050 nm data point, hence 1049.
pub const BENCH_WAVE_END: u32 = 1049;

/// Column names of calibration tables exchanged as CSV.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationColumn {
    Wavelength,
    Responsivity,
    QuantumEfficiency,
    Transmission,
}

impl CalibrationColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationColumn::Wavelength => "Wavelength",
            CalibrationColumn::Responsivity => "Responsivity",
            CalibrationColumn::QuantumEfficiency => "QE",
            CalibrationColumn::Transmission => "Transmission",
        }
    }
}

impl fmt::Display for CalibrationColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference photodiode datasheet summary. Dark currents in pA,
/// photosensitive size in mm, responsivity in A/W.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Photodiode {
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub serial: &'static str,
    pub window: &'static str,
    /// Photosensitive diameter in mm.
    pub size_mm: f64,
    /// Photosensitive area in mm^2.
    pub area_mm2: f64,
    /// Typical dark current in pA.
    pub dark_typ_pa: f64,
    /// Maximum dark current in pA.
    pub dark_max_pa: f64,
    /// Responsivity peak wavelength in nm.
    pub peak_wave_nm: f64,
    /// Responsivity at the peak in A/W.
    pub peak_resp: f64,
}

pub const HAMAMATSU_S2281_01: Photodiode = Photodiode {
    manufacturer: "Hamamatsu",
    model: "S2281-01",
    serial: "01097",
    window: "Quartz Glass",
    size_mm: 11.3,
    area_mm2: 100.0,
    dark_typ_pa: 50.0,
    dark_max_pa: 500.0,
    peak_wave_nm: 960.0,
    peak_resp: 0.5,
};

pub const OSI_PIN_10D: Photodiode = Photodiode {
    manufacturer: "OSI",
    model: "PIN-10D",
    serial: "OSI-11-01-004-10D",
    window: "Quartz Glass",
    size_mm: 11.28,
    area_mm2: 100.0,
    dark_typ_pa: 2000.0,
    dark_max_pa: 25000.0,
    peak_wave_nm: 970.0,
    peak_resp: 0.6,
};

/// Reference photodiode selection by model name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotodiodeModel {
    Hamamatsu,
    Osi,
}

impl PhotodiodeModel {
    pub fn datasheet(&self) -> &'static Photodiode {
        match self {
            PhotodiodeModel::Hamamatsu => &HAMAMATSU_S2281_01,
            PhotodiodeModel::Osi => &OSI_PIN_10D,
        }
    }
}

impl fmt::Display for PhotodiodeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.datasheet().model)
    }
}

impl FromStr for PhotodiodeModel {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "S2281-01" | "HAMAMATSU" => Ok(PhotodiodeModel::Hamamatsu),
            "PIN-10D" | "OSI" => Ok(PhotodiodeModel::Osi),
            other => Err(PhotolabError::InvalidValue(format!(
                "unknown photodiode model: {other}"
            ))),
        }
    }
}
