//! FITS primary-HDU image loader.
//!
//! FITS files are a sequence of 2880-byte blocks; the header holds
//! 80-character keyword cards, the data big-endian pixels typed by BITPIX.
//! Two layouts are supported: 2-D Bayer mosaics (demultiplexed via the
//! `BAYER` keyword) and 3-D cubes of already demultiplexed planes in
//! R, Gr, Gb, B order.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use memmap2::Mmap;
use ndarray::{Array2, Array3, Axis};

use crate::error::{PhotolabError, Result};
use crate::raw::channel::{BayerPattern, Channel, CHANNELS};
use crate::raw::loader::{
    channel_plane, demux, plane_stats, select_channels, trim_plane, ImageLoader, ImageMetadata,
    PlaneStats,
};
use crate::raw::roi::{NormRoi, Roi};

const FITS_BLOCK_SIZE: usize = 2880;
const FITS_CARD_SIZE: usize = 80;

/// Primary-HDU header keywords as raw strings.
struct FitsHeader {
    keywords: HashMap<String, String>,
}

impl FitsHeader {
    /// Parse header blocks up to the END card; returns the header and the
    /// data offset (block aligned).
    fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let mut keywords = HashMap::new();
        let mut offset = 0;
        let mut ended = false;
        while !ended {
            if offset + FITS_BLOCK_SIZE > data.len() {
                return Err(PhotolabError::InvalidFits(
                    "truncated header: no END card".to_string(),
                ));
            }
            let block = &data[offset..offset + FITS_BLOCK_SIZE];
            offset += FITS_BLOCK_SIZE;
            for card in block.chunks(FITS_CARD_SIZE) {
                // Cards must be ASCII so the fixed key/value columns can
                // be sliced by byte offset.
                let card = std::str::from_utf8(card)
                    .ok()
                    .filter(|card| card.is_ascii())
                    .ok_or_else(|| {
                        PhotolabError::InvalidFits("non-ASCII header card".to_string())
                    })?;
                let key = card[..8].trim();
                if key == "END" {
                    ended = true;
                    break;
                }
                if key.is_empty() || key == "COMMENT" || key == "HISTORY" {
                    continue;
                }
                if card.len() < 10 || &card[8..10] != "= " {
                    continue;
                }
                keywords.insert(key.to_string(), card_value(&card[10..]));
            }
        }
        Ok((Self { keywords }, offset))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.keywords.get(key).map(String::as_str)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_str(key)?.parse().ok()
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get_str(key)?.parse().ok()
    }

    fn require_i64(&self, key: &str) -> Result<i64> {
        self.get_i64(key)
            .ok_or_else(|| PhotolabError::InvalidFits(format!("missing {key} keyword")))
    }
}

/// Extract a card value, stripping quotes from strings and trailing
/// comments from the rest.
fn card_value(raw: &str) -> String {
    let raw = raw.trim_start();
    if let Some(rest) = raw.strip_prefix('\'') {
        match rest.find('\'') {
            Some(end) => rest[..end].trim_end().to_string(),
            None => rest.trim().to_string(),
        }
    } else {
        let value = match raw.split_once('/') {
            Some((value, _comment)) => value,
            None => raw,
        };
        value.trim().to_string()
    }
}

/// Loader for FITS sensor images.
pub struct FitsImageLoader {
    mmap: Mmap,
    channels: Vec<Channel>,
    full_image: bool,
    bitpix: i64,
    bscale: f64,
    bzero: f64,
    /// Mosaic/cube axes as (width, height, planes); planes == 1 for 2-D.
    naxes: (usize, usize, usize),
    dim: usize,
    data_offset: usize,
    shape: (usize, usize),
    roi: Roi,
    cfa: Option<BayerPattern>,
    metadata: ImageMetadata,
}

impl FitsImageLoader {
    /// Open a FITS file and parse its primary header.
    pub fn open(path: &Path, n_roi: NormRoi, channels: Option<Vec<Channel>>) -> Result<Self> {
        let channels = channels.unwrap_or_else(|| CHANNELS.to_vec());
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let (header, data_offset) = FitsHeader::parse(&mmap)?;

        let bitpix = header.require_i64("BITPIX")?;
        if ![8, 16, 32, -32, -64].contains(&bitpix) {
            return Err(PhotolabError::InvalidFits(format!(
                "unsupported BITPIX {bitpix}"
            )));
        }
        let dim = header.require_i64("NAXIS")? as usize;
        let width = header.require_i64("NAXIS1")? as usize;
        let height = header.require_i64("NAXIS2")? as usize;
        if width == 0 || height == 0 {
            return Err(PhotolabError::InvalidFits("empty image axes".to_string()));
        }

        let (planes, cfa, roi, shape) = match dim {
            2 => {
                let cfa = match header.get_str("BAYER") {
                    Some(name) => Some(name.parse::<BayerPattern>()?),
                    None => None,
                };
                let roi = Roi::from_normalized(width, height, &n_roi, false)?;
                (1, cfa, roi, (height / 2, width / 2))
            }
            3 => {
                let planes = header.require_i64("NAXIS3")? as usize;
                let roi = Roi::from_normalized(width, height, &n_roi, true)?;
                (planes, None, roi, (height, width))
            }
            other => {
                return Err(PhotolabError::InvalidFits(format!(
                    "unsupported NAXIS {other}"
                )))
            }
        };

        let pixel_count = width * height * planes;
        let data_len = pixel_count * (bitpix.unsigned_abs() as usize / 8);
        if mmap.len() < data_offset + data_len {
            return Err(PhotolabError::InvalidFits(format!(
                "file truncated: expected at least {} data bytes, got {}",
                data_len,
                mmap.len().saturating_sub(data_offset)
            )));
        }

        let metadata = ImageMetadata {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            roi: Some(roi),
            channels: channels.clone(),
            exposure: header.get_f64("EXPTIME"),
            width: shape.1,
            height: shape.0,
            iso: header.get_str("ISO").map(str::to_string),
            camera: header.get_str("CAMERA").map(str::to_string),
            maker: header.get_str("MAKER").map(str::to_string),
            datetime: header.get_str("DATE-OBS").map(str::to_string),
            focal_length: header.get_f64("FOCAL-LEN"),
            f_number: header.get_f64("F-NUMBER"),
            bayer_pattern: cfa,
        };

        Ok(Self {
            mmap,
            channels,
            full_image: n_roi.is_full(),
            bitpix,
            bscale: header.get_f64("BSCALE").unwrap_or(1.0),
            bzero: header.get_f64("BZERO").unwrap_or(0.0),
            naxes: (width, height, planes),
            dim,
            data_offset,
            shape,
            roi,
            cfa,
            metadata,
        })
    }

    /// Decode the data unit into physical values (BSCALE/BZERO applied).
    fn read_values(&self) -> Vec<f32> {
        let (width, height, planes) = self.naxes;
        let count = width * height * planes;
        let bytes = &self.mmap[self.data_offset..];
        let raw = |i: usize| -> f64 {
            match self.bitpix {
                8 => bytes[i] as f64,
                16 => BigEndian::read_i16(&bytes[2 * i..]) as f64,
                32 => BigEndian::read_i32(&bytes[4 * i..]) as f64,
                -32 => BigEndian::read_f32(&bytes[4 * i..]) as f64,
                _ => BigEndian::read_f64(&bytes[8 * i..]),
            }
        };
        (0..count)
            .map(|i| (self.bscale * raw(i) + self.bzero) as f32)
            .collect()
    }

    /// The four physical planes, mosaic-demultiplexed or cube-sliced,
    /// not yet trimmed.
    fn physical_planes(&self) -> Result<[Array2<f32>; 4]> {
        let (width, height, planes) = self.naxes;
        let values = self.read_values();
        if self.dim == 2 {
            let cfa = self.require_cfa()?;
            let mosaic = Array2::from_shape_vec((height, width), values)
                .map_err(|e| PhotolabError::InvalidDimensions(e.to_string()))?;
            Ok(demux(&mosaic.view(), cfa))
        } else {
            if planes != CHANNELS.len() {
                return Err(PhotolabError::InvalidFits(format!(
                    "expected a {}-plane cube (R, Gr, Gb, B), got {planes}",
                    CHANNELS.len()
                )));
            }
            let cube = Array3::from_shape_vec((planes, height, width), values)
                .map_err(|e| PhotolabError::InvalidDimensions(e.to_string()))?;
            Ok([0, 1, 2, 3].map(|i| cube.index_axis(Axis(0), i).to_owned()))
        }
    }

    fn require_cfa(&self) -> Result<BayerPattern> {
        self.cfa.ok_or_else(|| {
            PhotolabError::UnsupportedCfa("2-D FITS image without a BAYER keyword".to_string())
        })
    }

    fn trim_roi(&self) -> Option<&Roi> {
        (!self.full_image).then_some(&self.roi)
    }
}

impl ImageLoader for FitsImageLoader {
    fn metadata(&mut self) -> Result<&ImageMetadata> {
        Ok(&self.metadata)
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn shape(&mut self) -> Result<(usize, usize)> {
        Ok(self.shape)
    }

    fn roi(&mut self) -> Result<Roi> {
        Ok(self.roi)
    }

    fn cfa_pattern(&mut self) -> Result<BayerPattern> {
        self.require_cfa()
    }

    fn black_levels(&mut self) -> Result<Vec<f64>> {
        Err(PhotolabError::Unsupported(
            "black levels are not recorded in FITS headers".to_string(),
        ))
    }

    fn saturation_levels(&mut self) -> Result<Vec<f64>> {
        Err(PhotolabError::Unsupported(
            "saturation levels are not recorded in FITS headers".to_string(),
        ))
    }

    fn load(&mut self) -> Result<Array3<f32>> {
        let planes = self.physical_planes()?;
        let planes = planes.map(|p| trim_plane(&p, self.trim_roi()));
        select_channels(&planes, &self.channels)
    }

    fn statistics(&mut self) -> Result<Vec<PlaneStats>> {
        let planes = self.physical_planes()?;
        Ok(self
            .channels
            .iter()
            .map(|&ch| {
                let plane = trim_plane(&channel_plane(&planes, ch), self.trim_roi());
                plane_stats(&plane.view())
            })
            .collect())
    }
}
