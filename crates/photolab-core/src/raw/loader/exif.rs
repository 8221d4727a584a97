//! Camera RAW loader (DNG, CR2 and friends).
//!
//! Pixel data, the CFA layout and the per-channel black/white levels come
//! from the RAW decoder; exposure and the rest of the shooting metadata
//! come from the EXIF tags.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{In, Tag, Value};
use ndarray::{Array2, Array3};
use tracing::warn;

use crate::error::{PhotolabError, Result};
use crate::raw::channel::{BayerPattern, Channel, CHANNELS};
use crate::raw::loader::{
    channel_plane, check_no_green, demux, plane_stats, select_channels, trim_plane, ImageLoader,
    ImageMetadata, PlaneStats,
};
use crate::raw::roi::{NormRoi, Roi};

/// Loader for Bayer-mosaic camera RAW files.
pub struct RawImageLoader {
    path: PathBuf,
    n_roi: NormRoi,
    channels: Vec<Channel>,
    full_image: bool,
    probed: bool,
    metadata: ImageMetadata,
    cfa: Option<BayerPattern>,
    /// Black levels in channel order (R, Gr, Gb, B).
    biases: Option<[f64; 4]>,
    /// Saturation levels in channel order (R, Gr, Gb, B).
    white_levels: Option<[f64; 4]>,
    shape: (usize, usize),
    roi: Option<Roi>,
}

impl RawImageLoader {
    pub fn new(path: &Path, n_roi: NormRoi, channels: Option<Vec<Channel>>) -> Self {
        let channels = channels.unwrap_or_else(|| CHANNELS.to_vec());
        Self {
            path: path.to_path_buf(),
            n_roi,
            channels: channels.clone(),
            full_image: n_roi.is_full(),
            probed: false,
            metadata: ImageMetadata {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                channels,
                ..ImageMetadata::default()
            },
            cfa: None,
            biases: None,
            white_levels: None,
            shape: (0, 0),
            roi: None,
        }
    }

    /// Decode the RAW container, caching metadata on first use.
    fn decode(&mut self) -> Result<rawloader::RawImage> {
        let img = rawloader::decode_file(&self.path)
            .map_err(|e| PhotolabError::RawDecode(e.to_string()))?;
        if img.cpp != 1 {
            return Err(PhotolabError::UnsupportedCfa(format!(
                "{} components per pixel, expected a Bayer mosaic",
                img.cpp
            )));
        }
        if !self.probed {
            self.probe(&img)?;
        }
        Ok(img)
    }

    fn probe(&mut self, img: &rawloader::RawImage) -> Result<()> {
        self.cfa = Some(cfa_pattern_of(img)?);
        // Decoder levels arrive in RGBE component order.
        self.biases = Some(remap_levels(&img.blacklevels));
        self.white_levels = Some(remap_levels(&img.whitelevels));

        let (width, height) = (img.width, img.height);
        self.roi = Some(Roi::from_normalized(width, height, &self.n_roi, false)?);
        self.shape = (height / 2, width / 2);

        self.metadata.roi = self.roi;
        self.metadata.width = self.shape.1;
        self.metadata.height = self.shape.0;
        self.metadata.bayer_pattern = self.cfa;
        self.metadata.camera = Some(img.clean_model.clone());
        self.metadata.maker = Some(img.clean_make.clone());

        match self.read_exif() {
            Ok(()) => {}
            Err(e) => warn!("no EXIF metadata in {}: {e}", self.path.display()),
        }
        self.probed = true;
        Ok(())
    }

    fn read_exif(&mut self) -> Result<()> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let data = exif::Reader::new().read_from_container(&mut reader)?;

        let rational = |tag: Tag| -> Option<f64> {
            match &data.get_field(tag, In::PRIMARY)?.value {
                Value::Rational(v) => v.first().map(|r| r.to_f64()),
                Value::SRational(v) => v.first().map(|r| r.to_f64()),
                _ => None,
            }
        };
        let text = |tag: Tag| -> Option<String> {
            data.get_field(tag, In::PRIMARY)
                .map(|f| f.display_value().to_string().trim().to_string())
        };

        self.metadata.exposure = rational(Tag::ExposureTime);
        self.metadata.focal_length = rational(Tag::FocalLength);
        self.metadata.f_number = rational(Tag::FNumber);
        self.metadata.iso = text(Tag::PhotographicSensitivity);
        self.metadata.datetime = text(Tag::DateTime);
        if let Some(camera) = text(Tag::Model) {
            self.metadata.camera = Some(camera);
        }
        if let Some(maker) = text(Tag::Make) {
            self.metadata.maker = Some(maker);
        }
        Ok(())
    }

    fn ensure_probed(&mut self) -> Result<()> {
        if !self.probed {
            self.decode()?;
        }
        Ok(())
    }

    fn trim_roi(&self) -> Option<&Roi> {
        if self.full_image {
            None
        } else {
            self.roi.as_ref()
        }
    }

    /// The four physical planes, demultiplexed but not yet trimmed.
    fn physical_planes(&mut self) -> Result<[Array2<f32>; 4]> {
        let img = self.decode()?;
        let (h, w) = (img.height, img.width);
        let values: Vec<f32> = match img.data {
            rawloader::RawImageData::Integer(data) => {
                data.into_iter().map(|v| v as f32).collect()
            }
            rawloader::RawImageData::Float(data) => data,
        };
        let mosaic = Array2::from_shape_vec((h, w), values)
            .map_err(|e| PhotolabError::InvalidDimensions(e.to_string()))?;
        let cfa = self.cfa.expect("probed by decode");
        Ok(demux(&mosaic.view(), cfa))
    }

    /// Black levels for all four physical planes in channel order.
    pub(crate) fn black_levels_all(&mut self) -> Result<[f64; 4]> {
        self.ensure_probed()?;
        Ok(self.biases.expect("probed"))
    }

    fn pick_levels(&self, table: [f64; 4], what: &str) -> Result<Vec<f64>> {
        check_no_green(&self.channels, what)?;
        let mut out = Vec::with_capacity(self.channels.len());
        for ch in &self.channels {
            let idx = ch
                .plane_index()
                .ok_or_else(|| PhotolabError::GreenChannel(what.to_string()))?;
            out.push(table[idx]);
        }
        Ok(out)
    }
}

impl ImageLoader for RawImageLoader {
    fn metadata(&mut self) -> Result<&ImageMetadata> {
        self.ensure_probed()?;
        Ok(&self.metadata)
    }

    fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn shape(&mut self) -> Result<(usize, usize)> {
        self.ensure_probed()?;
        Ok(self.shape)
    }

    fn roi(&mut self) -> Result<Roi> {
        self.ensure_probed()?;
        Ok(self.roi.expect("probed"))
    }

    fn cfa_pattern(&mut self) -> Result<BayerPattern> {
        self.ensure_probed()?;
        Ok(self.cfa.expect("probed"))
    }

    fn black_levels(&mut self) -> Result<Vec<f64>> {
        self.ensure_probed()?;
        let table = self.biases.expect("probed");
        self.pick_levels(table, "black levels")
    }

    fn saturation_levels(&mut self) -> Result<Vec<f64>> {
        self.ensure_probed()?;
        let table = self.white_levels.expect("probed");
        self.pick_levels(table, "saturation levels")
    }

    fn load(&mut self) -> Result<Array3<f32>> {
        let planes = self.physical_planes()?;
        let planes = planes.map(|p| trim_plane(&p, self.trim_roi()));
        select_channels(&planes, &self.channels)
    }

    fn statistics(&mut self) -> Result<Vec<PlaneStats>> {
        let planes = self.physical_planes()?;
        let channels = self.channels.clone();
        Ok(channels
            .iter()
            .map(|&ch| {
                let plane = trim_plane(&channel_plane(&planes, ch), self.trim_roi());
                plane_stats(&plane.view())
            })
            .collect())
    }
}

/// Derive the Bayer layout from the decoder's CFA description.
fn cfa_pattern_of(img: &rawloader::RawImage) -> Result<BayerPattern> {
    let mut name = String::with_capacity(4);
    for row in 0..2 {
        for col in 0..2 {
            name.push(match img.cfa.color_at(row, col) {
                0 => 'R',
                1 | 3 => 'G',
                2 => 'B',
                other => {
                    return Err(PhotolabError::UnsupportedCfa(format!(
                        "CFA color index {other}"
                    )))
                }
            });
        }
    }
    name.parse()
}

/// RGBE component order to channel order (R, Gr, Gb, B); the second green
/// component is the fourth entry.
fn remap_levels(levels: &[u16; 4]) -> [f64; 4] {
    [
        levels[0] as f64,
        levels[1] as f64,
        levels[3] as f64,
        levels[2] as f64,
    ]
}
