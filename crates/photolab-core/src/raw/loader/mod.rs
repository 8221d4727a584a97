pub mod exif;
pub mod factory;
pub mod fits;
pub mod simulation;

use ndarray::{s, Array2, Array3, ArrayView2, Axis};

use crate::error::{PhotolabError, Result};
use crate::raw::channel::{BayerPattern, Channel, CHANNELS};
use crate::raw::roi::Roi;

/// Metadata shared by all loader backends. Per-plane dimensions (i.e. half
/// the mosaic dimensions for Bayer sources).
#[derive(Clone, Debug, Default)]
pub struct ImageMetadata {
    pub name: String,
    pub roi: Option<Roi>,
    pub channels: Vec<Channel>,
    /// Exposure time in seconds.
    pub exposure: Option<f64>,
    pub width: usize,
    pub height: usize,
    pub iso: Option<String>,
    pub camera: Option<String>,
    pub maker: Option<String>,
    pub datetime: Option<String>,
    /// Focal length in mm.
    pub focal_length: Option<f64>,
    pub f_number: Option<f64>,
    pub bayer_pattern: Option<BayerPattern>,
}

/// Per-plane descriptive statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneStats {
    pub mean: f64,
    pub stddev: f64,
}

/// A sensor image decoded into per-channel pixel planes.
///
/// Implementations demultiplex the mosaic (or slice an already
/// demultiplexed cube), crop to the region of interest and hand back a
/// stack of planes in the order the channels were requested.
pub trait ImageLoader {
    /// Generic metadata, lazily gathered from the file headers.
    fn metadata(&mut self) -> Result<&ImageMetadata>;

    /// The channels this loader was asked for.
    fn channels(&self) -> &[Channel];

    /// Per-plane `(height, width)`.
    fn shape(&mut self) -> Result<(usize, usize)>;

    /// Region of interest in plane coordinates.
    fn roi(&mut self) -> Result<Roi>;

    /// The Bayer layout of the underlying sensor.
    fn cfa_pattern(&mut self) -> Result<BayerPattern>;

    /// Per-requested-channel black (pedestal) levels.
    fn black_levels(&mut self) -> Result<Vec<f64>>;

    /// Per-requested-channel saturation levels.
    fn saturation_levels(&mut self) -> Result<Vec<f64>>;

    /// Load the stack of requested colour planes, ROI-cropped, shape
    /// `(channels, height, width)`.
    fn load(&mut self) -> Result<Array3<f32>>;

    /// Per-requested-channel mean and standard deviation over the ROI.
    fn statistics(&mut self) -> Result<Vec<PlaneStats>>;

    /// File name, useful for labelling output.
    fn name(&mut self) -> Result<String> {
        Ok(self.metadata()?.name.clone())
    }

    /// Exposure time in seconds, useful for sorting image lists.
    fn exposure(&mut self) -> Result<Option<f64>> {
        Ok(self.metadata()?.exposure)
    }
}

/// Split one colour plane out of a Bayer mosaic by 2x2 subsampling at the
/// pattern offsets. Returns `None` for the synthetic `G` channel.
pub fn extract_plane<T: Copy>(
    mosaic: &ArrayView2<'_, T>,
    pattern: BayerPattern,
    channel: Channel,
) -> Option<Array2<T>> {
    let (x, y) = pattern.offsets(channel)?;
    Some(mosaic.slice(s![y..;2, x..;2]).to_owned())
}

/// Split a Bayer mosaic into the four physical planes (R, Gr, Gb, B).
pub fn demux(mosaic: &ArrayView2<'_, f32>, pattern: BayerPattern) -> [Array2<f32>; 4] {
    CHANNELS.map(|ch| {
        extract_plane(mosaic, pattern, ch).expect("physical channels always have offsets")
    })
}

/// Stack the requested channels out of the four physical planes,
/// synthesizing `G` as (Gr + Gb) / 2.
pub fn select_channels(planes: &[Array2<f32>; 4], channels: &[Channel]) -> Result<Array3<f32>> {
    let dim = planes[0].dim();
    if planes.iter().any(|p| p.dim() != dim) {
        return Err(PhotolabError::InvalidDimensions(
            "colour planes differ in shape; sensor dimensions must be even".to_string(),
        ));
    }
    let (h, w) = dim;
    let mut stack = Array3::<f32>::zeros((channels.len(), h, w));
    for (i, channel) in channels.iter().enumerate() {
        let mut slot = stack.index_axis_mut(Axis(0), i);
        match channel.plane_index() {
            Some(idx) => slot.assign(&planes[idx]),
            None => slot.assign(&((&planes[1] + &planes[2]) / 2.0)),
        }
    }
    Ok(stack)
}

/// Synthesize the plane for a single channel, combining Gr and Gb for `G`.
pub(crate) fn channel_plane(planes: &[Array2<f32>; 4], channel: Channel) -> Array2<f32> {
    match channel.plane_index() {
        Some(idx) => planes[idx].clone(),
        None => (&planes[1] + &planes[2]) / 2.0,
    }
}

/// Crop a plane to the region of interest, clamping to the plane bounds.
pub(crate) fn trim_plane<T: Copy>(plane: &Array2<T>, roi: Option<&Roi>) -> Array2<T> {
    match roi {
        Some(roi) => {
            let (h, w) = plane.dim();
            let y1 = roi.y1.min(h);
            let x1 = roi.x1.min(w);
            let y0 = roi.y0.min(y1);
            let x0 = roi.x0.min(x1);
            plane.slice(s![y0..y1, x0..x1]).to_owned()
        }
        None => plane.clone(),
    }
}

/// Population mean and standard deviation of a plane.
pub(crate) fn plane_stats(plane: &ArrayView2<'_, f32>) -> PlaneStats {
    let count = plane.len().max(1) as f64;
    let mean = plane.iter().map(|&v| v as f64).sum::<f64>() / count;
    let var = plane
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    PlaneStats {
        mean,
        stddev: var.sqrt(),
    }
}

/// Reject operations that have no meaning on the synthetic `G` channel.
pub(crate) fn check_no_green(channels: &[Channel], what: &str) -> Result<()> {
    if channels.contains(&Channel::G) {
        return Err(PhotolabError::GreenChannel(what.to_string()));
    }
    Ok(())
}
