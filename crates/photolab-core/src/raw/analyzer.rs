//! Descriptive statistics over bias-subtracted colour planes.
//!
//! `ImageStatistics` works on a single image; `ImagePairStatistics` takes
//! two frames of the same scene and estimates the variance from their
//! difference, which cancels the fixed pattern noise.

use std::path::{Path, PathBuf};

use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView2, Axis};
use rayon::slice::ParallelSliceMut;
use tracing::{info, warn};

use crate::error::{PhotolabError, Result};
use crate::raw::channel::Channel;
use crate::raw::loader::factory::image_from;
use crate::raw::loader::ImageLoader;
use crate::raw::roi::NormRoi;

/// Where the bias pedestal comes from.
#[derive(Clone, Debug, Default)]
pub enum Bias {
    /// Per-channel black levels embedded in the image file, falling back
    /// to zero when the format does not record them.
    #[default]
    Embedded,
    /// A constant level for every channel.
    Level(f64),
    /// A master bias frame, loaded with the same ROI and channels.
    Frame(PathBuf),
}

/// Mean per channel, parallel over the planes.
fn plane_means(stack: &Array3<f32>) -> Vec<f64> {
    stack
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|plane| plane.iter().map(|&v| v as f64).sum::<f64>() / plane.len().max(1) as f64)
        .collect()
}

/// Population variance per channel.
fn plane_variances(stack: &Array3<f32>) -> Vec<f64> {
    stack
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|plane| {
            let count = plane.len().max(1) as f64;
            let mean = plane.iter().map(|&v| v as f64).sum::<f64>() / count;
            plane
                .iter()
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / count
        })
        .collect()
}

fn plane_median(plane: &ArrayView2<'_, f32>) -> f64 {
    let mut values: Vec<f32> = plane.iter().copied().collect();
    values.par_sort_unstable_by(f32::total_cmp);
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
    }
}

fn plane_medians(stack: &Array3<f32>) -> Vec<f64> {
    stack
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|plane| plane_median(&plane))
        .collect()
}

/// Subtract the bias pedestal from a freshly loaded stack.
fn subtract_bias(
    stack: &mut Array3<f32>,
    bias: &Bias,
    loader: &mut dyn ImageLoader,
    n_roi: &NormRoi,
    channels: &[Channel],
) -> Result<()> {
    match bias {
        Bias::Embedded => match loader.black_levels() {
            Ok(levels) => {
                info!("bias level per channel: {levels:?}");
                for (i, level) in levels.into_iter().enumerate() {
                    let mut plane = stack.index_axis_mut(Axis(0), i);
                    plane -= level as f32;
                }
            }
            Err(e) => {
                warn!("no embedded black levels to use as bias ({e}), assuming zero");
            }
        },
        Bias::Level(level) => {
            info!("bias level for all channels: {level}");
            *stack -= *level as f32;
        }
        Bias::Frame(path) => {
            let frame = image_from(path, *n_roi, Some(channels.to_vec()))?.load()?;
            if frame.dim() != stack.dim() {
                return Err(PhotolabError::InvalidDimensions(format!(
                    "bias frame shape {:?} does not match image shape {:?}",
                    frame.dim(),
                    stack.dim()
                )));
            }
            *stack -= &frame;
        }
    }
    Ok(())
}

/// Single-image statistics, computed lazily and cached.
pub struct ImageStatistics {
    loader: Box<dyn ImageLoader>,
    n_roi: NormRoi,
    bias: Bias,
    pixels: Option<Array3<f32>>,
    mean: Option<Vec<f64>>,
    variance: Option<Vec<f64>>,
    median: Option<Vec<f64>>,
}

impl ImageStatistics {
    pub fn new(
        path: &Path,
        n_roi: NormRoi,
        channels: Option<Vec<Channel>>,
        bias: Bias,
    ) -> Result<Self> {
        Ok(Self {
            loader: image_from(path, n_roi, channels)?,
            n_roi,
            bias,
            pixels: None,
            mean: None,
            variance: None,
            median: None,
        })
    }

    /// Access to the underlying loader for extra metadata such as the
    /// exposure time.
    pub fn loader(&mut self) -> &mut dyn ImageLoader {
        self.loader.as_mut()
    }

    pub fn name(&mut self) -> Result<String> {
        self.loader.name()
    }

    /// Load the planes and subtract the bias. Called implicitly by the
    /// statistics accessors on first use.
    pub fn run(&mut self) -> Result<()> {
        let mut stack = self.loader.load()?;
        let channels = self.loader.channels().to_vec();
        subtract_bias(
            &mut stack,
            &self.bias,
            self.loader.as_mut(),
            &self.n_roi,
            &channels,
        )?;
        self.pixels = Some(stack);
        Ok(())
    }

    fn ensure_run(&mut self) -> Result<&Array3<f32>> {
        if self.pixels.is_none() {
            self.run()?;
        }
        Ok(self.pixels.as_ref().expect("just loaded"))
    }

    /// The bias-subtracted pixel stack.
    pub fn pixels(&mut self) -> Result<&Array3<f32>> {
        self.ensure_run()
    }

    pub fn mean(&mut self) -> Result<&[f64]> {
        if self.mean.is_none() {
            let means = plane_means(self.ensure_run()?);
            self.mean = Some(means);
        }
        Ok(self.mean.as_deref().expect("just computed"))
    }

    pub fn variance(&mut self) -> Result<&[f64]> {
        if self.variance.is_none() {
            let variances = plane_variances(self.ensure_run()?);
            self.variance = Some(variances);
        }
        Ok(self.variance.as_deref().expect("just computed"))
    }

    pub fn std(&mut self) -> Result<Vec<f64>> {
        Ok(self.variance()?.iter().map(|v| v.sqrt()).collect())
    }

    pub fn median(&mut self) -> Result<&[f64]> {
        if self.median.is_none() {
            let medians = plane_medians(self.ensure_run()?);
            self.median = Some(medians);
        }
        Ok(self.median.as_deref().expect("just computed"))
    }
}

/// Statistics over a pair of identical exposures.
///
/// The mean and median are taken over the average frame; the variance is
/// half the variance of the difference frame, free of fixed pattern noise.
pub struct ImagePairStatistics {
    loader_a: Box<dyn ImageLoader>,
    loader_b: Box<dyn ImageLoader>,
    n_roi: NormRoi,
    bias: Bias,
    pixels: Option<(Array3<f32>, Array3<f32>)>,
    mean: Option<Vec<f64>>,
    variance: Option<Vec<f64>>,
    median: Option<Vec<f64>>,
}

impl ImagePairStatistics {
    pub fn new(
        path_a: &Path,
        path_b: &Path,
        n_roi: NormRoi,
        channels: Option<Vec<Channel>>,
        bias: Bias,
    ) -> Result<Self> {
        Ok(Self {
            loader_a: image_from(path_a, n_roi, channels.clone())?,
            loader_b: image_from(path_b, n_roi, channels)?,
            n_roi,
            bias,
            pixels: None,
            mean: None,
            variance: None,
            median: None,
        })
    }

    pub fn names(&mut self) -> Result<(String, String)> {
        Ok((self.loader_a.name()?, self.loader_b.name()?))
    }

    pub fn channels(&self) -> &[Channel] {
        self.loader_a.channels()
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stack_a = self.loader_a.load()?;
        let mut stack_b = self.loader_b.load()?;
        if stack_a.dim() != stack_b.dim() {
            return Err(PhotolabError::InvalidDimensions(format!(
                "image pair shapes differ: {:?} vs {:?}",
                stack_a.dim(),
                stack_b.dim()
            )));
        }
        let channels = self.loader_a.channels().to_vec();
        subtract_bias(
            &mut stack_a,
            &self.bias,
            self.loader_a.as_mut(),
            &self.n_roi,
            &channels,
        )?;
        subtract_bias(
            &mut stack_b,
            &self.bias,
            self.loader_b.as_mut(),
            &self.n_roi,
            &channels,
        )?;
        self.pixels = Some((stack_a, stack_b));
        Ok(())
    }

    fn ensure_run(&mut self) -> Result<&(Array3<f32>, Array3<f32>)> {
        if self.pixels.is_none() {
            self.run()?;
        }
        Ok(self.pixels.as_ref().expect("just loaded"))
    }

    pub fn mean(&mut self) -> Result<&[f64]> {
        if self.mean.is_none() {
            let means = {
                let (a, b) = self.ensure_run()?;
                plane_means(&((a + b) / 2.0))
            };
            self.mean = Some(means);
        }
        Ok(self.mean.as_deref().expect("just computed"))
    }

    pub fn variance(&mut self) -> Result<&[f64]> {
        if self.variance.is_none() {
            let variances: Vec<f64> = {
                let (a, b) = self.ensure_run()?;
                plane_variances(&(a - b))
                    .into_iter()
                    .map(|v| v / 2.0)
                    .collect()
            };
            self.variance = Some(variances);
        }
        Ok(self.variance.as_deref().expect("just computed"))
    }

    pub fn std(&mut self) -> Result<Vec<f64>> {
        Ok(self.variance()?.iter().map(|v| v.sqrt()).collect())
    }

    pub fn median(&mut self) -> Result<&[f64]> {
        if self.median.is_none() {
            let medians = {
                let (a, b) = self.ensure_run()?;
                plane_medians(&((a + b) / 2.0))
            };
            self.median = Some(medians);
        }
        Ok(self.median.as_deref().expect("just computed"))
    }
}
