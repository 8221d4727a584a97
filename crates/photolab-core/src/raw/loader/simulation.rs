//! Synthetic dark frames for exercising analysis pipelines without a
//! camera on the bench.

use std::path::Path;

use ndarray::{Array2, Array3};
use rand_distr::{Distribution, Normal};

use crate::error::{PhotolabError, Result};
use crate::raw::channel::{BayerPattern, Channel};
use crate::raw::loader::exif::RawImageLoader;
use crate::raw::loader::{
    check_no_green, plane_stats, select_channels, trim_plane, ImageLoader, ImageMetadata,
    PlaneStats,
};
use crate::raw::roi::{NormRoi, Roi};

/// Dark-frame simulator.
///
/// Takes shape, exposure and black levels from a real RAW file and
/// replaces its pixels with `bias + dark_current * exposure +
/// read_noise * N(0, 1)`, quantised to u16.
pub struct SimulatedDarkLoader {
    inner: RawImageLoader,
    dark_current: f64,
    read_noise: f64,
}

impl SimulatedDarkLoader {
    pub fn new(
        path: &Path,
        n_roi: NormRoi,
        channels: Option<Vec<Channel>>,
        dark_current: f64,
        read_noise: f64,
    ) -> Self {
        Self {
            inner: RawImageLoader::new(path, n_roi, channels),
            dark_current,
            read_noise,
        }
    }

    /// Generate the four physical planes, untrimmed.
    fn simulated_planes(&mut self) -> Result<[Array2<f32>; 4]> {
        let shape = self.inner.shape()?;
        let biases = {
            // All four physical planes regardless of the selection.
            let exposure = self.inner.exposure()?.unwrap_or(0.0);
            let levels = self.inner.black_levels_all()?;
            levels.map(|level| level + self.dark_current * exposure)
        };
        let noise = Normal::new(0.0, 1.0)
            .map_err(|e| PhotolabError::InvalidValue(e.to_string()))?;
        let mut rng = rand::thread_rng();
        let read_noise = self.read_noise;
        Ok(biases.map(|pedestal| {
            Array2::from_shape_simple_fn(shape, || {
                let value = pedestal + read_noise * noise.sample(&mut rng);
                value.clamp(0.0, u16::MAX as f64) as u16 as f32
            })
        }))
    }
}

impl ImageLoader for SimulatedDarkLoader {
    fn metadata(&mut self) -> Result<&ImageMetadata> {
        self.inner.metadata()
    }

    fn channels(&self) -> &[Channel] {
        self.inner.channels()
    }

    fn shape(&mut self) -> Result<(usize, usize)> {
        self.inner.shape()
    }

    fn roi(&mut self) -> Result<Roi> {
        self.inner.roi()
    }

    fn cfa_pattern(&mut self) -> Result<BayerPattern> {
        self.inner.cfa_pattern()
    }

    fn black_levels(&mut self) -> Result<Vec<f64>> {
        self.inner.black_levels()
    }

    fn saturation_levels(&mut self) -> Result<Vec<f64>> {
        self.inner.saturation_levels()
    }

    fn load(&mut self) -> Result<Array3<f32>> {
        check_no_green(self.channels(), "simulated dark frames")?;
        let roi = self.inner.roi()?;
        let planes = self.simulated_planes()?;
        let planes = planes.map(|p| trim_plane(&p, Some(&roi)));
        select_channels(&planes, self.inner.channels())
    }

    fn statistics(&mut self) -> Result<Vec<PlaneStats>> {
        check_no_green(self.channels(), "simulated dark frames")?;
        let roi = self.inner.roi()?;
        let planes = self.simulated_planes()?;
        let channels = self.inner.channels().to_vec();
        Ok(channels
            .iter()
            .map(|&ch| {
                let idx = ch.plane_index().expect("no synthetic G here");
                let plane = trim_plane(&planes[idx], Some(&roi));
                plane_stats(&plane.view())
            })
            .collect())
    }
}
