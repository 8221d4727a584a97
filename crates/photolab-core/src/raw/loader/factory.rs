//! Loader construction from file extensions.

use std::path::Path;

use crate::consts::{FITS_EXTENSIONS, RAW_EXTENSIONS};
use crate::error::{PhotolabError, Result};
use crate::raw::channel::Channel;
use crate::raw::loader::exif::RawImageLoader;
use crate::raw::loader::fits::FitsImageLoader;
use crate::raw::loader::simulation::SimulatedDarkLoader;
use crate::raw::loader::ImageLoader;
use crate::raw::roi::NormRoi;

fn extension_of(path: &Path) -> Result<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .ok_or_else(|| PhotolabError::UnsupportedExtension(path.display().to_string()))
}

/// Build the loader matching the file extension.
pub fn image_from(
    path: &Path,
    n_roi: NormRoi,
    channels: Option<Vec<Channel>>,
) -> Result<Box<dyn ImageLoader>> {
    let ext = extension_of(path)?;
    if FITS_EXTENSIONS.contains(&ext.as_str()) {
        Ok(Box::new(FitsImageLoader::open(path, n_roi, channels)?))
    } else if RAW_EXTENSIONS.contains(&ext.as_str()) {
        Ok(Box::new(RawImageLoader::new(path, n_roi, channels)))
    } else {
        Err(PhotolabError::UnsupportedExtension(ext))
    }
}

/// Build a dark-frame simulator backed by a camera RAW file.
///
/// `dark_current` is in counts per second, `read_noise` in counts.
pub fn simulated_dark_from(
    path: &Path,
    n_roi: NormRoi,
    channels: Option<Vec<Channel>>,
    dark_current: f64,
    read_noise: f64,
) -> Result<Box<dyn ImageLoader>> {
    let ext = extension_of(path)?;
    if !RAW_EXTENSIONS.contains(&ext.as_str()) {
        return Err(PhotolabError::UnsupportedExtension(ext));
    }
    Ok(Box::new(SimulatedDarkLoader::new(
        path,
        n_roi,
        channels,
        dark_current,
        read_noise,
    )))
}
