use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PhotolabError, Result};

static POINT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+),(\d+)\)").expect("valid pattern"));

// NumPy section style [row0:row1,col0:col1]
static ROI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+):(\d+),(\d+):(\d+)\]").expect("valid pattern"));

/// A pixel coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = POINT_PATTERN
            .captures(s)
            .ok_or_else(|| PhotolabError::InvalidRoi(format!("not a point: {s:?}")))?;
        let x = parse_coord(&caps[1])?;
        let y = parse_coord(&caps[2])?;
        Ok(Self { x, y })
    }
}

/// Normalized region of interest with coordinates and dimensions in [0..1].
///
/// A `None` origin selects a window centred on the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormRoi {
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub width: f64,
    pub height: f64,
}

impl NormRoi {
    pub fn new(x0: Option<f64>, y0: Option<f64>, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// The whole image.
    pub fn full() -> Self {
        Self {
            x0: None,
            y0: None,
            width: 1.0,
            height: 1.0,
        }
    }

    /// True when the selection covers the whole image, so trimming can be
    /// skipped.
    pub fn is_full(&self) -> bool {
        self.width == 1.0 && self.height == 1.0
    }
}

impl Default for NormRoi {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for NormRoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coord = |v: Option<f64>| match v {
            Some(v) => format!("{v:.3}"),
            None => "auto".to_string(),
        };
        write!(
            f,
            "[P0=({},{}) DIM=({:.3} x {:.3})]",
            coord(self.x0),
            coord(self.y0),
            self.width,
            self.height
        )
    }
}

/// Region of interest in pixel coordinates, upper bounds exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Roi {
    /// Build from two corners in any order.
    pub fn new(x0: usize, x1: usize, y0: usize, y1: usize) -> Self {
        Self {
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
        }
    }

    /// Convert a normalized ROI into pixel coordinates for an image of the
    /// given dimensions.
    ///
    /// When `already_debayered` is false the image is a Bayer mosaic and
    /// the selection applies to each colour plane, so plane dimensions are
    /// half of the mosaic's. Without an explicit origin the window is
    /// centred. Products are truncated, which keeps the window inside the
    /// image whenever origin + extent fits in [0..1].
    pub fn from_normalized(
        width: usize,
        height: usize,
        n_roi: &NormRoi,
        already_debayered: bool,
    ) -> Result<Self> {
        for (label, value) in [("width", n_roi.width), ("height", n_roi.height)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PhotolabError::InvalidRoi(format!(
                    "normalized {label}(={value}) outside [0,1]"
                )));
            }
        }
        if let Some(x0) = n_roi.x0 {
            if x0 + n_roi.width > 1.0 {
                return Err(PhotolabError::InvalidRoi(format!(
                    "normalized x0(={}) + width(={}) = {} exceeds 1.0",
                    x0,
                    n_roi.width,
                    x0 + n_roi.width
                )));
            }
        }
        if let Some(y0) = n_roi.y0 {
            if y0 + n_roi.height > 1.0 {
                return Err(PhotolabError::InvalidRoi(format!(
                    "normalized y0(={}) + height(={}) = {} exceeds 1.0",
                    y0,
                    n_roi.height,
                    y0 + n_roi.height
                )));
            }
        }
        let (width, height) = if already_debayered {
            (width, height)
        } else {
            (width / 2, height / 2)
        };
        let w = (width as f64 * n_roi.width) as usize;
        let h = (height as f64 * n_roi.height) as usize;
        let x0 = match n_roi.x0 {
            Some(x0) => (width as f64 * x0) as usize,
            None => (width - w) / 2,
        };
        let y0 = match n_roi.y0 {
            Some(y0) => (height as f64 * y0) as usize,
            None => (height - h) / 2,
        };
        Ok(Self::new(x0, x0 + w, y0, y0 + h))
    }

    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Lower-left corner, useful when displaying rectangles in plots.
    pub fn xy(&self) -> (usize, usize) {
        (self.x0, self.y0)
    }
}

impl Add<Point> for Roi {
    type Output = Roi;

    fn add(self, point: Point) -> Roi {
        Roi {
            x0: self.x0 + point.x,
            x1: self.x1 + point.x,
            y0: self.y0 + point.y,
            y1: self.y1 + point.y,
        }
    }
}

impl fmt::Display for Roi {
    /// NumPy section notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{},{}:{}]", self.y0, self.y1, self.x0, self.x1)
    }
}

impl FromStr for Roi {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = ROI_PATTERN
            .captures(s)
            .ok_or_else(|| PhotolabError::InvalidRoi(format!("not a NumPy section: {s:?}")))?;
        let y0 = parse_coord(&caps[1])?;
        let y1 = parse_coord(&caps[2])?;
        let x0 = parse_coord(&caps[3])?;
        let x1 = parse_coord(&caps[4])?;
        Ok(Self::new(x0, x1, y0, y1))
    }
}

fn parse_coord(digits: &str) -> Result<usize> {
    digits
        .parse()
        .map_err(|_| PhotolabError::InvalidRoi(format!("coordinate out of range: {digits}")))
}
