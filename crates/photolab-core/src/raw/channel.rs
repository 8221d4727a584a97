use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhotolabError;

/// A sensor color plane.
///
/// `R`, `Gr`, `Gb` and `B` are the four physical Bayer planes; `G` is the
/// synthetic plane (Gr + Gb) / 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    R,
    Gr,
    Gb,
    B,
    G,
}

/// The four physical planes, in stacking order.
pub const CHANNELS: [Channel; 4] = [Channel::R, Channel::Gr, Channel::Gb, Channel::B];

impl Channel {
    /// Human-readable plane label.
    pub fn label(self) -> &'static str {
        match self {
            Channel::R => "Red",
            Channel::Gr => "Green r",
            Channel::Gb => "Green b",
            Channel::B => "Blue",
            Channel::G => "Green",
        }
    }

    /// Index of this channel in the physical plane stack, `None` for the
    /// synthetic `G` plane.
    pub fn plane_index(self) -> Option<usize> {
        match self {
            Channel::R => Some(0),
            Channel::Gr => Some(1),
            Channel::Gb => Some(2),
            Channel::B => Some(3),
            Channel::G => None,
        }
    }

    /// Sort rank so that R < Gr < Gb < G < B.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Channel::R => 0,
            Channel::Gr => 1,
            Channel::Gb => 2,
            Channel::G => 3,
            Channel::B => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::R => "R",
            Channel::Gr => "Gr",
            Channel::Gb => "Gb",
            Channel::B => "B",
            Channel::G => "G",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Channel {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" => Ok(Channel::R),
            "Gr" => Ok(Channel::Gr),
            "Gb" => Ok(Channel::Gb),
            "B" => Ok(Channel::B),
            "G" => Ok(Channel::G),
            other => Err(PhotolabError::InvalidChannels(format!(
                "unknown channel {other:?}"
            ))),
        }
    }
}

/// Bayer mosaic layout, named by the 2x2 cell read left-to-right,
/// top-to-bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum BayerPattern {
    RGGB,
    BGGR,
    GRBG,
    GBRG,
}

impl BayerPattern {
    /// `(x, y)` offset of a physical channel within the 2x2 Bayer cell.
    ///
    /// The plane for a channel at offset `(x, y)` is `mosaic[y..;2, x..;2]`.
    /// Returns `None` for the synthetic `G` channel.
    pub fn offsets(self, channel: Channel) -> Option<(usize, usize)> {
        use BayerPattern::*;
        use Channel::*;
        match (self, channel) {
            (RGGB, R) => Some((0, 0)),
            (RGGB, Gr) => Some((1, 0)),
            (RGGB, Gb) => Some((0, 1)),
            (RGGB, B) => Some((1, 1)),
            (BGGR, R) => Some((1, 1)),
            (BGGR, Gr) => Some((1, 0)),
            (BGGR, Gb) => Some((0, 1)),
            (BGGR, B) => Some((0, 0)),
            (GRBG, R) => Some((1, 0)),
            (GRBG, Gr) => Some((0, 0)),
            (GRBG, Gb) => Some((1, 1)),
            (GRBG, B) => Some((0, 1)),
            (GBRG, R) => Some((0, 1)),
            (GBRG, Gr) => Some((0, 0)),
            (GBRG, Gb) => Some((1, 1)),
            (GBRG, B) => Some((1, 0)),
            (_, G) => None,
        }
    }
}

impl fmt::Display for BayerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BayerPattern::RGGB => "RGGB",
            BayerPattern::BGGR => "BGGR",
            BayerPattern::GRBG => "GRBG",
            BayerPattern::GBRG => "GBRG",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BayerPattern {
    type Err = PhotolabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RGGB" => Ok(BayerPattern::RGGB),
            "BGGR" => Ok(BayerPattern::BGGR),
            "GRBG" => Ok(BayerPattern::GRBG),
            "GBRG" => Ok(BayerPattern::GBRG),
            other => Err(PhotolabError::UnsupportedCfa(other.to_string())),
        }
    }
}
