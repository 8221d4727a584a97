//! Value parsers for command line interfaces.
//!
//! Each function takes the raw argument string and either returns the
//! parsed value or a [`PhotolabError`], so they plug directly into clap's
//! `value_parser`.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{PhotolabError, Result};
use crate::raw::channel::Channel;

/// Existing-file validator.
pub fn vfile(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if !path.is_file() {
        return Err(PhotolabError::InvalidValue(format!(
            "not a valid or existing file: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Existing-directory validator.
pub fn vdir(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if !path.is_dir() {
        return Err(PhotolabError::InvalidValue(format!(
            "not a valid or existing directory: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Boolean text validator accepting the literals `True` and `False`.
pub fn vbool(s: &str) -> Result<bool> {
    match s {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(PhotolabError::InvalidValue(format!(
            "not a boolean literal: {other:?}"
        ))),
    }
}

/// Date & time validator accepting `%Y-%m`, `%Y-%m-%d`,
/// `%Y-%m-%dT%H:%M:%S` and `%Y-%m-%dT%H:%M:%SZ`.
pub fn vdate(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    vmonth(s)
}

/// Year-month validator (`%Y-%m`), resolving to the first of the month.
pub fn vmonth(s: &str) -> Result<NaiveDateTime> {
    let first_day = format!("{s}-01");
    NaiveDate::parse_from_str(&first_day, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| PhotolabError::InvalidValue(format!("not a valid date: {s:?}")))
}

/// Float validator that also admits fractions such as `1/240`.
pub fn vfloat(s: &str) -> Result<f64> {
    parse_fraction(s)
        .ok_or_else(|| PhotolabError::InvalidValue(format!("not a number or fraction: {s:?}")))
}

/// Float validator restricted to [0..1], admitting fractions.
pub fn vfloat01(s: &str) -> Result<f64> {
    let value = vfloat(s)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(PhotolabError::InvalidValue(format!(
            "value {value} out of bounds [0..1]"
        )));
    }
    Ok(value)
}

/// Either a number or an existing file path (e.g. a bias level or a bias
/// frame).
#[derive(Clone, Debug, PartialEq)]
pub enum FloatOrPath {
    Value(f64),
    Path(PathBuf),
}

/// Validator admitting a single number or a file representing an image.
pub fn vflopath(s: &str) -> Result<FloatOrPath> {
    if let Some(value) = parse_fraction(s) {
        return Ok(FloatOrPath::Value(value));
    }
    vfile(s).map(FloatOrPath::Path)
}

/// Channel-combination validator for a comma-separated list.
///
/// Channels are sorted so that R < Gr < Gb < G < B; the synthetic `G`
/// cannot be combined with `Gr` or `Gb`, and 1 to 4 distinct channels are
/// accepted.
pub fn vchannels(s: &str) -> Result<Vec<Channel>> {
    let mut channels = s
        .split(',')
        .map(|token| token.parse::<Channel>())
        .collect::<Result<Vec<Channel>>>()?;
    channels.sort_by_key(|ch| ch.rank());
    channels.dedup();
    if channels.is_empty() || channels.len() > 4 {
        return Err(PhotolabError::InvalidChannels(format!(
            "expected 1 to 4 channels, got {s:?}"
        )));
    }
    let has_g = channels.contains(&Channel::G);
    let has_split_green =
        channels.contains(&Channel::Gr) || channels.contains(&Channel::Gb);
    if has_g && has_split_green {
        return Err(PhotolabError::InvalidChannels(format!(
            "G cannot be combined with Gr or Gb: {s:?}"
        )));
    }
    Ok(channels)
}

fn parse_fraction(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        Some(num / den)
    } else {
        s.parse().ok()
    }
}
