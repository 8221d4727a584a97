use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use photolab_core::consts::DEFAULT_CSV_DELIMITER;
use photolab_core::csv::write_csv;
use photolab_core::raw::{Bias, Channel, ImageStatistics, NormRoi};
use photolab_core::template::render_from_dir;
use photolab_core::validators::{vchannels, vfile, vflopath, vfloat01, FloatOrPath};
use serde::Serialize;

/// Region of interest in normalized [0..1] coordinates.
#[derive(Args)]
pub struct RoiArgs {
    /// ROI origin X (centered when omitted)
    #[arg(long, value_parser = vfloat01)]
    pub roi_x0: Option<f64>,

    /// ROI origin Y (centered when omitted)
    #[arg(long, value_parser = vfloat01)]
    pub roi_y0: Option<f64>,

    /// ROI width
    #[arg(long, value_parser = vfloat01, default_value = "1.0")]
    pub roi_width: f64,

    /// ROI height
    #[arg(long, value_parser = vfloat01, default_value = "1.0")]
    pub roi_height: f64,
}

impl RoiArgs {
    pub fn to_norm_roi(&self) -> NormRoi {
        NormRoi {
            x0: self.roi_x0,
            y0: self.roi_y0,
            width: self.roi_width,
            height: self.roi_height,
        }
    }
}

#[derive(Args)]
pub struct StatsArgs {
    /// Input FITS or camera RAW file
    #[arg(value_parser = vfile)]
    pub file: PathBuf,

    #[command(flatten)]
    pub roi: RoiArgs,

    /// Comma-separated channel list (e.g. R,G,B or Gr,Gb)
    #[arg(long)]
    pub channels: Option<String>,

    /// Bias: a constant level, a fraction, or a master bias frame path
    #[arg(long, value_parser = vflopath)]
    pub bias: Option<FloatOrPath>,

    /// Also compute the per-channel median (slower)
    #[arg(long)]
    pub median: bool,

    /// Export the statistics to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Render the statistics through a template file
    #[arg(long, value_parser = vfile)]
    pub template: Option<PathBuf>,
}

/// One output row, also the template context item.
#[derive(Serialize)]
pub struct ChannelRow {
    pub image: String,
    pub channel: String,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
    pub median: Option<f64>,
}

pub fn parse_channels(raw: Option<&str>) -> Result<Option<Vec<Channel>>> {
    Ok(raw.map(vchannels).transpose()?)
}

pub fn bias_from(arg: Option<&FloatOrPath>) -> Bias {
    match arg {
        None => Bias::Embedded,
        Some(FloatOrPath::Value(level)) => Bias::Level(*level),
        Some(FloatOrPath::Path(path)) => Bias::Frame(path.clone()),
    }
}

pub fn run(args: &StatsArgs) -> Result<()> {
    let channels = parse_channels(args.channels.as_deref())?;
    let mut stats = ImageStatistics::new(
        &args.file,
        args.roi.to_norm_roi(),
        channels,
        bias_from(args.bias.as_ref()),
    )?;

    let image = stats.name()?;
    let channels: Vec<String> = stats
        .loader()
        .channels()
        .iter()
        .map(|ch| ch.to_string())
        .collect();
    let mean = stats.mean()?.to_vec();
    let variance = stats.variance()?.to_vec();
    let stddev = stats.std()?;
    let median = if args.median {
        Some(stats.median()?.to_vec())
    } else {
        None
    };

    let rows: Vec<ChannelRow> = channels
        .iter()
        .enumerate()
        .map(|(i, channel)| ChannelRow {
            image: image.clone(),
            channel: channel.clone(),
            mean: mean[i],
            variance: variance[i],
            stddev: stddev[i],
            median: median.as_ref().map(|m| m[i]),
        })
        .collect();

    print_rows(&rows);
    if let Some(path) = &args.csv {
        export_csv(path, &rows)?;
    }
    if let Some(template) = &args.template {
        render(template, &rows)?;
    }
    Ok(())
}

pub fn print_rows(rows: &[ChannelRow]) {
    for row in rows {
        let mut line = format!(
            "{} [{}] mean {:.2}, variance {:.2}, stddev {:.2}",
            row.image, row.channel, row.mean, row.variance, row.stddev
        );
        if let Some(median) = row.median {
            line.push_str(&format!(", median {median:.2}"));
        }
        println!("{line}");
    }
}

pub fn export_csv(path: &PathBuf, rows: &[ChannelRow]) -> Result<()> {
    let header = ["image", "channel", "mean", "variance", "stddev", "median"];
    let records = rows.iter().map(|row| {
        let mut record: HashMap<String, String> = HashMap::new();
        record.insert("image".into(), row.image.clone());
        record.insert("channel".into(), row.channel.clone());
        record.insert("mean".into(), row.mean.to_string());
        record.insert("variance".into(), row.variance.to_string());
        record.insert("stddev".into(), row.stddev.to_string());
        if let Some(median) = row.median {
            record.insert("median".into(), median.to_string());
        }
        record
    });
    write_csv(path, &header, records, DEFAULT_CSV_DELIMITER)?;
    Ok(())
}

pub fn render(template: &PathBuf, rows: &[ChannelRow]) -> Result<()> {
    let dir = template
        .parent()
        .ok_or_else(|| anyhow!("template path has no parent directory"))?;
    let name = template
        .file_name()
        .ok_or_else(|| anyhow!("template path has no file name"))?
        .to_string_lossy();
    let context = HashMap::from([("rows", rows)]);
    let text = render_from_dir(dir, &name, context)?;
    println!("{text}");
    Ok(())
}
