use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photolab_core::raw::ImagePairStatistics;
use photolab_core::validators::{vfile, vflopath, FloatOrPath};

use super::stats::{bias_from, export_csv, parse_channels, print_rows, ChannelRow, RoiArgs};

#[derive(Args)]
pub struct PairArgs {
    /// First image of the pair
    #[arg(value_parser = vfile)]
    pub file_a: PathBuf,

    /// Second image of the pair, same exposure and scene
    #[arg(value_parser = vfile)]
    pub file_b: PathBuf,

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
}

pub fn run(args: &PairArgs) -> Result<()> {
    let channels = parse_channels(args.channels.as_deref())?;
    let mut stats = ImagePairStatistics::new(
        &args.file_a,
        &args.file_b,
        args.roi.to_norm_roi(),
        channels,
        bias_from(args.bias.as_ref()),
    )?;

    let (name_a, name_b) = stats.names()?;
    let image = format!("{name_a} + {name_b}");
    let channels: Vec<String> = stats.channels().iter().map(|ch| ch.to_string()).collect();
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
            median: median.as_ref().map(|v| v[i]),
        })
        .collect();

    print_rows(&rows);
    if let Some(path) = &args.csv {
        export_csv(path, &rows)?;
    }
    Ok(())
}
