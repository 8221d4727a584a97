use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::Style;
use photolab_core::raw::{image_from, NormRoi};
use photolab_core::validators::vfile;

#[derive(Args)]
pub struct InfoArgs {
    /// Input FITS or camera RAW file
    #[arg(value_parser = vfile)]
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut loader = image_from(&args.file, NormRoi::full(), None)?;
    let meta = loader.metadata()?.clone();

    let label = Style::new().dim();
    let value = Style::new().bold();
    let mut line = |name: &str, text: String| {
        println!("{:<14}{}", label.apply_to(name), value.apply_to(text));
    };

    line("File", meta.name);
    line("Dimensions", format!("{}x{} per plane", meta.width, meta.height));
    if let Some(roi) = meta.roi {
        line("ROI", roi.to_string());
    }
    line(
        "Channels",
        meta.channels
            .iter()
            .map(|ch| ch.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(pattern) = meta.bayer_pattern {
        line("Bayer", pattern.to_string());
    }
    if let Some(exposure) = meta.exposure {
        line("Exposure", format!("{exposure} s"));
    }
    if let Some(iso) = meta.iso {
        line("ISO", iso);
    }
    if let Some(maker) = meta.maker {
        line("Maker", maker);
    }
    if let Some(camera) = meta.camera {
        line("Camera", camera);
    }
    if let Some(datetime) = meta.datetime {
        line("Date", datetime);
    }
    if let Some(focal) = meta.focal_length {
        line("Focal length", format!("{focal} mm"));
    }
    if let Some(f_number) = meta.f_number {
        line("Aperture", format!("f/{f_number}"));
    }

    Ok(())
}
