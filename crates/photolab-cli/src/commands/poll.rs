use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photolab_core::consts::DEFAULT_CSV_DELIMITER;
use photolab_core::csv::write_csv;
use photolab_core::photometer::{Model, PhotometerBuilder, Reading, Role};
use tokio::sync::mpsc;
use tracing::error;

#[derive(Args)]
pub struct PollArgs {
    /// Photometer role (ref or test); picks the endpoint from
    /// REF_ENDPOINT or TEST_ENDPOINT
    #[arg(long, default_value = "test")]
    pub role: Role,

    /// Photometer model (TESS-W, TESS-P or TAS)
    #[arg(long, default_value = "TESS-W")]
    pub model: Model,

    /// Stop after this many readings
    #[arg(long)]
    pub limit: Option<usize>,

    /// Export the readings to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: &PollArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(poll(args))
}

async fn poll(args: &PollArgs) -> Result<()> {
    let builder = PhotometerBuilder::new();
    let (photometer, mut rx) = builder.build(args.model, args.role)?;
    let label = photometer.label();
    println!("{label} photometer at {}", photometer.endpoint());

    tokio::spawn(async move {
        if let Err(e) = photometer.readings().await {
            error!("reading task failed: {e}");
        }
    });

    let readings = collect_readings(&mut rx, args.limit, label).await;
    drop(rx);

    if let Some(path) = &args.csv {
        export_csv(path, &readings)?;
    }
    Ok(())
}

/// Receive readings until the queue closes or the limit is reached. The
/// limit is checked before consuming, so a limit of zero yields nothing.
async fn collect_readings(
    rx: &mut mpsc::Receiver<Reading>,
    limit: Option<usize>,
    label: &str,
) -> Vec<Reading> {
    let mut readings: Vec<Reading> = Vec::new();
    while !limit.is_some_and(|limit| readings.len() >= limit) {
        let Some(reading) = rx.recv().await else {
            break;
        };
        print_reading(label, &reading);
        readings.push(reading);
    }
    readings
}

fn print_reading(label: &str, reading: &Reading) {
    let mut line = format!(
        "[{label}] #{} {} freq {:.3} Hz",
        reading.seq.unwrap_or(0),
        reading.tstamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        reading.freq
    );
    if let Some(mag) = reading.mag {
        line.push_str(&format!(", mag {mag:.2}"));
    }
    if let Some(tamb) = reading.tamb {
        line.push_str(&format!(", tamb {tamb:.1} C"));
    }
    if let Some(tsky) = reading.tsky {
        line.push_str(&format!(", tsky {tsky:.1} C"));
    }
    println!("{line}");
}

fn export_csv(path: &PathBuf, readings: &[Reading]) -> Result<()> {
    let header = ["tstamp", "seq", "name", "freq", "mag", "tamb", "tsky"];
    let records = readings.iter().map(|r| {
        let mut record: HashMap<String, String> = HashMap::new();
        record.insert("tstamp".into(), r.tstamp.to_rfc3339());
        if let Some(seq) = r.seq {
            record.insert("seq".into(), seq.to_string());
        }
        if let Some(name) = &r.name {
            record.insert("name".into(), name.clone());
        }
        record.insert("freq".into(), r.freq.to_string());
        if let Some(mag) = r.mag {
            record.insert("mag".into(), mag.to_string());
        }
        if let Some(tamb) = r.tamb {
            record.insert("tamb".into(), tamb.to_string());
        }
        if let Some(tsky) = r.tsky {
            record.insert("tsky".into(), tsky.to_string());
        }
        record
    });
    write_csv(path, &header, records, DEFAULT_CSV_DELIMITER)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(freq: f64) -> Reading {
        Reading {
            tstamp: Utc::now(),
            seq: None,
            name: None,
            freq,
            mag: None,
            tamb: None,
            tsky: None,
        }
    }

    #[tokio::test]
    async fn test_limit_zero_consumes_nothing() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(reading(100.0)).await.unwrap();
        let readings = collect_readings(&mut rx, Some(0), "TEST").await;
        assert!(readings.is_empty());
        // The queued reading is left for a later consumer.
        assert_eq!(rx.recv().await.unwrap().freq, 100.0);
    }

    #[tokio::test]
    async fn test_limit_stops_after_count() {
        let (tx, mut rx) = mpsc::channel(4);
        for i in 0..4 {
            tx.send(reading(i as f64)).await.unwrap();
        }
        let readings = collect_readings(&mut rx, Some(2), "TEST").await;
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].freq, 1.0);
    }

    #[tokio::test]
    async fn test_no_limit_drains_until_close() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(reading(5.0)).await.unwrap();
        drop(tx);
        let readings = collect_readings(&mut rx, None, "TEST").await;
        assert_eq!(readings.len(), 1);
    }
}
