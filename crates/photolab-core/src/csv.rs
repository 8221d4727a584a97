use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;

/// Write a sequence of column-keyed rows to a delimited file.
///
/// Columns are emitted in `header` order; a row missing a column yields an
/// empty field.
pub fn write_csv<P, I>(path: P, header: &[&str], rows: I, delimiter: u8) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = HashMap<String, String>>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path.as_ref())?;
    writer.write_record(header)?;
    for row in rows {
        let record: Vec<&str> = header
            .iter()
            .map(|col| row.get(*col).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a delimited file into column-keyed rows, using the first line as
/// the header.
pub fn read_csv<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path.as_ref())?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}
