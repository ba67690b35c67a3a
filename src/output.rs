use anyhow::*;
use group_stats::Summary;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const STAT_COLUMNS: [&str; 3] = [
    "average_expression",
    "variance_expression",
    "standard_deviation",
];

/// Shortest round-trip form with a decimal point; NaN is an empty cell.
pub fn format_cell(x: f64) -> String {
    if x.is_nan() {
        String::new()
    } else {
        format!("{:?}", x)
    }
}

/// Writes one row per summary, in order, with a 0-based row index as the
/// first column.
pub fn write_summaries<W: Write>(out: W, key_column: &str, xs: &[Summary]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    let mut header = vec!["", key_column];
    header.extend(STAT_COLUMNS);
    wtr.write_record(&header)?;
    for (idx, x) in xs.iter().enumerate() {
        wtr.write_record(&[
            idx.to_string(),
            x.key.clone(),
            format_cell(x.stats.mean),
            format_cell(x.stats.var),
            format_cell(x.stats.std_dev),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_file(path: &Path, key_column: &str, xs: &[Summary]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Couldn't create {}", path.display()))?;
    write_summaries(file, key_column, xs)
        .with_context(|| format!("Couldn't write {}", path.display()))
}
