use crate::output::STAT_COLUMNS;
use crate::resources::ResourceDelta;
use crate::table::Table;
use ansi_term::Color;
use group_stats::Summary;
use std::fmt;
use std::io::{self, Write};

/// How many rows to show from each end of a long table
const EDGE_ROWS: usize = 5;

/// Writes an aligned rendering of a table, with a row-index column on the
/// left.  Long tables are cut down to their first and last few rows.
pub fn render<W: Write>(
    out: W,
    columns: &[&str],
    n_rows: usize,
    row: impl Fn(usize) -> Vec<String>,
) -> io::Result<()> {
    let mut out = tabwriter::TabWriter::new(out).padding(2);
    for col in columns {
        write!(out, "\t{}", col)?;
    }
    writeln!(out)?;
    let write_row = |out: &mut tabwriter::TabWriter<W>, idx: usize| -> io::Result<()> {
        write!(out, "{}", idx)?;
        for cell in row(idx) {
            write!(out, "\t{}", cell)?;
        }
        writeln!(out)
    };
    if n_rows <= 2 * EDGE_ROWS {
        for idx in 0..n_rows {
            write_row(&mut out, idx)?;
        }
    } else {
        for idx in 0..EDGE_ROWS {
            write_row(&mut out, idx)?;
        }
        write!(out, "...")?;
        for _ in columns {
            write!(out, "\t...")?;
        }
        writeln!(out)?;
        for idx in n_rows - EDGE_ROWS..n_rows {
            write_row(&mut out, idx)?;
        }
    }
    writeln!(out, "\n[{} rows x {} columns]", n_rows, columns.len())?;
    out.flush()
}

pub fn render_table<W: Write>(out: W, table: &Table) -> io::Result<()> {
    let columns = table.columns.iter().map(|x| x.as_str()).collect::<Vec<_>>();
    render(out, &columns, table.len(), |idx| {
        table.rows[idx]
            .iter()
            .map(|x| x.clone().unwrap_or_else(|| "NaN".into()))
            .collect()
    })
}

pub fn render_summaries<W: Write>(out: W, key_column: &str, xs: &[Summary]) -> io::Result<()> {
    let [mean, var, std_dev] = STAT_COLUMNS;
    let columns = [key_column, mean, var, std_dev];
    render(out, &columns, xs.len(), |idx| {
        let x = &xs[idx];
        vec![
            x.key.clone(),
            PrettyFloat(x.stats.mean).to_string(),
            PrettyFloat(x.stats.var).to_string(),
            PrettyFloat(x.stats.std_dev).to_string(),
        ]
    })
}

/// Shortest round-trip form, always with a decimal point (or "NaN").
pub struct PrettyFloat(pub f64);
impl fmt::Display for PrettyFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("NaN")
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

pub fn print_delta<W: Write>(mut out: W, delta: &ResourceDelta) -> io::Result<()> {
    for (name, x) in [
        ("CPU", delta.cpu_percent),
        ("RAM", delta.ram_percent),
        ("Disk", delta.disk_percent),
    ] {
        writeln!(out, "{} Usage: {} %", name, PrettyDelta(x))?;
    }
    Ok(())
}

/// Increases in red, decreases in green
struct PrettyDelta(f64);
impl fmt::Display for PrettyDelta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = format!("{:+.2}", self.0);
        if self.0 > 0. {
            write!(f, "{}", Color::Red.paint(s))
        } else if self.0 < 0. {
            write!(f, "{}", Color::Green.paint(s))
        } else {
            f.write_str(&s)
        }
    }
}
