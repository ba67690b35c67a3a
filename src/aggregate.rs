use crate::pretty;
use crate::resources::{ResourceDelta, ResourceSample, Sampler};
use crate::table::Table;
use anyhow::*;
use group_stats::{group_stats, Observer, Summary};
use log::*;
use std::fmt;

/// Cells which count as "no value" rather than "not a number".  These are
/// the markers pandas treats as missing by default.
const MISSING: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Interprets a value cell.  Missing cells are `None`; anything which isn't a
/// number becomes NaN, so it poisons its own group and no other.
pub fn parse_value(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if MISSING.contains(&cell) {
        return None;
    }
    Some(cell.parse().unwrap_or(f64::NAN))
}

/// Groups `table` by `key_column` and summarizes `value_column` for each
/// group, in first-seen order.  `observer` runs alongside.
pub fn aggregate<O>(
    table: &Table,
    key_column: &str,
    value_column: &str,
    observer: &mut O,
) -> Result<Vec<Summary>>
where
    O: Observer,
    O::Error: Into<Error>,
{
    let find = |name: &str| {
        table.column(name).ok_or_else(|| MissingColumn {
            column: name.to_string(),
            available: table.columns.clone(),
        })
    };
    let key_col = find(key_column)?;
    let value_col = find(value_column)?;

    let mut keyless = 0;
    let rows = table.cells(key_col).zip(table.cells(value_col)).filter_map(|(key, value)| {
        match key.filter(|x| !x.is_empty()) {
            Some(key) => Some((key, parse_value(value))),
            None => {
                keyless += 1;
                None
            }
        }
    });
    let summaries = group_stats(rows, observer).map_err(Into::into)?;
    if keyless > 0 {
        warn!("Ignored {} rows with no {}", keyless, key_column);
    }
    info!("Computed statistics for {} groups", summaries.len());
    Ok(summaries)
}

#[derive(Debug, Clone)]
pub struct MissingColumn {
    pub column: String,
    pub available: Vec<String>,
}
impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "No column named \"{}\" (found: {})",
            self.column,
            self.available.join(", ")
        )
    }
}
impl std::error::Error for MissingColumn {}

/// Samples system resources either side of the aggregation and reports the
/// difference, with a progress line for each group in between.
pub struct ResourceObserver {
    sampler: Sampler,
    before: Option<ResourceSample>,
}
impl ResourceObserver {
    pub fn new(sampler: Sampler) -> ResourceObserver {
        ResourceObserver {
            sampler,
            before: None,
        }
    }
}
impl Observer for ResourceObserver {
    type Error = Error;

    fn on_start(&mut self) -> Result<()> {
        self.before = Some(self.sampler.sample()?);
        Ok(())
    }
    fn on_group(&mut self, idx: usize, summary: &Summary) -> Result<()> {
        eprintln!("{}: {}", idx + 1, summary.key);
        Ok(())
    }
    fn on_finish(&mut self) -> Result<()> {
        let after = self.sampler.sample()?;
        let before = self
            .before
            .take()
            .ok_or_else(|| anyhow!("Finished aggregating without starting"))?;
        let delta = ResourceDelta::between(before, after);
        pretty::print_delta(std::io::stderr(), &delta)?;
        Ok(())
    }
}
