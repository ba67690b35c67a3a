mod aggregate;
mod load;
mod output;
mod pretty;
mod resources;
mod table;

use anyhow::{Context, Error, Result};
use bpaf::Bpaf;
use group_stats::{Observer, Summary};
use log::*;
use std::path::PathBuf;
use std::time::Instant;

/// Per-key mean, variance and standard deviation over a directory of
/// tab-separated tables
#[derive(Bpaf, Clone, Debug)]
#[bpaf(options)]
pub struct Options {
    /// Directory to search (recursively) for input tables
    #[bpaf(short, long, argument("DIR"), fallback(PathBuf::from("miRNA Files")))]
    input: PathBuf,
    /// Where to write the per-key statistics
    #[bpaf(short, long, argument("FILE"), fallback(PathBuf::from("miRNA_output.txt")))]
    output: PathBuf,
    /// The column to group rows by
    #[bpaf(long, argument("NAME"), fallback("miRNA_ID".to_string()), display_fallback)]
    key_column: String,
    /// The numeric column to summarize
    #[bpaf(
        long,
        argument("NAME"),
        fallback("reads_per_million_miRNA_mapped".to_string()),
        display_fallback
    )]
    value_column: String,
    /// Report disk usage for the filesystem holding this path
    #[bpaf(long, argument("PATH"), fallback(PathBuf::from("/")))]
    disk_path: PathBuf,
}

fn main() {
    env_logger::init();
    let opts = options().run();
    if let Err(e) = run(&opts) {
        // Ignore EPIPE
        if let Some(e) = e.downcast_ref::<std::io::Error>() {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                return;
            }
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1)
    }
}

/// load -> aggregate -> write, timed as a whole
pub fn run(opts: &Options) -> Result<()> {
    let start = Instant::now();
    let sampler = resources::Sampler::new(&opts.disk_path)?;
    info!("Sampling disk usage of {}", sampler.disk_path().display());
    let mut observer = aggregate::ResourceObserver::new(sampler);
    let summaries = pipeline(opts, &mut observer)?;
    pretty::render_summaries(std::io::stdout(), &opts.key_column, &summaries)?;
    println!("Analysis time: {}", format_elapsed(start));
    Ok(())
}

/// Does the actual work, with `observer` attached to the aggregation step.
pub fn pipeline<O>(opts: &Options, observer: &mut O) -> Result<Vec<Summary>>
where
    O: Observer,
    O::Error: Into<Error>,
{
    let table = load::load(&opts.input)
        .with_context(|| format!("Couldn't load tables from {}", opts.input.display()))?;
    pretty::render_table(std::io::stdout(), &table)?;
    let summaries = aggregate::aggregate(&table, &opts.key_column, &opts.value_column, observer)?;
    drop(table);
    output::write_file(&opts.output, &opts.key_column, &summaries)?;
    info!("Wrote {} rows to {}", summaries.len(), opts.output.display());
    Ok(summaries)
}

fn format_elapsed(start: Instant) -> humantime::FormattedDuration {
    let elapsed = start.elapsed();
    // Nobody needs to know about the nanoseconds
    let elapsed = std::time::Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(elapsed)
}
