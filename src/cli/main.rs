#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use csv::Writer;
use serde::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use netsimplex::transport::{wasserstein_1d, Graph};

/// Earth mover's distance between two histograms, solved by network simplex.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file with the columns `left` and `right`, one histogram bin per row
    #[arg(short, long)]
    input: PathBuf,

    /// Write the transport plan as `from,to,flow` rows to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct Bin {
    left: u64,
    right: u64,
}

#[derive(Clone, Debug, Serialize)]
struct PlanRow {
    from: usize,
    to: usize,
    flow: usize,
}

// Read both histograms from a CSV file
fn read_histograms_csv(path: &Path) -> Result<(Vec<u64>, Vec<u64>), Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(File::open(path)?);
    let bins: Vec<Bin> = rdr.deserialize().collect::<Result<_, _>>()?;
    Ok(bins.into_iter().map(|b| (b.left, b.right)).unzip())
}

// Write the edges carrying flow, with bins of the right histogram numbered from zero
fn write_plan_csv(graph: &Graph, num_left: usize, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    for edge in graph.edges.iter().filter(|e| e.flow > 0) {
        wtr.serialize(PlanRow {
            from: edge.left,
            to: edge.right - num_left,
            flow: edge.flow,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    TermLogger::init(
        args.log_level.into(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let (left, right) = read_histograms_csv(&args.input)?;
    log::info!("read {} bins from {}", left.len(), args.input.display());

    let (distance, graph) = wasserstein_1d(&left, &right).map_err(|e| e.to_string())?;
    println!("{distance}");

    if let Some(output) = &args.output {
        write_plan_csv(&graph, left.len(), output)?;
        log::info!("transport plan written to {}", output.display());
    }

    Ok(())
}
