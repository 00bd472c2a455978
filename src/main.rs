use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tile_stats::input::{collect_inputs, InputError, RecordReader};
use tile_stats::stats::{summarize, AggregateConfig, Aggregator, Report, RowOrder};
use tile_stats::{GameRecord, GameSummary};

#[derive(Debug, Parser)]
#[command(name = "tile-stats", version, about = "Max-tile statistics for recorded 2048 games")]
struct Args {
    /// Result files or directories: one packed state per line, optionally followed by the move count
    #[arg(value_name = "PATH", default_value = "res.txt")]
    inputs: Vec<PathBuf>,

    /// Extension of result files when an input is a directory
    #[arg(long, default_value = "txt")]
    ext: String,

    /// Order of the per-tile table
    #[arg(long, value_enum, default_value = "desc")]
    order: Order,

    /// Tile codes to report "reached at least" counts for (comma-separated)
    #[arg(long, value_delimiter = ',', default_values_t = [11u8, 12, 13, 14, 15])]
    thresholds: Vec<u8>,

    /// Skip malformed lines instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Print every final board as it is read
    #[arg(long)]
    draw: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Suppress the progress spinner
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    /// Highest tile first
    Desc,
    /// Lowest tile first
    Asc,
}

impl From<Order> for RowOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Desc => RowOrder::Descending,
            Order::Asc => RowOrder::Ascending,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a Report,
    mean_moves: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = AggregateConfig::default()
        .with_thresholds(args.thresholds.iter().copied())
        .context("invalid --thresholds")?
        .with_order(args.order.into());

    let records = load_records(&args)?;
    let summaries = summarize(records);
    let report = Aggregator::new(config)
        .aggregate_summaries(&summaries)
        .context("no games to aggregate")?;
    let mean_moves = mean_aux(&summaries, 0);

    if args.json {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &JsonReport { report: &report, mean_moves })?;
        writeln!(out)?;
    } else {
        print_report(&report, mean_moves);
    }
    Ok(())
}

fn load_records(args: &Args) -> anyhow::Result<Vec<GameRecord>> {
    let mut files = Vec::new();
    for input in &args.inputs {
        let found = collect_inputs(input, &args.ext)
            .with_context(|| format!("resolving input {}", input.display()))?;
        files.extend(found);
    }
    log::info!("reading {} input file(s)", files.len());

    let pb = if !args.quiet && !args.json {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Records: {pos}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let mut records = Vec::new();
    let mut skipped = 0u64;
    for path in &files {
        let reader = RecordReader::open(path).with_context(|| format!("opening {}", path.display()))?;
        let before = records.len();
        for item in reader {
            match item {
                Ok(record) => {
                    if args.draw {
                        match &pb {
                            Some(pb) => pb.suspend(|| println!("{}", record.state)),
                            None => println!("{}", record.state),
                        }
                    }
                    records.push(record);
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                }
                Err(e) if args.skip_invalid && !matches!(e, InputError::Io(_)) => {
                    log::warn!("{}: skipping {}", path.display(), e);
                    skipped += 1;
                }
                Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
            }
        }
        log::debug!("{}: {} records", path.display(), records.len() - before);
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    if skipped > 0 {
        log::warn!("skipped {} malformed line(s)", skipped);
    }
    log::info!("loaded {} records", records.len());
    Ok(records)
}

fn mean_aux(summaries: &[GameSummary], idx: usize) -> Option<f64> {
    let (sum, n) = summaries
        .iter()
        .filter_map(|s| s.aux(idx))
        .fold((0u64, 0u64), |(sum, n), v| (sum.saturating_add(v), n + 1));
    if n == 0 {
        return None;
    }
    Some(sum as f64 / n as f64)
}

fn print_report(report: &Report, mean_moves: Option<f64>) {
    println!("Performance stats for {} games:", report.games());
    for row in report.rows() {
        println!(
            "Got 2^{} ({}) {} times ({:.2}%)",
            row.code, row.display_value, row.count, row.percent
        );
    }
    if !report.thresholds().is_empty() {
        println!();
    }
    for row in report.thresholds() {
        println!(
            "Reached 2^{} ({}) or better in {} games ({:.2}%)",
            row.threshold, row.display_value, row.reached, row.percent
        );
    }
    if let Some(moves) = mean_moves {
        println!("Average moves: {:.1}", moves);
    }
}
