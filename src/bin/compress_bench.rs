//! Command-line front end for the codec benchmark harness
//!
//! ```bash
//! # Benchmark a file with the default catalog
//! compress-bench run input.bin
//!
//! # Five iterations, deflate-family buffer codecs only, keep best payloads
//! compress-bench run input.bin -i 5 --only deflate-mz,zlib-mz --save-best out/
//!
//! # Provider capability table
//! compress-bench probe
//!
//! # Stored runs
//! compress-bench history list
//! compress-bench history show bench_1700000000000_abc123
//! ```
//!
//! Logging follows `RUST_LOG`, e.g. `RUST_LOG=compress_bench=debug`.

use clap::{Parser, Subcommand};
use compress_bench::config::BenchmarkConfig;
use compress_bench::format::{
    format_bytes, format_percent, format_ratio, format_throughput, format_time_ms,
    format_time_range, output_file_name,
};
use compress_bench::hash::sha256_hex;
use compress_bench::history::{FileMeta, HistoryEntry, HistoryStore};
use compress_bench::provider::CodecHost;
use compress_bench::runner::{run_benchmarks, BenchmarkResult};
use compress_bench::summary::{best_per_family, best_values};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "compress-bench", version, about = "Benchmark compression codecs against a file")]
struct Cli {
    /// Directory holding saved run history
    #[arg(long, global = true, default_value = ".compress-bench/history", value_name = "DIR")]
    history_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Benchmark a file against the enabled codec catalog
    Run {
        /// File to benchmark
        file: PathBuf,

        /// Iterations per compress/decompress phase (1-100)
        #[arg(short, long, default_value_t = 3)]
        iterations: u32,

        /// Restrict the run to these algorithm ids (comma separated)
        #[arg(long, value_delimiter = ',', value_name = "ID")]
        only: Vec<String>,

        /// Disable these algorithm ids (comma separated)
        #[arg(long, value_delimiter = ',', value_name = "ID")]
        skip: Vec<String>,

        /// Write the best payload per family into this directory
        #[arg(long, value_name = "DIR")]
        save_best: Option<PathBuf>,

        /// Do not record this run in history
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },

    /// Probe provider capabilities and print the catalog
    Probe,

    /// Inspect or prune saved benchmark runs
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List stored runs, newest first
    List,
    /// Print one stored run in full
    Show { id: String },
    /// Delete one stored run
    Delete { id: String },
    /// Delete all stored runs
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let store = HistoryStore::new(&cli.history_dir);

    match cli.command {
        Command::Run {
            file,
            iterations,
            only,
            skip,
            save_best,
            no_history,
        } => run_command(&store, &file, iterations, &only, &skip, save_best, no_history).await,
        Command::Probe => probe_command().await,
        Command::History { action } => history_command(&store, action).await,
    }
}

async fn run_command(
    store: &HistoryStore,
    file: &Path,
    iterations: u32,
    only: &[String],
    skip: &[String],
    save_best: Option<PathBuf>,
    no_history: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Acquisition failures are the only errors surfaced to the user
    let raw = std::fs::read(file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("input")
        .to_string();
    let digest = sha256_hex(&raw);

    println!("File:   {} ({})", name, format_bytes(raw.len() as u64));
    println!("SHA256: {}", digest);

    let host = CodecHost::new();
    let mut config = BenchmarkConfig::detect(&host).await;
    config.iterations = iterations;
    for spec in &mut config.algorithms {
        if !only.is_empty() {
            spec.set_enabled(only.contains(&spec.id));
        }
        if skip.contains(&spec.id) {
            spec.set_enabled(false);
        }
    }

    println!(
        "Tasks:  {} ({} iterations each)\n",
        config.planned_task_count(),
        config.iterations
    );

    let meta = FileMeta {
        name,
        size: raw.len() as u64,
        content_type: "application/octet-stream".to_string(),
        digest,
    };
    let data = bytes::Bytes::from(raw);

    let results = run_benchmarks(&host, &data, &config, |done, total, label| {
        eprint!("\r\x1b[2K[{}/{}] {}", done, total, label);
        let _ = std::io::stderr().flush();
    })
    .await?;
    eprintln!();

    print_results(&results);

    if let Some(dir) = save_best {
        save_best_payloads(&dir, &meta.name, &results)?;
    }

    if !no_history {
        let id = store.save(&meta, config.iterations, &results).await?;
        println!("\nSaved to history as {}", id);
    }

    Ok(())
}

fn print_results(results: &[BenchmarkResult]) {
    if results.is_empty() {
        println!("No results (all tasks failed or nothing was enabled).");
        return;
    }

    let best = best_values(results);

    println!(
        "{:<26} {:>10} {:>8} {:>8} {:>12} {:>12} {:>11} {:>9}",
        "Algorithm", "Size", "Ratio", "Saved", "Compress", "Decompress", "Throughput", "Verified"
    );
    for r in results {
        let star = |is_best: bool| if is_best { "*" } else { "" };
        let (ratio_mark, size_mark, time_mark) = match &best {
            Some(b) => (
                star(b.is_best_ratio(r)),
                star(b.is_smallest(r)),
                star(b.is_fastest_compress(r)),
            ),
            None => ("", "", ""),
        };
        println!(
            "{:<26} {:>10} {:>8} {:>8} {:>12} {:>12} {:>11} {:>9}",
            r.algorithm,
            format!("{}{}", format_bytes(r.compressed_size), size_mark),
            format!("{}{}", format_ratio(r.compression_ratio), ratio_mark),
            format_percent(r.compression_loss_pct),
            format!("{}{}", format_time_ms(r.compress_time.avg_ms), time_mark),
            format_time_ms(r.decompress_time.avg_ms),
            format_throughput(r.throughput_compress),
            if r.verified { "yes" } else { "NO" },
        );
    }

    println!("\nBest per family:");
    for r in best_per_family(results) {
        println!(
            "  {:<14} {} ({}, {})",
            r.family.display(),
            r.algorithm,
            format_ratio(r.compression_ratio),
            format_bytes(r.compressed_size)
        );
    }
}

fn save_best_payloads(
    dir: &Path,
    original_name: &str,
    results: &[BenchmarkResult],
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    for r in best_per_family(results) {
        let file_name = output_file_name(original_name, &r.extension);
        let path = dir.join(&file_name);
        std::fs::write(&path, &r.compressed_data)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

async fn probe_command() -> Result<(), Box<dyn std::error::Error>> {
    let host = CodecHost::new();
    let config = BenchmarkConfig::detect(&host).await;

    println!(
        "{:<20} {:<22} {:<24} {:>10} {:<16}",
        "Id", "Name", "Provider", "Supported", "Levels"
    );
    for spec in &config.algorithms {
        let levels = if spec.supports_levels {
            spec.levels
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(",")
        } else {
            "-".to_string()
        };
        println!(
            "{:<20} {:<22} {:<24} {:>10} {:<16}",
            spec.id,
            spec.name,
            spec.provider.label(),
            if spec.supported { "yes" } else { "no" },
            levels
        );
    }
    Ok(())
}

async fn history_command(
    store: &HistoryStore,
    action: HistoryAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HistoryAction::List => {
            let entries = store.load().await?;
            if entries.is_empty() {
                println!("History is empty.");
                return Ok(());
            }
            println!("{:<28} {:<24} {:>10} {:>8}", "Id", "File", "Size", "Results");
            for entry in &entries {
                println!(
                    "{:<28} {:<24} {:>10} {:>8}",
                    entry.id,
                    entry.file_name,
                    format_bytes(entry.file_size),
                    entry.results.len()
                );
            }
        }
        HistoryAction::Show { id } => {
            let entries = store.load().await?;
            match entries.iter().find(|e| e.id == id) {
                Some(entry) => print_history_entry(entry),
                None => println!("No history entry with id {}", id),
            }
        }
        HistoryAction::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {}", id);
        }
        HistoryAction::Clear => {
            store.clear_all()?;
            println!("History cleared.");
        }
    }
    Ok(())
}

fn print_history_entry(entry: &HistoryEntry) {
    println!("Id:         {}", entry.id);
    println!("Timestamp:  {} ms since epoch", entry.timestamp_ms);
    println!(
        "File:       {} ({}, {})",
        entry.file_name,
        format_bytes(entry.file_size),
        entry.file_type
    );
    println!("SHA256:     {}", entry.file_digest);
    println!("Iterations: {}", entry.iterations_used);
    println!();
    println!(
        "{:<26} {:>10} {:>8} {:>24} {:>9}",
        "Algorithm", "Size", "Ratio", "Compress (min-max)", "Verified"
    );
    for r in &entry.results {
        println!(
            "{:<26} {:>10} {:>8} {:>24} {:>9}",
            r.algorithm,
            format_bytes(r.compressed_size),
            format_ratio(r.compression_ratio),
            format_time_range(r.compress_time.min_ms, r.compress_time.max_ms),
            if r.verified { "yes" } else { "NO" },
        );
    }
}
