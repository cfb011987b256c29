use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "atomint workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the contention benchmarks and write a throughput report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH: &str = "contention_benchmark";
const BASELINE: &str = "current";
const GROUP_PREFIX: &str = "contended_add_";
/// Column order of the report; `mutex` is the reference column.
const WORKLOADS: &[&str] = &["short", "int", "long_long", "mutex"];

/// workload -> thread count -> elements per second
type Results = BTreeMap<String, BTreeMap<usize, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH, "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    println!("\n>>> Running {BENCH}");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", BENCH]);

    // Criterion arguments go after --
    cmd.arg("--");
    cmd.arg("--save-baseline").arg(BASELINE);

    if quick {
        cmd.arg("--measurement-time").arg("0.1");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run {BENCH}"))?;
    if !status.success() {
        anyhow::bail!("{BENCH} exited with {status}");
    }

    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let results = collect_results(criterion_dir)?;
    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(report_path, render_report(&results))
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    println!("Report written to {}", report_path.display());
    Ok(())
}

fn render_report(results: &Results) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "# Contended add_and_fetch Throughput\n");

    let _ = write!(out, "| Threads |");
    for workload in WORKLOADS {
        let _ = write!(out, " {workload} (Ops/s) | vs mutex |");
    }
    let _ = writeln!(out);
    let _ = write!(out, "|---|");
    for _ in WORKLOADS {
        let _ = write!(out, "---|---|");
    }
    let _ = writeln!(out);

    let mut threads: Vec<usize> = results.values().flat_map(|m| m.keys().copied()).collect();
    threads.sort_unstable();
    threads.dedup();

    for t in threads {
        let _ = write!(out, "| {t} |");
        let mutex_ops = results
            .get("mutex")
            .and_then(|m| m.get(&t))
            .copied()
            .unwrap_or(0.0);

        for workload in WORKLOADS {
            match results.get(*workload).and_then(|m| m.get(&t)) {
                Some(ops) => {
                    let rel = if mutex_ops > 0.0 { ops / mutex_ops } else { 0.0 };
                    let _ = write!(out, " {} | **{rel:.2}x** |", format_ops(*ops));
                }
                None => {
                    let _ = write!(out, " N/A | - |");
                }
            }
        }
        let _ = writeln!(out);
    }

    out
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Reads `target/criterion/contended_add_<workload>/<threads>/<baseline>/`.
fn collect_results(dir: &Path) -> Result<Results> {
    let mut results = Results::new();

    for group in fs::read_dir(dir)?.flatten() {
        let group_name = group.file_name().to_string_lossy().into_owned();
        let Some(workload) = group_name.strip_prefix(GROUP_PREFIX) else {
            continue;
        };

        for param in fs::read_dir(group.path())?.flatten() {
            let Ok(threads) = param.file_name().to_string_lossy().parse::<usize>() else {
                continue;
            };

            let baseline_dir = param.path().join(BASELINE);
            if let Some(ops) = throughput(&baseline_dir)? {
                results
                    .entry(workload.to_owned())
                    .or_default()
                    .insert(threads, ops);
            }
        }
    }

    Ok(results)
}

/// Elements per second from a criterion baseline directory, or `None` when
/// the directory holds no estimate.
fn throughput(baseline_dir: &Path) -> Result<Option<f64>> {
    let estimates = baseline_dir.join("estimates.json");
    if !estimates.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&estimates)
        .with_context(|| format!("Failed to read {}", estimates.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    let time_ns = json
        .get("mean")
        .and_then(|m| m.get("point_estimate"))
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0);
    if time_ns <= 0.0 {
        return Ok(None);
    }

    let mut elements = 1.0;
    if let Ok(content) = fs::read_to_string(baseline_dir.join("benchmark.json")) {
        let json: serde_json::Value = serde_json::from_str(&content)?;
        if let Some(t) = json.get("throughput").and_then(|t| t.get("Elements")) {
            elements = t.as_f64().unwrap_or(1.0);
        }
    }

    Ok(Some(elements * 1e9 / time_ns))
}
