use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use covtrim_rs::types::DownsampleConfig;
use covtrim_rs::{downsample_fastq, fastq};

/// Coverage-based downsampling of FASTQ files from amplicon sequencing data
#[derive(Parser, Debug)]
#[command(name = "covtrim-rs", version, about)]
struct Args {
    /// Input FASTQ file for downsampling (plain or .gz)
    #[arg(short = 'i', long = "input")]
    input_fastq: PathBuf,

    /// Output directory for downsampled files and reports
    #[arg(short = 'o', long = "output")]
    output_dir: PathBuf,

    /// Target sequencing coverage (X) for downsampling
    #[arg(short = 't', long = "target-coverage")]
    target_coverage: f64,

    /// Size of target genome in base pairs
    #[arg(short = 'g', long = "genome-size", default_value_t = DownsampleConfig::DEFAULT_GENOME_SIZE)]
    genome_size: u64,

    /// Size of individual amplicons in base pairs
    #[arg(short = 'a', long = "amplicon-size", default_value_t = DownsampleConfig::DEFAULT_AMPLICON_SIZE)]
    amplicon_size: u64,

    /// Random seed for reproducible downsampling
    #[arg(short = 's', long = "seed", default_value_t = DownsampleConfig::DEFAULT_SEED)]
    seed: u64,
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    bar.set_message(msg.to_string());
    bar
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = DownsampleConfig {
        target_coverage: args.target_coverage,
        genome_size: args.genome_size,
        amplicon_size: args.amplicon_size,
        seed: args.seed,
    };

    let stem = args
        .input_fastq
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reads".to_string());
    let output_fastq = args
        .output_dir
        .join(format!("{stem}_{}X.fastq", args.target_coverage));
    let output_report = args
        .output_dir
        .join(format!("{stem}_{}X_report.md", args.target_coverage));

    // 1. Index + coverage analysis + reproducible selection
    let bar = spinner("blue", &format!("Analyzing {}...", args.input_fastq.display()));
    let results = downsample_fastq(&args.input_fastq, &config)?;
    bar.finish_with_message(format!(
        "{} reads, {} bases, {:.2}X current coverage",
        results.stats.total_reads, results.stats.total_bases, results.stats.current_coverage
    ));

    if results.kept_all_reads() {
        eprintln!(
            "Warning: requested coverage {}X exceeds available coverage {:.2}X. Using all available reads.",
            results.stats.target_coverage, results.stats.current_coverage
        );
    }

    // 2. Second pass: write the selected reads
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let bar = spinner("green", &format!("Writing sampled reads to {}...", output_fastq.display()));
    let written = fastq::write_selected_reads(&args.input_fastq, &output_fastq, results.selected_ids())?;
    bar.finish_with_message(format!("Wrote {written} reads to {}", output_fastq.display()));

    // 3. Markdown report
    let bar = spinner("yellow", "Writing analysis report...");
    fs::write(&output_report, results.get_report())
        .with_context(|| format!("Could not write {}", output_report.display()))?;
    bar.finish_with_message(format!("Report written to {}", output_report.display()));

    Ok(())
}
