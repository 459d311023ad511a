// src/lib.rs
pub mod coverage;
pub mod error;
pub mod fastq;
pub mod report;
pub mod sample;
pub mod types;

use std::path::Path;

use ahash::AHashSet;

use crate::error::Error;
use crate::fastq::index_fastq;
use crate::sample::{analyze_and_sample, Selection};
use crate::types::{DownsampleConfig, SamplingStats};

/// A struct to hold one downsampling run's results. Only structured data is
/// stored; report text is generated on demand.
#[derive(Debug)]
pub struct DownsampleResults {
    /// The sampled rows plus the deduplicated id set for the filter pass.
    pub selection: Selection,

    /// The write-once statistics record consumed by the report.
    pub stats: SamplingStats,
}

impl DownsampleResults {
    /// Generate the Markdown analysis report on demand.
    pub fn get_report(&self) -> String {
        report::render_markdown(&self.stats)
    }

    /// The distinct identifiers to keep in the second pass.
    pub fn selected_ids(&self) -> &AHashSet<String> {
        &self.selection.ids
    }

    /// True when the run kept every read because the requested coverage
    /// exceeded what was sequenced.
    pub fn kept_all_reads(&self) -> bool {
        self.stats.sampling_fraction >= 1.0
    }
}

/// Unified entry point: index the FASTQ file, compute coverage against the
/// amplicon sequencing space, and draw the reproducible subset hitting the
/// target coverage.
///
/// Writing the filtered FASTQ and the report is left to the caller, via
/// [`fastq::write_selected_reads`] and [`DownsampleResults::get_report`].
pub fn downsample_fastq<P: AsRef<Path>>(
    input_fastq: P,
    config: &DownsampleConfig,
) -> Result<DownsampleResults, Error> {
    let input_fastq = input_fastq.as_ref();

    // 1. Fail fast on bad parameters, before any file is opened
    config.validate()?;

    // 2. First pass: build the (id, length) table
    let table = index_fastq(input_fastq)?;

    // 3. Coverage model + reproducible selection
    let (selection, stats) = analyze_and_sample(&table, config, input_fastq)?;

    Ok(DownsampleResults { selection, stats })
}
