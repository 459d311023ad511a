//src/types.rs

use std::path::PathBuf;

/// A minimal representation of one indexed read: its identifier and the
/// length of its sequence payload. The sequence itself is never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub id: String,
    pub len: u64,
}

/// One row per read, in file order. Duplicate identifiers are allowed here
/// as distinct rows; they collapse later in the selected-id set.
pub type ReadTable = Vec<ReadRecord>;

/// Coverage metrics against the theoretical amplicon sequencing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageMetrics {
    /// `num_amplicons * amplicon_size`, in bp.
    pub sequencing_space: u64,
    /// `total_bases / sequencing_space`.
    pub mean_coverage: f64,
    /// Reads-per-amplicon assuming uniform distribution across amplicons.
    pub theoretical_reads_per_amplicon: f64,
}

/// Everything the report generator needs about one downsampling run.
/// Built once by the sampler and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SamplingStats {
    pub input_file: PathBuf,
    pub target_coverage: f64,
    pub genome_size: u64,
    pub amplicon_size: u64,
    pub num_amplicons: u64,
    pub total_bases: u64,
    pub total_reads: u64,
    pub avg_read_length: f64,
    pub sequencing_space: u64,
    pub current_coverage: f64,
    pub theoretical_reads_per_amplicon: f64,
    pub sampling_fraction: f64,
    pub sampled_reads: u64,
    pub sampled_bases: u64,
    /// Present only when the run actually downsampled (fraction < 1).
    pub expected_coverage: Option<f64>,
}

/// Run parameters for one downsampling invocation.
#[derive(Debug, Clone, Copy)]
pub struct DownsampleConfig {
    /// Desired coverage depth (X). Must be > 0.
    pub target_coverage: f64,
    /// Size of the target genome in bp. Must be > 0.
    pub genome_size: u64,
    /// Size of each amplicon in bp. Must be > 0.
    pub amplicon_size: u64,
    /// Seed for the run-local RNG; same seed, same table, same subset.
    pub seed: u64,
}

impl DownsampleConfig {
    pub const DEFAULT_GENOME_SIZE: u64 = 16_000;
    pub const DEFAULT_AMPLICON_SIZE: u64 = 500;
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(target_coverage: f64) -> Self {
        Self {
            target_coverage,
            genome_size: Self::DEFAULT_GENOME_SIZE,
            amplicon_size: Self::DEFAULT_AMPLICON_SIZE,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Rejects non-positive parameters before any file is touched.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        use crate::error::Error;

        if !(self.target_coverage > 0.0) {
            return Err(Error::Config {
                name: "target_coverage",
                value: self.target_coverage.to_string(),
            });
        }
        if self.genome_size == 0 {
            return Err(Error::Config {
                name: "genome_size",
                value: self.genome_size.to_string(),
            });
        }
        if self.amplicon_size == 0 {
            return Err(Error::Config {
                name: "amplicon_size",
                value: self.amplicon_size.to_string(),
            });
        }
        Ok(())
    }
}
