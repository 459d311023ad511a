//src/sample.rs

use std::path::Path;

use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::coverage::{compute_coverage, num_amplicons};
use crate::error::Error;
use crate::types::{DownsampleConfig, ReadRecord, ReadTable, SamplingStats};

/// The outcome of one random selection: the sampled rows (file order, for
/// statistics) and the distinct ids they carry (for the second-pass filter).
/// Duplicate identifiers collapse here, in the set, and nowhere else.
#[derive(Debug, Clone)]
pub struct Selection {
    pub records: Vec<ReadRecord>,
    pub ids: AHashSet<String>,
}

impl Selection {
    fn from_records(records: Vec<ReadRecord>) -> Self {
        let ids = records.iter().map(|r| r.id.clone()).collect();
        Selection { records, ids }
    }

    pub fn sampled_bases(&self) -> u64 {
        self.records.iter().map(|r| r.len).sum()
    }
}

/// Ratio of target to current coverage. Zero current coverage (empty input
/// or all-empty reads) has no meaningful fraction and must surface as an
/// error rather than an infinity.
pub fn derive_sampling_fraction(
    target_coverage: f64,
    current_coverage: f64,
    input_path: &Path,
) -> Result<f64, Error> {
    if current_coverage <= 0.0 {
        return Err(Error::DegenerateCoverage {
            path: input_path.to_path_buf(),
        });
    }
    Ok(target_coverage / current_coverage)
}

/// Number of rows to draw: round half away from zero, clamped to the table
/// size. Pinned explicitly so the sampled count never depends on a numeric
/// library's tie-break.
fn sample_size(fraction: f64, table_len: usize) -> usize {
    let n = (fraction * table_len as f64).round();
    (n.max(0.0) as usize).min(table_len)
}

/// Draws a uniform random subset of the table without replacement.
///
/// A fraction >= 1 keeps the whole table: subsampling cannot raise coverage,
/// so the run degrades to "use all reads" with a warning. Otherwise
/// `round(fraction * |table|)` distinct rows are drawn with an RNG seeded
/// only from `seed`; the same seed and table always give the same subset.
/// Selected rows come back in file order.
pub fn select_reads(table: &ReadTable, fraction: f64, seed: u64) -> Selection {
    if fraction >= 1.0 {
        log::warn!(
            "sampling fraction {:.4} >= 1; requested coverage exceeds available coverage, keeping all {} reads",
            fraction,
            table.len()
        );
        return Selection::from_records(table.clone());
    }

    let amount = sample_size(fraction, table.len());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = rand::seq::index::sample(&mut rng, table.len(), amount).into_vec();
    indices.sort_unstable();

    let records = indices.into_iter().map(|i| table[i].clone()).collect();
    Selection::from_records(records)
}

/// The whole sampler pipeline on an indexed table: current coverage ->
/// sampling fraction -> selection -> post-sampling coverage -> stats record.
pub fn analyze_and_sample(
    table: &ReadTable,
    config: &DownsampleConfig,
    input_path: &Path,
) -> Result<(Selection, SamplingStats), Error> {
    config.validate()?;

    if table.is_empty() {
        return Err(Error::DegenerateCoverage {
            path: input_path.to_path_buf(),
        });
    }

    let total_bases: u64 = table.iter().map(|r| r.len).sum();
    let total_reads = table.len() as u64;
    let amplicons = num_amplicons(config.genome_size, config.amplicon_size);

    let metrics = compute_coverage(total_bases, amplicons, config.amplicon_size);
    log::info!(
        "{}: {} reads, {} bases, {:.2}X over {} bp sequencing space",
        input_path.display(),
        total_reads,
        total_bases,
        metrics.mean_coverage,
        metrics.sequencing_space
    );

    let fraction =
        derive_sampling_fraction(config.target_coverage, metrics.mean_coverage, input_path)?;

    let selection = select_reads(table, fraction, config.seed);
    let sampled_bases = selection.sampled_bases();

    // Post-sampling coverage only means something when we actually sampled.
    let expected_coverage = if fraction < 1.0 {
        let sampled_metrics = compute_coverage(sampled_bases, amplicons, config.amplicon_size);
        log::info!(
            "sampling {:.2}% of reads, expected coverage {:.2}X",
            fraction * 100.0,
            sampled_metrics.mean_coverage
        );
        Some(sampled_metrics.mean_coverage)
    } else {
        None
    };

    let stats = SamplingStats {
        input_file: input_path.to_path_buf(),
        target_coverage: config.target_coverage,
        genome_size: config.genome_size,
        amplicon_size: config.amplicon_size,
        num_amplicons: amplicons,
        total_bases,
        total_reads,
        avg_read_length: total_bases as f64 / total_reads as f64,
        sequencing_space: metrics.sequencing_space,
        current_coverage: metrics.mean_coverage,
        theoretical_reads_per_amplicon: metrics.theoretical_reads_per_amplicon,
        sampling_fraction: fraction,
        sampled_reads: selection.records.len() as u64,
        sampled_bases,
        expected_coverage,
    };

    Ok((selection, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn uniform_table(n: usize, len: u64) -> ReadTable {
        (0..n)
            .map(|i| ReadRecord {
                id: format!("read{i}"),
                len,
            })
            .collect()
    }

    #[test]
    fn fraction_is_target_over_current() {
        let p = PathBuf::from("reads.fastq");
        let f = derive_sampling_fraction(5.0, 12.5, &p).expect("fraction");
        assert_eq!(f, 0.4);
    }

    #[test]
    fn zero_coverage_is_a_degenerate_error() {
        let p = PathBuf::from("empty.fastq");
        let err = derive_sampling_fraction(5.0, 0.0, &p).unwrap_err();
        assert!(matches!(err, Error::DegenerateCoverage { .. }));
        assert!(err.to_string().contains("empty.fastq"));
    }

    #[test]
    fn selection_is_deterministic_for_fixed_seed() {
        let table = uniform_table(1000, 200);
        let a = select_reads(&table, 0.4, 42);
        let b = select_reads(&table, 0.4, 42);
        assert_eq!(a.records, b.records);
        assert_eq!(a.ids, b.ids);
    }

    #[test]
    fn different_seeds_change_the_subset() {
        let table = uniform_table(1000, 200);
        let a = select_reads(&table, 0.4, 42);
        let b = select_reads(&table, 0.4, 43);
        assert_eq!(a.records.len(), b.records.len());
        assert_ne!(a.records, b.records);
    }

    #[test]
    fn fraction_of_one_or_more_keeps_everything() {
        let table = uniform_table(1000, 200);
        for fraction in [1.0, 1.6, 10.0] {
            let sel = select_reads(&table, fraction, 42);
            assert_eq!(sel.records, table);
            assert_eq!(sel.ids.len(), 1000);
        }
    }

    #[test]
    fn sample_size_rounds_half_away_from_zero() {
        assert_eq!(sample_size(0.4, 1000), 400);
        assert_eq!(sample_size(0.5, 5), 3); // 2.5 rounds up
        assert_eq!(sample_size(0.3, 5), 2); // 1.5 rounds up
        assert_eq!(sample_size(0.0, 1000), 0);
        assert_eq!(sample_size(0.9999, 4), 4);
    }

    #[test]
    fn selected_count_is_exact_and_bounded() {
        let table = uniform_table(1000, 200);
        let sel = select_reads(&table, 0.4, 42);
        assert_eq!(sel.records.len(), 400);
        assert!(sel.records.len() <= table.len());
    }

    #[test]
    fn selected_rows_are_distinct_and_in_file_order() {
        let table = uniform_table(100, 50);
        let sel = select_reads(&table, 0.5, 7);
        // ids are unique in this table, so distinctness shows in the set
        assert_eq!(sel.ids.len(), sel.records.len());
        let positions: Vec<usize> = sel
            .records
            .iter()
            .map(|r| table.iter().position(|t| t == r).expect("row from table"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn duplicate_ids_collapse_in_the_id_set_only() {
        let table: ReadTable = vec![
            ReadRecord { id: "dup".into(), len: 100 },
            ReadRecord { id: "dup".into(), len: 100 },
            ReadRecord { id: "dup".into(), len: 100 },
            ReadRecord { id: "solo".into(), len: 100 },
        ];
        let sel = select_reads(&table, 1.0, 42);
        assert_eq!(sel.records.len(), 4);
        assert_eq!(sel.ids.len(), 2);
        assert!(sel.ids.contains("dup"));
        assert!(sel.ids.contains("solo"));
    }

    #[test]
    fn covtrim_round_trip_scenario() {
        // 1000 reads x 200 bp, 16 kb genome, 500 bp amplicons, target 5X.
        let table = uniform_table(1000, 200);
        let cfg = DownsampleConfig {
            target_coverage: 5.0,
            genome_size: 16_000,
            amplicon_size: 500,
            seed: 42,
        };
        let p = PathBuf::from("reads.fastq");
        let (sel, stats) = analyze_and_sample(&table, &cfg, &p).expect("analyze");

        assert_eq!(stats.num_amplicons, 32);
        assert_eq!(stats.sequencing_space, 16_000);
        assert_eq!(stats.total_bases, 200_000);
        assert_eq!(stats.current_coverage, 12.5);
        assert_eq!(stats.theoretical_reads_per_amplicon, 12.5);
        assert_eq!(stats.sampling_fraction, 0.4);
        assert_eq!(stats.sampled_reads, 400);
        assert_eq!(sel.records.len(), 400);
        assert_eq!(stats.sampled_bases, 400 * 200);
        let expected = stats.expected_coverage.expect("downsampled run");
        assert_eq!(expected, 5.0);
        assert_eq!(stats.avg_read_length, 200.0);
    }

    #[test]
    fn target_above_available_keeps_all_reads_without_error() {
        let table = uniform_table(1000, 200);
        let cfg = DownsampleConfig {
            target_coverage: 20.0,
            genome_size: 16_000,
            amplicon_size: 500,
            seed: 42,
        };
        let p = PathBuf::from("reads.fastq");
        let (sel, stats) = analyze_and_sample(&table, &cfg, &p).expect("analyze");

        assert_eq!(stats.sampling_fraction, 1.6);
        assert_eq!(sel.records.len(), 1000);
        assert_eq!(stats.sampled_reads, 1000);
        assert_eq!(stats.sampled_bases, 200_000);
        assert!(stats.expected_coverage.is_none());
    }

    #[test]
    fn empty_table_is_a_degenerate_error() {
        let cfg = DownsampleConfig::new(5.0);
        let p = PathBuf::from("empty.fastq");
        let err = analyze_and_sample(&ReadTable::new(), &cfg, &p).unwrap_err();
        assert!(matches!(err, Error::DegenerateCoverage { .. }));
    }

    #[test]
    fn zero_length_reads_are_a_degenerate_error() {
        let table = uniform_table(10, 0);
        let cfg = DownsampleConfig::new(5.0);
        let p = PathBuf::from("zero.fastq");
        let err = analyze_and_sample(&table, &cfg, &p).unwrap_err();
        assert!(matches!(err, Error::DegenerateCoverage { .. }));
    }
}
