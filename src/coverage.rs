//src/coverage.rs

use crate::types::CoverageMetrics;

/// Number of fixed-size amplicons needed to tile the genome, ceiling
/// division. At least 1 for any positive genome and amplicon size.
pub fn num_amplicons(genome_size: u64, amplicon_size: u64) -> u64 {
    genome_size.div_ceil(amplicon_size)
}

/// Coverage metrics for amplicon sequencing, against the theoretical
/// sequencing space `num_amplicons * amplicon_size`.
///
/// `num_amplicons` and `amplicon_size` must be positive (guaranteed by
/// config validation), so the divisor is never zero.
pub fn compute_coverage(
    total_bases: u64,
    num_amplicons: u64,
    amplicon_size: u64,
) -> CoverageMetrics {
    let sequencing_space = num_amplicons * amplicon_size;
    let mean_coverage = total_bases as f64 / sequencing_space as f64;

    CoverageMetrics {
        sequencing_space,
        mean_coverage,
        // Same ratio as mean coverage under the uniform-distribution model.
        theoretical_reads_per_amplicon: total_bases as f64 / sequencing_space as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplicon_count_is_ceiling_division() {
        assert_eq!(num_amplicons(16_000, 500), 32);
        assert_eq!(num_amplicons(16_001, 500), 33);
        assert_eq!(num_amplicons(499, 500), 1);
        assert_eq!(num_amplicons(500, 500), 1);
        assert_eq!(num_amplicons(1, 1), 1);
    }

    #[test]
    fn coverage_matches_exact_arithmetic() {
        // 1000 reads of length 200 over a 16 kb genome in 500 bp amplicons.
        let metrics = compute_coverage(200_000, 32, 500);
        assert_eq!(metrics.sequencing_space, 16_000);
        assert_eq!(metrics.mean_coverage, 12.5);
        assert_eq!(metrics.theoretical_reads_per_amplicon, 12.5);
    }

    #[test]
    fn zero_bases_gives_zero_coverage_not_nan() {
        let metrics = compute_coverage(0, 32, 500);
        assert_eq!(metrics.sequencing_space, 16_000);
        assert_eq!(metrics.mean_coverage, 0.0);
        assert!(!metrics.mean_coverage.is_nan());
    }
}
