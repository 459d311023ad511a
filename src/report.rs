//src/report.rs

use std::fmt::Write as FmtWrite;

use crate::types::SamplingStats;

/// Formats an integer with thousands separators, e.g. 200000 -> "200,000".
fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Renders the full Markdown analysis report for one downsampling run:
/// input parameters, sequencing metrics, the coverage formulas with the
/// run's values substituted in, and the sampling results. The expected
/// post-sampling coverage section appears only when the run downsampled.
pub fn render_markdown(stats: &SamplingStats) -> String {
    let mut out = String::new();

    write!(
        out,
        "# CovTrim - Coverage-Based FASTQ Trimming Tool Analysis Report

## Description
`covtrim` is a specialized bioinformatics tool designed for precise coverage-based downsampling of FASTQ files from amplicon sequencing data. It intelligently adjusts sequencing depth while maintaining quality metrics and amplicon representation, making it particularly useful for viral genomics, amplicon-based sequencing projects, and high-throughput sequencing optimization.

## Analysis Information
- **Tool Version**: {version}

## Overview
This report details the downsampling analysis performed on amplicon sequencing data, including the mathematical basis for coverage calculations and sampling decisions.

## Input Parameters
- **Input File**: {input}
- **Target Coverage**: {target}X
- **Genome Size**: {genome} bp
- **Amplicon Size**: {amplicon} bp
- **Number of Amplicons**: {amplicons}

## Sequencing Metrics

### Basic Statistics
- **Total Bases Sequenced**: {total_bases} bp
- **Total Reads**: {total_reads}
- **Average Read Length**: {avg_len:.2} bp

### Coverage Calculations

#### 1. Theoretical Sequencing Space
The total sequencing space is calculated based on the number of amplicons and their size:

$\\text{{Sequencing Space}} = \\text{{Number of Amplicons}} \\times \\text{{Amplicon Size}}$

$\\text{{Sequencing Space}} = {amplicons} \\times {amplicon} = {space} \\text{{ bp}}$

#### 2. Mean Coverage
Mean coverage is calculated as the ratio of total sequenced bases to the sequencing space:

$\\text{{Mean Coverage}} = \\frac{{\\text{{Total Bases}}}}{{\\text{{Sequencing Space}}}}$

$\\text{{Mean Coverage}} = \\frac{{{total_bases}}}{{{space}}} = {current:.2}\\text{{X}}$

#### 3. Theoretical Reads per Amplicon
Assuming perfect distribution across amplicons:

$\\text{{Reads per Amplicon}} = \\frac{{\\text{{Total Bases}}}}{{\\text{{Number of Amplicons}} \\times \\text{{Amplicon Size}}}}$

$\\text{{Reads per Amplicon}} = \\frac{{{total_bases}}}{{{amplicons} \\times {amplicon}}} = {rpa:.2}$

## Downsampling Analysis

### Sampling Calculation
The sampling fraction is determined by the ratio of target to current coverage:

$\\text{{Sampling Fraction}} = \\frac{{\\text{{Target Coverage}}}}{{\\text{{Current Coverage}}}}$

$\\text{{Sampling Fraction}} = \\frac{{{target}}}{{{current:.2}}} = {fraction:.4}$

### Results
- **Sampling Fraction**: {fraction_pct:.2}%
- **Sampled Reads**: {sampled_reads}
- **Sampled Bases**: {sampled_bases}
",
        version = env!("CARGO_PKG_VERSION"),
        input = stats.input_file.display(),
        target = stats.target_coverage,
        genome = with_commas(stats.genome_size),
        amplicon = stats.amplicon_size,
        amplicons = stats.num_amplicons,
        total_bases = with_commas(stats.total_bases),
        total_reads = with_commas(stats.total_reads),
        avg_len = stats.avg_read_length,
        space = with_commas(stats.sequencing_space),
        current = stats.current_coverage,
        rpa = stats.theoretical_reads_per_amplicon,
        fraction = stats.sampling_fraction,
        fraction_pct = stats.sampling_fraction * 100.0,
        sampled_reads = with_commas(stats.sampled_reads),
        sampled_bases = with_commas(stats.sampled_bases),
    )
    .unwrap();

    if let Some(expected) = stats.expected_coverage {
        write!(
            out,
            "
### Expected Coverage After Sampling
The expected coverage after sampling is calculated using the same formula as the initial coverage:

$\\text{{Expected Coverage}} = \\frac{{\\text{{Sampled Bases}}}}{{\\text{{Sequencing Space}}}}$

$\\text{{Expected Coverage}} = \\frac{{{sampled_bases}}}{{{space}}} = {expected:.2}\\text{{X}}$
",
            sampled_bases = with_commas(stats.sampled_bases),
            space = with_commas(stats.sequencing_space),
            expected = expected,
        )
        .unwrap();
    }

    out.push_str(
        "
## Methods
### Coverage Calculation
The coverage calculation takes into account the amplicon-based sequencing approach, where:
1. The genome is divided into amplicons of fixed size
2. Coverage is calculated across the total sequencing space
3. Read distribution is assumed to be uniform across amplicons

### Downsampling Method
The downsampling process:
1. Calculates required sampling fraction based on target coverage
2. Randomly samples reads using a caller-supplied random seed for reproducibility
3. Maintains original read headers and quality scores
4. Preserves read sequence context

### Implementation Notes
- Random sampling draws distinct reads without replacement from a run-local seeded generator
- Original FASTQ header information is preserved, including instrument and run metadata
- Coverage calculations account for the amplicon-based sequencing approach
",
    );

    out
}
