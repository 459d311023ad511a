//src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All the ways a downsampling run can fail. Every failure is terminal;
/// there are no retries anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file is missing, unreadable, or not parseable as FASTQ.
    #[error("cannot read FASTQ input {}: {reason}", path.display())]
    Input {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<io::Error>,
    },

    /// Zero sequenced bases: the sampling fraction would be a division by
    /// zero, so coverage is undefined for this input.
    #[error("no sequenced bases in {}; coverage is undefined", path.display())]
    DegenerateCoverage { path: PathBuf },

    /// A non-positive run parameter, caught before indexing begins.
    #[error("{name} must be positive, got {value}")]
    Config { name: &'static str, value: String },
}

impl Error {
    /// Wraps an io error with the path it occurred on.
    pub fn input_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Input {
            path: path.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// A malformed-FASTQ failure with no underlying io error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Input {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }
}
