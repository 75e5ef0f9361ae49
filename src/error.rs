//! Error taxonomy for input parsing and figure output.

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read input at line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}, field {column}: '{token}' is not a number")]
    MalformedToken {
        line: usize,
        column: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: found {found} fields, need at least {required}")]
    ShortRecord {
        line: usize,
        found: usize,
        required: usize,
    },

    #[error("no samples on input")]
    NoSamples,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unsupported output format: {} (expected .svg)", path.display())]
    UnsupportedFormat { path: PathBuf },
}
