//! Error types for svannotate
//!
//! Every failure is fatal. The top-level error carries a category that
//! decides the process exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for unreadable or missing input files
pub const EXIT_FILE_IO_ERROR: i32 = 1;
/// Exit status for command line and configuration errors
pub const EXIT_COMMAND_LINE_ERROR: i32 = 2;
/// Exit status for malformed TSV content
pub const EXIT_TSV_FILE_ERROR: i32 = 3;

/// Main error type for svannotate operations
#[derive(Debug, Error)]
pub enum SvAnnotateError {
    /// Input path missing or unreadable
    #[error("could not read file {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected parameters, reported before any file is opened
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed TSV content
    #[error("{0}")]
    DataFormat(#[from] DataFormatError),

    /// Failure writing the annotated table
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl SvAnnotateError {
    /// Wrap an I/O error raised while accessing `path`
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SvAnnotateError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            SvAnnotateError::FileAccess { .. } | SvAnnotateError::Output(_) => EXIT_FILE_IO_ERROR,
            SvAnnotateError::InvalidConfiguration(_) => EXIT_COMMAND_LINE_ERROR,
            SvAnnotateError::DataFormat(_) => EXIT_TSV_FILE_ERROR,
        }
    }
}

/// Errors in the content of a TSV input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatError {
    /// Input has no header line
    #[error("input is empty, expected a header line")]
    EmptyInput,

    /// Header lacks a required column
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// Required numeric field does not parse as an integer
    #[error("invalid integer '{value}' in column '{column}' at line {line}")]
    InvalidInteger {
        line: usize,
        column: String,
        value: String,
    },

    /// Annotation row with end before start
    #[error("end ({end}) before start ({start}) at line {line}")]
    InvertedInterval { line: usize, start: i64, end: i64 },

    /// Row is shorter than the header
    #[error("expected {expected} fields at line {line}, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl DataFormatError {
    pub fn missing_column(column: &str) -> Self {
        DataFormatError::MissingColumn {
            column: column.to_string(),
        }
    }

    pub fn invalid_integer(column: &str, value: &str, line: usize) -> Self {
        DataFormatError::InvalidInteger {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for svannotate operations
pub type Result<T> = std::result::Result<T, SvAnnotateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(SvAnnotateError::file_access("a.tsv", io).exit_code(), 1);
        assert_eq!(
            SvAnnotateError::InvalidConfiguration("pad".into()).exit_code(),
            2
        );
        let fmt: SvAnnotateError = DataFormatError::EmptyInput.into();
        assert_eq!(fmt.exit_code(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = DataFormatError::invalid_integer("pos1", "abc", 7);
        let msg = format!("{}", err);
        assert!(msg.contains("'abc'"));
        assert!(msg.contains("pos1"));
        assert!(msg.contains("line 7"));

        let err = DataFormatError::missing_column("tier");
        assert_eq!(format!("{}", err), "missing required column 'tier'");
    }
}
