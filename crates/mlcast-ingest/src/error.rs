//! Ingest-specific error types.

use thiserror::Error;

/// CSV preview parse failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("CSV file is empty or has no data rows")]
    EmptyFile,

    #[error("No data found in CSV file")]
    NoDataRows,
}

#[derive(Error, Debug, Clone)]
pub enum IngestError {
    #[error("Please upload a CSV file")]
    InvalidFileType(String),

    #[error("File size exceeds {} limit", format_limit(.limit_bytes))]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Error reading file: {0}")]
    Read(String),
}

impl IngestError {
    pub fn file_too_large(size_bytes: u64, limit_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            limit_bytes,
        }
    }
}

/// Whole MB or KB when the limit divides evenly, exact bytes otherwise.
fn format_limit(limit_bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * KIB;

    match *limit_bytes {
        0 => "0 bytes".to_string(),
        b if b % MIB == 0 => format!("{}MB", b / MIB),
        b if b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{} bytes", b),
    }
}
