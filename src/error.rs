use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can stop a conversion run.
#[derive(Error, Debug)]
pub enum Vcf2TsvError {
    #[error("File '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot read '{}': {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{tool}' was not found on PATH (install bcftools or pass --bcftools)")]
    ToolNotFound { tool: String },

    #[error("'{tool}' failed with {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Vcf2TsvError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Vcf2TsvError::InputNotFound(_) | Vcf2TsvError::InputUnreadable { .. } => 1,
            Vcf2TsvError::Io(_) => 1,
            Vcf2TsvError::MalformedRow { .. } => 3,
            Vcf2TsvError::ToolFailed { .. } => 4,
            Vcf2TsvError::ToolNotFound { .. } => 127,
        }
    }

    /// True when stdout was closed by the reader (e.g. piping into `head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Vcf2TsvError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type Result<T> = std::result::Result<T, Vcf2TsvError>;
