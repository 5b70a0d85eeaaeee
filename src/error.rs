use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("file '{}' not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("no permission to open '{}'", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("unable to decode '{}' as UTF-8, check the file encoding", .path.display())]
    Encoding { path: PathBuf },

    #[error("unable to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no numeric data to compute statistics from")]
    EmptyInput,

    #[error("at least two numeric values are needed for the sample variance, found {count}")]
    InsufficientData { count: usize },

    #[error("unable to write report to '{}'", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StatsError {
    /// Maps an I/O error raised while opening or reading `path`.
    pub fn from_read(path: PathBuf, err: io::Error) -> StatsError {
        match err.kind() {
            io::ErrorKind::NotFound => StatsError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => StatsError::PermissionDenied { path },
            io::ErrorKind::InvalidData => StatsError::Encoding { path },
            _ => StatsError::Read { path, source: err },
        }
    }

    /// True for failures to open, read or decode the input file.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            StatsError::FileNotFound { .. }
                | StatsError::PermissionDenied { .. }
                | StatsError::Encoding { .. }
                | StatsError::Read { .. }
        )
    }
}
