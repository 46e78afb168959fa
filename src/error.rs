use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoseError>;

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode EXIF from {path:?}: {source}")]
    ExifDecode {
        path: PathBuf,
        #[source]
        source: exif::Error,
    },

    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode marker data: {0}")]
    MarkerEncode(#[from] serde_json::Error),

    #[error("input path is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("no rows with usable coordinates")]
    NoLocatedRows,
}

impl PoseError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        PoseError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        PoseError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}
