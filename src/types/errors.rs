use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing zip containers. Fatal for the item being
/// processed, never for the whole run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open {}: {}", path.display(), source)]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to create archive {}: {}", path.display(), source)]
    Create { path: PathBuf, source: io::Error },

    #[error("invalid or corrupt archive {}: {}", path.display(), source)]
    Corrupt {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to write entry {}: {}", name, source)]
    Write {
        name: String,
        source: zip::result::ZipError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors from parsing or writing KML documents.
#[derive(Debug, Error)]
pub enum KmlError {
    #[error("malformed KML at byte {}: {}", position, source)]
    Malformed {
        position: usize,
        source: quick_xml::Error,
    },

    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
