use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the whole crate.
/// Every fallible operation returns `Result<T, LaunchError>`.
///
/// Per-library resolution failures are deliberately absent: a library
/// entry that fails coordinate parsing or platform filtering is skipped
/// and logged, never surfaced. Anything that would produce a silently
/// wrong classpath or argument line is a variant here.
#[derive(Debug, Error)]
pub enum LaunchError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Manifest ────────────────────────────────────────
    #[error("Cannot read version manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse version manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Coordinates ─────────────────────────────────────
    #[error("Invalid library coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Native library coordinate is not group:artifact:version: {0}")]
    NativesNameFormat(String),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LaunchResult<T> = Result<T, LaunchError>;
