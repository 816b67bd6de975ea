//! Error types for the round-trip pipeline.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that abort a round-trip run.
///
/// Cleanup failures are not represented here: they are classified by
/// [`crate::pipeline::CleanOutcome`] and never stop the run.
#[derive(Debug, Error)]
pub enum RoundTripError {
    /// The preprocessor program could not be started.
    #[error("failed to start preprocessor {program}: {source}")]
    PreprocessorSpawn {
        /// Program that was executed.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The preprocessor ran but exited unsuccessfully.
    #[error("preprocessor {program} exited with {status}")]
    PreprocessorFailed {
        /// Program that was executed.
        program: PathBuf,
        /// Its exit status.
        status: ExitStatus,
    },

    /// The preprocessor exited successfully without writing its output.
    #[error("preprocessor did not produce {path}")]
    PreprocessedMissing {
        /// Expected output path.
        path: PathBuf,
    },

    /// A report could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The report is not valid JSON.
    #[error("malformed report JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// The report could not be brought into canonical text form.
    #[error("failed to canonicalize report: {reason}")]
    Canonicalize {
        /// Canonicalizer diagnostic.
        reason: String,
    },

    /// The report does not conform to the `LighthouseResult` schema.
    #[error("report does not conform to the LighthouseResult schema: {0}")]
    SchemaMismatch(#[source] serde_json::Error),

    /// The wire bytes could not be decoded.
    #[error("failed to decode LighthouseResult wire bytes: {0}")]
    WireDecode(#[from] prost::DecodeError),

    /// Decoding the wire bytes produced a different message.
    #[error("LighthouseResult changed across the wire round trip ({len} bytes)")]
    WireMismatch {
        /// Length of the encoded message.
        len: usize,
    },

    /// The schema value could not be turned back into JSON.
    #[error("failed to encode LighthouseResult as JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// The round-tripped report could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl RoundTripError {
    /// Returns `true` when the input itself is at fault (malformed or
    /// non-conforming), as opposed to the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::MalformedJson(_) | Self::SchemaMismatch(_))
    }
}
