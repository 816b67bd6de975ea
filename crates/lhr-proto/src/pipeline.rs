//! The end-to-end round-trip run.
//!
//! One run performs, in order:
//!
//! 1. clean: remove any stale preprocessed artifact,
//! 2. preprocess: invoke the external preprocessor on the sample,
//! 3. round trip: decode, pass through the wire format, encode,
//! 4. write: store the result in canonical text form.
//!
//! Any failure after cleanup aborts the run. No stage retries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::canonical::to_canonical_string;
use crate::config::{PreprocessorConfig, RoundTripConfig};
use crate::error::RoundTripError;
use crate::roundtrip::round_trip;

/// What happened to a stale artifact during cleanup.
#[derive(Debug)]
pub enum CleanOutcome {
    /// The file existed and was deleted.
    Removed,
    /// There was nothing to delete.
    Absent,
    /// Deletion failed for a reason other than absence. The run continues;
    /// the preprocessor will overwrite the file or fail on its own.
    Failed(io::Error),
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Where the round-tripped report was written.
    pub round_trip_path: PathBuf,
    /// Length of the protobuf encoding.
    pub wire_len: usize,
    /// BLAKE3 digest of the protobuf encoding, hex-encoded.
    pub wire_digest: String,
    /// Number of audits in the round-tripped report.
    pub audit_count: usize,
    /// Number of categories in the round-tripped report.
    pub category_count: usize,
}

/// Deletes `path` if it exists.
///
/// Never fails: absence is the expected steady state and any other error is
/// logged and reported through [`CleanOutcome::Failed`].
pub fn clean_workspace(path: &Path) -> CleanOutcome {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale artifact");
            CleanOutcome::Removed
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => CleanOutcome::Absent,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove stale artifact");
            CleanOutcome::Failed(e)
        },
    }
}

/// Runs the preprocessor to turn `input` into `output`.
///
/// The preprocessor's stdout and stderr are inherited. A non-zero exit, or a
/// zero exit that leaves no file at `output`, is an error.
pub fn run_preprocessor(
    preprocessor: &PreprocessorConfig,
    input: &Path,
    output: &Path,
) -> Result<(), RoundTripError> {
    let mut in_arg = std::ffi::OsString::from("--in=");
    in_arg.push(input);
    let mut out_arg = std::ffi::OsString::from("--out=");
    out_arg.push(output);

    debug!(
        program = %preprocessor.program.display(),
        args = ?preprocessor.args,
        "invoking preprocessor"
    );
    let status = Command::new(&preprocessor.program)
        .args(&preprocessor.args)
        .arg(in_arg)
        .arg(out_arg)
        .status()
        .map_err(|source| RoundTripError::PreprocessorSpawn {
            program: preprocessor.program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(RoundTripError::PreprocessorFailed {
            program: preprocessor.program.clone(),
            status,
        });
    }
    if !output.is_file() {
        return Err(RoundTripError::PreprocessedMissing {
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Writes `report` to `path` in canonical text form, creating parent
/// directories as needed.
pub fn write_canonical(path: &Path, report: &Value) -> Result<(), RoundTripError> {
    let text = to_canonical_string(report).map_err(RoundTripError::Encode)?;
    let write_err = |source| RoundTripError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, text).map_err(write_err)
}

/// Runs all stages against `config`.
pub fn run(config: &RoundTripConfig) -> Result<RunReport, RoundTripError> {
    let outcome = clean_workspace(&config.preprocessed);
    info!(path = %config.preprocessed.display(), outcome = ?outcome, "cleaned workspace");

    if let Some(parent) = config.preprocessed.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RoundTripError::Write {
            path: config.preprocessed.clone(),
            source,
        })?;
    }
    run_preprocessor(&config.preprocessor, &config.sample, &config.preprocessed)?;
    info!(
        sample = %config.sample.display(),
        preprocessed = %config.preprocessed.display(),
        "preprocessed sample"
    );

    let text = fs::read_to_string(&config.preprocessed).map_err(|source| RoundTripError::Read {
        path: config.preprocessed.clone(),
        source,
    })?;
    let result = round_trip(&text)?;
    info!(wire_len = result.wire_len, wire_digest = %result.wire_digest, "round trip complete");

    write_canonical(&config.round_trip, &result.report)?;
    info!(path = %config.round_trip.display(), "wrote round-tripped report");

    let count = |key: &str| result.report.get(key).and_then(Value::as_object).map_or(0, serde_json::Map::len);
    Ok(RunReport {
        round_trip_path: config.round_trip.clone(),
        wire_len: result.wire_len,
        wire_digest: result.wire_digest,
        audit_count: count("audits"),
        category_count: count("categories"),
    })
}
