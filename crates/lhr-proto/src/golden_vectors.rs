//! Golden vectors pinning the protobuf encoding of `LighthouseResult`.
//!
//! Each vector pairs a message construction with its expected wire bytes
//! (hex-encoded). They guard the hand-written field tags and the presence
//! rules: a wrapped score of `0.0` must still be written, enum and scalar
//! defaults must not.
//!
//! # Updating Vectors
//!
//! When a field tag or type changes:
//! 1. Update the message construction in the vector
//! 2. Run tests to get new expected values
//! 3. Confirm the change is intentional, since stored reports stop decoding
//! 4. Update the expected bytes

use crate::schema::{
    AuditResult, ConfigSettings, EmulatedFormFactor, LighthouseError, LighthouseResult,
    RuntimeError, ScoreDisplayMode, Timing,
};

/// A golden test vector.
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Expected wire bytes (hex-encoded).
    pub expected_bytes: &'static str,
}

/// `lighthouseVersion` alone.
pub const VERSION_VECTOR: GoldenVector = GoldenVector {
    name: "lighthouse_version",
    expected_bytes: "2205392e302e30",
};

/// One passing audit keyed by its id.
pub const AUDIT_VECTOR: GoldenVector = GoldenVector {
    name: "audit_score_one",
    expected_bytes: "4a210a0876696577706f727412150a0876696577706f7274220909000000000000f03f",
};

/// An audit scored `0.0`: the score wrapper is present but empty.
pub const ZERO_SCORE_VECTOR: GoldenVector = GoldenVector {
    name: "audit_score_zero",
    expected_bytes: "4a200a0b69732d6f6e2d687474707312110a0b69732d6f6e2d687474707322002802",
};

/// A real runtime error.
pub const RUNTIME_ERROR_VECTOR: GoldenVector = GoldenVector {
    name: "runtime_error",
    expected_bytes: "420f080a120b6e6f20646f63756d656e74",
};

/// `fetchTime` with millisecond precision.
pub const FETCH_TIME_VECTOR: GoldenVector = GoldenVector {
    name: "fetch_time",
    expected_bytes: "0a0b0880e2cfaa0610c0a9d33a",
};

/// Surviving config settings.
pub const CONFIG_SETTINGS_VECTOR: GoldenVector = GoldenVector {
    name: "config_settings",
    expected_bytes: "620908021205656e2d5553",
};

/// Total run timing.
pub const TIMING_VECTOR: GoldenVector = GoldenVector {
    name: "timing_total",
    expected_bytes: "720909a1f831e6d61cc840",
};

/// Every vector paired with its construction.
pub const ALL: [(&GoldenVector, fn() -> LighthouseResult); 7] = [
    (&VERSION_VECTOR, construct_version_vector),
    (&AUDIT_VECTOR, construct_audit_vector),
    (&ZERO_SCORE_VECTOR, construct_zero_score_vector),
    (&RUNTIME_ERROR_VECTOR, construct_runtime_error_vector),
    (&FETCH_TIME_VECTOR, construct_fetch_time_vector),
    (&CONFIG_SETTINGS_VECTOR, construct_config_settings_vector),
    (&TIMING_VECTOR, construct_timing_vector),
];

#[must_use]
pub fn construct_version_vector() -> LighthouseResult {
    LighthouseResult {
        lighthouse_version: "9.0.0".to_string(),
        ..LighthouseResult::default()
    }
}

#[must_use]
pub fn construct_audit_vector() -> LighthouseResult {
    let mut lhr = LighthouseResult::default();
    lhr.audits.insert(
        "viewport".to_string(),
        AuditResult {
            id: "viewport".to_string(),
            score: Some(1.0),
            ..AuditResult::default()
        },
    );
    lhr
}

#[must_use]
pub fn construct_zero_score_vector() -> LighthouseResult {
    let mut lhr = LighthouseResult::default();
    lhr.audits.insert(
        "is-on-https".to_string(),
        AuditResult {
            id: "is-on-https".to_string(),
            score: Some(0.0),
            score_display_mode: ScoreDisplayMode::Binary.into(),
            ..AuditResult::default()
        },
    );
    lhr
}

#[must_use]
pub fn construct_runtime_error_vector() -> LighthouseResult {
    LighthouseResult {
        runtime_error: Some(RuntimeError {
            code: LighthouseError::NoDocumentRequest.into(),
            message: "no document".to_string(),
        }),
        ..LighthouseResult::default()
    }
}

#[must_use]
pub fn construct_fetch_time_vector() -> LighthouseResult {
    LighthouseResult {
        fetch_time: Some(::prost_types::Timestamp {
            seconds: 1_700_000_000,
            nanos: 123_000_000,
        }),
        ..LighthouseResult::default()
    }
}

#[must_use]
pub fn construct_config_settings_vector() -> LighthouseResult {
    LighthouseResult {
        config_settings: Some(ConfigSettings {
            emulated_form_factor: EmulatedFormFactor::Desktop.into(),
            locale: "en-US".to_string(),
            ..ConfigSettings::default()
        }),
        ..LighthouseResult::default()
    }
}

#[must_use]
pub fn construct_timing_vector() -> LighthouseResult {
    LighthouseResult {
        timing: Some(Timing {
            total: 12_345.678_9,
            entries: Vec::new(),
        }),
        ..LighthouseResult::default()
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;
    use serde_json::json;

    use super::*;
    use crate::roundtrip::encode;

    fn verify_encoding(message: &LighthouseResult, vector: &GoldenVector) {
        let actual = hex::encode(message.encode_to_vec());
        assert_eq!(
            actual, vector.expected_bytes,
            "golden vector '{}' encoding mismatch",
            vector.name
        );
        let bytes = hex::decode(vector.expected_bytes).unwrap();
        let decoded = LighthouseResult::decode(bytes.as_slice()).unwrap();
        assert_eq!(&decoded, message, "golden vector '{}' decode mismatch", vector.name);
    }

    #[test]
    fn test_all_golden_vectors() {
        for (vector, construct) in ALL {
            verify_encoding(&construct(), vector);
        }
    }

    #[test]
    fn test_golden_vector_names_are_unique() {
        let mut names: Vec<_> = ALL.iter().map(|(v, _)| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_zero_score_survives_json() {
        let report = encode(&construct_zero_score_vector()).unwrap();
        assert_eq!(
            report,
            json!({"audits": {"is-on-https": {"id": "is-on-https", "score": 0.0, "scoreDisplayMode": "binary"}}})
        );
    }

    #[test]
    fn test_fetch_time_json() {
        let report = encode(&construct_fetch_time_vector()).unwrap();
        assert_eq!(report, json!({"fetchTime": "2023-11-14T22:13:20.123Z"}));
    }
}
