//! JSON → `LighthouseResult` → wire → `LighthouseResult` → JSON.
//!
//! The decode half is strict: malformed JSON and fields the schema does not
//! define both fail. It does accept what any proto3 JSON parser accepts,
//! proto field names and numeric strings included. The encode half is minimal: every field still holding
//! its schema default is left out of the output. A report therefore comes
//! back *lossy with respect to default-valued fields* (a `null` score, an
//! empty `categories` map), and that loss is exactly what the round trip is
//! meant to expose.

use prost::Message;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::RoundTripError;
use crate::schema::LighthouseResult;

/// Outcome of a full round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTrip {
    /// The re-encoded report, defaults omitted.
    pub report: Value,
    /// Length of the protobuf encoding.
    pub wire_len: usize,
    /// BLAKE3 digest of the protobuf encoding, hex-encoded.
    pub wire_digest: String,
}

/// Parses report text into a schema value.
///
/// The text is first parsed generically and rewritten as RFC 8785 canonical
/// JSON, so schema errors are reported against a normalized document rather
/// than whatever formatting the preprocessor chose.
///
/// RFC 8785 writes negative zero as `0`, so a `-0.0` in the input decodes as
/// `0.0`. That is the only value the normalization changes.
pub fn decode(text: &str) -> Result<LighthouseResult, RoundTripError> {
    let generic: Value = serde_json::from_str(text).map_err(RoundTripError::MalformedJson)?;
    let canonical = serde_jcs::to_vec(&generic).map_err(|e| RoundTripError::Canonicalize {
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&canonical).map_err(RoundTripError::SchemaMismatch)
}

/// Sends a schema value through the protobuf wire format and back.
///
/// Returns the decoded copy with the wire length and digest. A copy that
/// does not re-encode to the same bytes is an error. Bytes are compared
/// rather than values so that a NaN survives the check.
pub fn through_wire(lhr: &LighthouseResult) -> Result<(LighthouseResult, usize, String), RoundTripError> {
    let bytes = lhr.encode_to_vec();
    let digest = hex::encode(blake3::hash(&bytes).as_bytes());
    let decoded = LighthouseResult::decode(bytes.as_slice())?;
    if decoded.encode_to_vec() != bytes {
        return Err(RoundTripError::WireMismatch { len: bytes.len() });
    }
    debug!(wire_len = bytes.len(), wire_digest = %digest, "wire round trip ok");
    Ok((decoded, bytes.len(), digest))
}

/// Converts a schema value back into generic JSON, omitting defaults.
pub fn encode(lhr: &LighthouseResult) -> Result<Value, RoundTripError> {
    serde_json::to_value(lhr).map_err(RoundTripError::Encode)
}

/// Runs [`decode`], [`through_wire`] and [`encode`] in sequence.
pub fn round_trip(text: &str) -> Result<RoundTrip, RoundTripError> {
    let lhr = decode(text)?;
    let (lhr, wire_len, wire_digest) = through_wire(&lhr)?;
    let report = encode(&lhr)?;
    Ok(RoundTrip {
        report,
        wire_len,
        wire_digest,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{AuditResult, ScoreDisplayMode};

    #[test]
    fn test_empty_categories_are_dropped() {
        let rt = round_trip(r#"{"lighthouseVersion": "9.0.0", "categories": {}}"#).unwrap();
        assert_eq!(rt.report, json!({"lighthouseVersion": "9.0.0"}));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let err = round_trip(r#"{"lighthouseVersion": "9.0.0""#).unwrap_err();
        assert!(matches!(err, RoundTripError::MalformedJson(_)), "{err}");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let err = round_trip(r#"{"lighthouseVersion": "9.0.0", "notInSchema": true}"#).unwrap_err();
        assert!(matches!(err, RoundTripError::SchemaMismatch(_)), "{err}");
        assert!(err.to_string().contains("notInSchema"));
    }

    #[test]
    fn test_null_score_is_omitted_but_zero_score_is_kept() {
        let rt = round_trip(
            r#"{"audits": {
                "a": {"id": "a", "score": null, "scoreDisplayMode": "manual"},
                "b": {"id": "b", "score": 0, "scoreDisplayMode": "binary"}
            }}"#,
        )
        .unwrap();
        assert_eq!(
            rt.report,
            json!({"audits": {
                "a": {"id": "a", "scoreDisplayMode": "manual"},
                "b": {"id": "b", "score": 0.0, "scoreDisplayMode": "binary"}
            }})
        );
    }

    #[test]
    fn test_details_survive_verbatim() {
        let details = json!({
            "type": "opportunity",
            "headings": [{"key": "url", "valueType": "url", "label": "URL"}],
            "items": [{"url": "https://example.com/app.js", "wastedBytes": 20480, "wastedPercent": 61.5}],
            "overallSavingsMs": 150,
            "summary": {}
        });
        let input = json!({"audits": {"unused-javascript": {"details": details}}});
        let rt = round_trip(&input.to_string()).unwrap();
        assert_eq!(rt.report["audits"]["unused-javascript"]["details"], details);
    }

    #[test]
    fn test_wire_round_trip_is_lossless() {
        let mut lhr = LighthouseResult {
            lighthouse_version: "9.0.0".to_string(),
            ..LighthouseResult::default()
        };
        lhr.audits.insert(
            "viewport".to_string(),
            AuditResult {
                id: "viewport".to_string(),
                score: Some(1.0),
                score_display_mode: ScoreDisplayMode::Binary.into(),
                ..AuditResult::default()
            },
        );
        let (decoded, len, digest) = through_wire(&lhr).unwrap();
        assert_eq!(decoded, lhr);
        assert_eq!(len, lhr.encoded_len());
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_round_trip_is_deterministic() {
        let text = r#"{"finalUrl": "https://example.com/", "runWarnings": ["slow"], "timing": {"total": 12345.6789}}"#;
        let first = round_trip(text).unwrap();
        let second = round_trip(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_proto_field_names_are_accepted() {
        let rt = round_trip(
            r#"{
                "lighthouse_version": "9.0.0",
                "final_url": "https://example.com/",
                "audits": {"a": {"id": "a", "score_display_mode": "binary", "numeric_value": 12}},
                "config_settings": {"emulated_form_factor": "desktop", "only_categories": null},
                "i18n": {"renderer_formatted_strings": {"error_label": "Error!"}}
            }"#,
        )
        .unwrap();
        assert_eq!(
            rt.report,
            json!({
                "lighthouseVersion": "9.0.0",
                "finalUrl": "https://example.com/",
                "audits": {"a": {"id": "a", "scoreDisplayMode": "binary", "numericValue": 12.0}},
                "configSettings": {"emulatedFormFactor": "desktop", "onlyCategories": null},
                "i18n": {"rendererFormattedStrings": {"errorLabel": "Error!"}}
            })
        );
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let rt = round_trip(
            r#"{
                "audits": {"a": {"score": "0.5", "numericValue": "1e3"}},
                "categories": {"c": {"score": "1", "auditRefs": [{"id": "a", "weight": "2.5"}]}},
                "timing": {"total": "12.25"}
            }"#,
        )
        .unwrap();
        assert_eq!(
            rt.report,
            json!({
                "audits": {"a": {"score": 0.5, "numericValue": 1000.0}},
                "categories": {"c": {"score": 1.0, "auditRefs": [{"id": "a", "weight": 2.5}]}},
                "timing": {"total": 12.25}
            })
        );
    }

    #[test]
    fn test_bad_numeric_string_is_schema_mismatch() {
        let err = round_trip(r#"{"audits": {"a": {"score": "half"}}}"#).unwrap_err();
        assert!(matches!(err, RoundTripError::SchemaMismatch(_)), "{err}");
    }

    #[test]
    fn test_non_finite_score_fails_on_encode() {
        let lhr = decode(r#"{"audits": {"a": {"score": "NaN"}}}"#).unwrap();
        assert!(lhr.audits["a"].score.is_some_and(f64::is_nan));

        let err = round_trip(r#"{"audits": {"a": {"score": "NaN"}}}"#).unwrap_err();
        assert!(matches!(err, RoundTripError::Encode(_)), "{err}");
        let err = round_trip(r#"{"timing": {"total": "-Infinity"}}"#).unwrap_err();
        assert!(matches!(err, RoundTripError::Encode(_)), "{err}");
    }

    #[test]
    fn test_negative_zero_loses_its_sign() {
        let rt = round_trip(r#"{"audits": {"a": {"score": -0.0}}}"#).unwrap();
        let score = rt.report["audits"]["a"]["score"].as_f64().unwrap();
        assert_eq!(score.to_bits(), 0.0f64.to_bits());
    }
}
