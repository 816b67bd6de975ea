//! Reshapes a raw Lighthouse report into the form the schema accepts.
//!
//! A raw report carries data the `LighthouseResult` schema has no field for
//! (most of `configSettings`, `rawValue`, `icuMessagePaths`) and a few values
//! in shapes it cannot hold (array `displayValue`s, hyphenated display
//! modes). [`process_for_proto`] fixes all of these without touching its
//! input. Empty strings are dropped too: the schema would drop them anyway,
//! and removing them up front keeps the preprocessed and round-tripped
//! reports comparable.

use serde_json::{Map, Value};

/// `configSettings` keys that exist in the schema.
pub const KEPT_CONFIG_SETTINGS: [&str; 4] = ["emulatedFormFactor", "locale", "onlyCategories", "channel"];

/// Separator used when flattening an array `displayValue`.
pub const DISPLAY_VALUE_SEPARATOR: &str = " | ";

/// Returns a preprocessed copy of `report`.
#[must_use]
pub fn process_for_proto(report: &Value) -> Value {
    let mut out = report.clone();
    let Some(root) = out.as_object_mut() else {
        return out;
    };

    if let Some(Value::Object(settings)) = root.get_mut("configSettings") {
        settings.retain(|key, _| KEPT_CONFIG_SETTINGS.contains(&key.as_str()));
    }

    let no_error = root
        .get("runtimeError")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        == Some("NO_ERROR");
    if no_error {
        root.remove("runtimeError");
    }

    if let Some(Value::Object(audits)) = root.get_mut("audits") {
        for audit in audits.values_mut().filter_map(Value::as_object_mut) {
            normalize_audit(audit);
        }
    }

    if let Some(Value::Object(i18n)) = root.get_mut("i18n") {
        i18n.remove("icuMessagePaths");
    }

    remove_empty_strings(&mut out);
    out
}

fn normalize_audit(audit: &mut Map<String, Value>) {
    if let Some(mode) = audit.get_mut("scoreDisplayMode") {
        if matches!(mode.as_str(), Some("not-applicable" | "not_applicable")) {
            *mode = Value::from("notApplicable");
        }
    }

    audit.remove("rawValue");

    if let Some(Value::Array(parts)) = audit.get("displayValue") {
        let joined = parts
            .iter()
            .map(display_part)
            .collect::<Vec<_>>()
            .join(DISPLAY_VALUE_SEPARATOR);
        audit.insert("displayValue".to_string(), Value::from(joined));
    }
}

/// Stringifies one `displayValue` element the way the report renderer
/// joins them: strings verbatim, `null` as empty, integral numbers without a
/// fraction.
fn display_part(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(display_part).collect::<Vec<_>>().join(","),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Deletes `""` values from every object, recursing through arrays.
/// Empty strings that are array elements are kept.
fn remove_empty_strings(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| v.as_str() != Some(""));
            map.values_mut().for_each(remove_empty_strings);
        },
        Value::Array(items) => items.iter_mut().for_each(remove_empty_strings),
        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_does_not_modify_input() {
        let input = json!({
            "configSettings": {"output": ["json"], "locale": "en-US"},
            "audits": {"a": {"rawValue": 1, "displayValue": ["x", 1]}},
            "i18n": {"icuMessagePaths": {}}
        });
        let snapshot = input.clone();
        let _ = process_for_proto(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_keeps_only_schema_config_settings() {
        let input = json!({
            "configSettings": {
                "output": ["json"],
                "maxWaitForLoad": 45000,
                "throttlingMethod": "devtools",
                "throttling": {"rttMs": 150, "throughputKbps": 1638.4},
                "gatherMode": false,
                "disableStorageReset": false,
                "emulatedFormFactor": "mobile",
                "locale": "en-US",
                "blockedUrlPatterns": null,
                "extraHeaders": null,
                "onlyAudits": null,
                "onlyCategories": null,
                "skipAudits": null
            }
        });
        let output = process_for_proto(&input);
        assert_eq!(
            output["configSettings"],
            json!({"emulatedFormFactor": "mobile", "locale": "en-US", "onlyCategories": null})
        );
    }

    #[test]
    fn test_removes_no_error_runtime_error() {
        let output = process_for_proto(&json!({"runtimeError": {"code": "NO_ERROR"}}));
        assert!(output.get("runtimeError").is_none());
    }

    #[test]
    fn test_keeps_real_runtime_error() {
        let input = json!({"runtimeError": {"code": "NO_DOCUMENT_REQUEST", "message": "no doc"}});
        assert_eq!(process_for_proto(&input), input);
    }

    #[test]
    fn test_cleans_up_audits() {
        let input = json!({
            "audits": {
                "critical-request-chains": {
                    "scoreDisplayMode": "not-applicable",
                    "rawValue": 14.3,
                    "numericValue": 14.3,
                    "displayValue": ["hello %d", 123]
                },
                "other": {"scoreDisplayMode": "not_applicable"},
                "kept": {"scoreDisplayMode": "binary", "displayValue": "1 request"}
            }
        });
        let output = process_for_proto(&input);
        assert_eq!(
            output["audits"],
            json!({
                "critical-request-chains": {
                    "scoreDisplayMode": "notApplicable",
                    "numericValue": 14.3,
                    "displayValue": "hello %d | 123"
                },
                "other": {"scoreDisplayMode": "notApplicable"},
                "kept": {"scoreDisplayMode": "binary", "displayValue": "1 request"}
            })
        );
    }

    #[test]
    fn test_display_parts() {
        assert_eq!(display_part(&json!(2.0)), "2");
        assert_eq!(display_part(&json!(0.25)), "0.25");
        assert_eq!(display_part(&json!(null)), "");
        assert_eq!(display_part(&json!(["a", 1])), "a,1");
    }

    #[test]
    fn test_removes_icu_message_paths() {
        let output = process_for_proto(&json!({"i18n": {"icuMessagePaths": {"content": "paths"}}}));
        assert_eq!(output, json!({"i18n": {}}));
    }

    #[test]
    fn test_removes_empty_strings() {
        let input = json!({
            "audits": {
                "critical-request-chains": {"details": {"chains": {"1": ""}}}
            },
            "i18n": {
                "icuMessagePaths": {"content": "paths"},
                "2": "",
                "3": [{"hello": "world", "4": ""}, ""]
            }
        });
        let expected = json!({
            "audits": {
                "critical-request-chains": {"details": {"chains": {}}}
            },
            "i18n": {
                "3": [{"hello": "world"}, ""]
            }
        });
        assert_eq!(process_for_proto(&input), expected);
    }

    #[test]
    fn test_non_object_report_is_returned_as_is() {
        assert_eq!(process_for_proto(&json!([1, 2])), json!([1, 2]));
    }
}
