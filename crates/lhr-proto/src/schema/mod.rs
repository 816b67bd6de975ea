//! The `LighthouseResult` protobuf schema.
//!
//! Each message derives `prost::Message` for the binary wire format and
//! serde's traits for the proto3 JSON mapping, so a single value serves both
//! encodings. Tags follow `lighthouse-result.proto`; the derive is written by
//! hand, there is no `protoc` step.
//!
//! # JSON mapping
//!
//! - Every message rejects unknown fields (`deny_unknown_fields`). Both the
//!   lowerCamelCase JSON name and the proto field name are accepted; output
//!   always uses the JSON name.
//! - `double` fields also accept their value as a string (`"0.5"`, `"NaN"`).
//! - Absent fields keep the schema default; defaults are omitted on output.
//! - Maps use `BTreeMap` so both encodings iterate in key order.
//!
//! ```rust
//! use lhr_proto::schema::LighthouseResult;
//!
//! let lhr: LighthouseResult =
//!     serde_json::from_str(r#"{"lighthouseVersion": "9.0.0", "categories": {}}"#).unwrap();
//! assert_eq!(lhr.lighthouse_version, "9.0.0");
//! assert!(lhr.categories.is_empty());
//! ```

pub mod enums;
pub mod json;
pub mod well_known;

use std::collections::BTreeMap;

pub use enums::{EmulatedFormFactor, JsonEnum, LighthouseError, ScoreDisplayMode};
use serde::{Deserialize, Serialize};

/// Root message: the result of one Lighthouse run.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LighthouseResult {
    /// Time the run started.
    #[prost(message, optional, tag = "1")]
    #[serde(with = "json::timestamp", skip_serializing_if = "Option::is_none")]
    #[serde(alias = "fetch_time")]
    pub fetch_time: Option<::prost_types::Timestamp>,

    /// URL the run was asked to audit.
    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "requested_url")]
    pub requested_url: String,

    /// URL after redirects.
    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "final_url")]
    pub final_url: String,

    /// Version of Lighthouse that produced the report.
    #[prost(string, tag = "4")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "lighthouse_version")]
    pub lighthouse_version: String,

    #[prost(message, optional, tag = "5")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    /// Deprecated duplicate of `environment.hostUserAgent`.
    #[prost(string, tag = "6")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "user_agent")]
    pub user_agent: String,

    #[prost(message, optional, tag = "8")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "runtime_error")]
    pub runtime_error: Option<RuntimeError>,

    /// Audit results keyed by audit id.
    #[prost(btree_map = "string, message", tag = "9")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "json::nullable")]
    pub audits: BTreeMap<String, AuditResult>,

    /// Categories keyed by category id.
    #[prost(btree_map = "string, message", tag = "10")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "json::nullable")]
    pub categories: BTreeMap<String, LhrCategory>,

    #[prost(btree_map = "string, message", tag = "11")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "category_groups")]
    pub category_groups: BTreeMap<String, CategoryGroup>,

    #[prost(message, optional, tag = "12")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "config_settings")]
    pub config_settings: Option<ConfigSettings>,

    #[prost(string, repeated, tag = "13")]
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "run_warnings")]
    pub run_warnings: Vec<String>,

    #[prost(message, optional, tag = "14")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,

    #[prost(message, optional, tag = "15")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18n>,

    #[prost(message, repeated, tag = "16")]
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "stack_packs")]
    pub stack_packs: Vec<StackPack>,
}

/// Host and network environment of the run.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Environment {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "network_user_agent")]
    pub network_user_agent: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "host_user_agent")]
    pub host_user_agent: String,

    /// CPU benchmark of the host machine.
    #[prost(double, tag = "3")]
    #[serde(skip_serializing_if = "json::is_default", with = "json::double")]
    #[serde(alias = "benchmark_index")]
    pub benchmark_index: f64,
}

/// Fatal error that kept the run from producing reliable results.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RuntimeError {
    #[prost(enumeration = "LighthouseError", tag = "1")]
    #[serde(
        skip_serializing_if = "json::is_default",
        serialize_with = "json::enumeration::serialize::<LighthouseError, _>",
        deserialize_with = "json::enumeration::deserialize::<LighthouseError, _>"
    )]
    pub code: i32,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub message: String,
}

/// Result of a single audit.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AuditResult {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub id: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub title: String,

    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub description: String,

    /// Score in `[0, 1]`; unset for audits without a score.
    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none", with = "json::wrapped_double")]
    pub score: Option<f64>,

    #[prost(enumeration = "ScoreDisplayMode", tag = "5")]
    #[serde(
        skip_serializing_if = "json::is_default",
        serialize_with = "json::enumeration::serialize::<ScoreDisplayMode, _>",
        deserialize_with = "json::enumeration::deserialize::<ScoreDisplayMode, _>"
    )]
    #[serde(alias = "score_display_mode")]
    pub score_display_mode: i32,

    #[prost(string, tag = "6")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "display_value")]
    pub display_value: String,

    #[prost(string, tag = "7")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub explanation: String,

    #[prost(string, tag = "8")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "error_message")]
    pub error_message: String,

    /// Free-form details (tables, opportunities, screenshots).
    #[prost(message, optional, tag = "9")]
    #[serde(with = "json::structure", skip_serializing_if = "Option::is_none")]
    pub details: Option<::prost_types::Struct>,

    /// Either a list of strings or an arbitrary value.
    #[prost(message, optional, tag = "10")]
    #[serde(with = "json::value", skip_serializing_if = "Option::is_none")]
    pub warnings: Option<::prost_types::Value>,

    #[prost(message, optional, tag = "11")]
    #[serde(skip_serializing_if = "Option::is_none", with = "json::wrapped_double")]
    #[serde(alias = "numeric_value")]
    pub numeric_value: Option<f64>,

    #[prost(string, tag = "12")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "numeric_unit")]
    pub numeric_unit: String,
}

/// A category and the audits that feed its score.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LhrCategory {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub id: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub title: String,

    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub description: String,

    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none", with = "json::wrapped_double")]
    pub score: Option<f64>,

    #[prost(string, tag = "5")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "manual_description")]
    pub manual_description: String,

    #[prost(message, repeated, tag = "6")]
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "audit_refs")]
    pub audit_refs: Vec<AuditRef>,
}

/// Reference from a category to one of its audits.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AuditRef {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub id: String,

    #[prost(double, tag = "2")]
    #[serde(skip_serializing_if = "json::is_default", with = "json::double")]
    pub weight: f64,

    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub group: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryGroup {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub title: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub description: String,
}

/// The subset of run settings that survives preprocessing.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigSettings {
    #[prost(enumeration = "EmulatedFormFactor", tag = "1")]
    #[serde(
        skip_serializing_if = "json::is_default",
        serialize_with = "json::enumeration::serialize::<EmulatedFormFactor, _>",
        deserialize_with = "json::enumeration::deserialize::<EmulatedFormFactor, _>"
    )]
    #[serde(alias = "emulated_form_factor")]
    pub emulated_form_factor: i32,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub locale: String,

    /// `null` or a list of category ids; kept as a `Value` so `null` survives.
    #[prost(message, optional, tag = "3")]
    #[serde(with = "json::value", skip_serializing_if = "Option::is_none")]
    #[serde(alias = "only_categories")]
    pub only_categories: Option<::prost_types::Value>,

    #[prost(string, tag = "4")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub channel: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Timing {
    /// Total duration of the run in milliseconds.
    #[prost(double, tag = "1")]
    #[serde(skip_serializing_if = "json::is_default", with = "json::double")]
    pub total: f64,

    #[prost(message, repeated, tag = "2")]
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "json::nullable")]
    pub entries: Vec<TimingEntry>,
}

/// One `performance.measure` entry recorded during the run.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TimingEntry {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub name: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "entry_type")]
    pub entry_type: String,

    #[prost(double, tag = "3")]
    #[serde(skip_serializing_if = "json::is_default", with = "json::double")]
    #[serde(alias = "start_time")]
    pub start_time: f64,

    #[prost(double, tag = "4")]
    #[serde(skip_serializing_if = "json::is_default", with = "json::double")]
    pub duration: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct I18n {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "renderer_formatted_strings")]
    pub renderer_formatted_strings: Option<RendererFormattedStrings>,
}

/// Localized strings the report renderer needs.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RendererFormattedStrings {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "varies_between_runs")]
    pub varies_between_runs: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "error_missing_audit_info")]
    pub error_missing_audit_info: String,

    #[prost(string, tag = "3")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "error_label")]
    pub error_label: String,

    #[prost(string, tag = "4")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "warning_header")]
    pub warning_header: String,

    #[prost(string, tag = "5")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "audit_group_expand_tooltip")]
    pub audit_group_expand_tooltip: String,

    #[prost(string, tag = "6")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "passed_audits_group_title")]
    pub passed_audits_group_title: String,

    #[prost(string, tag = "7")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "not_applicable_audits_group_title")]
    pub not_applicable_audits_group_title: String,

    #[prost(string, tag = "8")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "manual_audits_group_title")]
    pub manual_audits_group_title: String,

    #[prost(string, tag = "9")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "toplevel_warnings_message")]
    pub toplevel_warnings_message: String,

    #[prost(string, tag = "10")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "scorescale_label")]
    pub scorescale_label: String,

    #[prost(string, tag = "11")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "crc_longest_duration_label")]
    pub crc_longest_duration_label: String,

    #[prost(string, tag = "12")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "crc_initial_navigation")]
    pub crc_initial_navigation: String,

    #[prost(string, tag = "13")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "ls_performance_category_description")]
    pub ls_performance_category_description: String,

    #[prost(string, tag = "14")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "lab_data_title")]
    pub lab_data_title: String,

    #[prost(string, tag = "15")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "warning_audits_group_title")]
    pub warning_audits_group_title: String,

    #[prost(string, tag = "16")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "opportunity_resource_column_label")]
    pub opportunity_resource_column_label: String,

    #[prost(string, tag = "17")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "opportunity_savings_column_label")]
    pub opportunity_savings_column_label: String,

    #[prost(string, tag = "18")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    #[serde(alias = "third_party_resources_label")]
    pub third_party_resources_label: String,
}

/// Framework-specific advice attached to the report.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StackPack {
    #[prost(string, tag = "1")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub id: String,

    #[prost(string, tag = "2")]
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "json::nullable")]
    pub title: String,

    #[prost(string, tag = "3")]
    #[serde(
        rename = "iconDataURL",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "json::nullable"
    )]
    #[serde(alias = "icon_data_URL", alias = "icon_data_url")]
    pub icon_data_url: String,

    /// Advice keyed by audit id.
    #[prost(btree_map = "string, string", tag = "4")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "json::nullable")]
    pub descriptions: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_absent_fields_take_defaults() {
        let lhr: LighthouseResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(lhr, LighthouseResult::default());
    }

    #[test]
    fn test_null_reads_as_default() {
        let lhr: LighthouseResult = serde_json::from_value(json!({
            "finalUrl": null,
            "audits": null,
            "runWarnings": null,
            "timing": null
        }))
        .unwrap();
        assert_eq!(lhr, LighthouseResult::default());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_double_accepts_strings_and_null() {
        let timing: Timing = serde_json::from_value(json!({
            "total": "Infinity",
            "entries": [{"startTime": null, "duration": "2.5"}]
        }))
        .unwrap();
        assert_eq!(timing.total, f64::INFINITY);
        assert_eq!(timing.entries[0].start_time, 0.0);
        assert_eq!(timing.entries[0].duration, 2.5);

        let audit: AuditResult =
            serde_json::from_value(json!({"score": "-Infinity", "numeric_value": "0"})).unwrap();
        assert_eq!(audit.score, Some(f64::NEG_INFINITY));
        assert_eq!(audit.numeric_value, Some(0.0));
        assert!(serde_json::to_value(&audit).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = serde_json::from_value::<LighthouseResult>(json!({"lighthouseVersion": "9.0.0", "bogus": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field `bogus`"), "{err}");
    }

    #[test]
    fn test_unknown_nested_field_is_rejected() {
        let err = serde_json::from_value::<LighthouseResult>(json!({
            "audits": {"viewport": {"id": "viewport", "rawValue": true}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("rawValue"), "{err}");
    }

    #[test]
    fn test_enum_by_name_and_number() {
        let audit: AuditResult =
            serde_json::from_value(json!({"scoreDisplayMode": "notApplicable"})).unwrap();
        assert_eq!(audit.score_display_mode(), ScoreDisplayMode::NotApplicable);

        let audit: AuditResult = serde_json::from_value(json!({"scoreDisplayMode": 2})).unwrap();
        assert_eq!(audit.score_display_mode(), ScoreDisplayMode::Binary);

        let err = serde_json::from_value::<AuditResult>(json!({"scoreDisplayMode": "not-applicable"}))
            .unwrap_err();
        assert!(err.to_string().contains("ScoreDisplayMode"), "{err}");
    }

    #[test]
    fn test_only_categories_null_is_kept() {
        let settings: ConfigSettings =
            serde_json::from_value(json!({"locale": "en-US", "onlyCategories": null})).unwrap();
        assert!(settings.only_categories.is_some());
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"locale": "en-US", "onlyCategories": null})
        );
    }

    #[test]
    fn test_defaults_are_omitted() {
        let audit = AuditResult {
            id: "viewport".to_string(),
            score: Some(0.0),
            ..AuditResult::default()
        };
        // A set wrapper survives even at zero; plain defaults do not.
        assert_eq!(
            serde_json::to_value(&audit).unwrap(),
            json!({"id": "viewport", "score": 0.0})
        );
    }

    #[test]
    fn test_set_empty_message_is_emitted() {
        let lhr = LighthouseResult {
            i18n: Some(I18n::default()),
            ..LighthouseResult::default()
        };
        assert_eq!(serde_json::to_value(&lhr).unwrap(), json!({"i18n": {}}));
    }

    #[test]
    fn test_details_must_be_an_object() {
        let err = serde_json::from_value::<AuditResult>(json!({"details": [1, 2]})).unwrap_err();
        assert!(err.to_string().contains("google.protobuf.Struct"), "{err}");
    }
}
