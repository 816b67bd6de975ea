//! Enumerations of the `LighthouseResult` schema.
//!
//! The proto3 JSON mapping spells enum values by their declared name, so every
//! enum here implements [`JsonEnum`] alongside `prost::Enumeration`. Some of
//! the declared names are lowerCamelCase (`notApplicable`, `mobile`) because
//! that is what the report itself carries.

/// Name lookup for enums that appear in JSON by value name.
pub trait JsonEnum: Sized + Copy + Into<i32> + TryFrom<i32> {
    /// Schema name of the enum, used in error messages.
    const TYPE_NAME: &'static str;

    /// Returns the declared value name.
    fn as_json_name(self) -> &'static str;

    /// Looks up a value by its declared name.
    fn from_json_name(name: &str) -> Option<Self>;
}

macro_rules! json_enum {
    ($ty:ident, $type_name:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl JsonEnum for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn as_json_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            fn from_json_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

/// How an audit's score should be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ScoreDisplayMode {
    Unspecified = 0,
    Numeric = 1,
    Binary = 2,
    Manual = 3,
    Informative = 4,
    NotApplicable = 5,
    Error = 6,
}

json_enum!(ScoreDisplayMode, "lighthouse.AuditResult.ScoreDisplayMode", {
    Unspecified => "SCORE_DISPLAY_MODE_UNSPECIFIED",
    Numeric => "numeric",
    Binary => "binary",
    Manual => "manual",
    Informative => "informative",
    NotApplicable => "notApplicable",
    Error => "error",
});

/// Device form factor the run emulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EmulatedFormFactor {
    UnknownFormFactor = 0,
    Mobile = 1,
    Desktop = 2,
    None = 3,
}

json_enum!(EmulatedFormFactor, "lighthouse.ConfigSettings.EmulatedFormFactor", {
    UnknownFormFactor => "UNKNOWN_FORM_FACTOR",
    Mobile => "mobile",
    Desktop => "desktop",
    None => "none",
});

/// Top-level runtime error codes.
///
/// `NoError` is the zero value, so a run without an error carries no
/// `runtimeError` at all once it has been through the schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LighthouseError {
    NoError = 0,
    UnknownError = 1,
    NoSpeedlineFrames = 2,
    SpeedindexOfZero = 3,
    NoScreenshots = 4,
    InvalidSpeedline = 5,
    NoTracingStarted = 6,
    NoNavstart = 7,
    NoFcp = 8,
    NoDcl = 9,
    NoDocumentRequest = 10,
    FailedDocumentRequest = 11,
    ErroredDocumentRequest = 12,
    TracingAlreadyStarted = 13,
    ParsingProblem = 14,
    ReadFailed = 15,
    InsecureDocumentRequest = 16,
    ProtocolTimeout = 17,
    PageHung = 18,
    DnsFailure = 19,
    CriTimeout = 20,
    NotHtml = 21,
    NoResourceRequest = 22,
}

json_enum!(LighthouseError, "lighthouse.LighthouseError", {
    NoError => "NO_ERROR",
    UnknownError => "UNKNOWN_ERROR",
    NoSpeedlineFrames => "NO_SPEEDLINE_FRAMES",
    SpeedindexOfZero => "SPEEDINDEX_OF_ZERO",
    NoScreenshots => "NO_SCREENSHOTS",
    InvalidSpeedline => "INVALID_SPEEDLINE",
    NoTracingStarted => "NO_TRACING_STARTED",
    NoNavstart => "NO_NAVSTART",
    NoFcp => "NO_FCP",
    NoDcl => "NO_DCL",
    NoDocumentRequest => "NO_DOCUMENT_REQUEST",
    FailedDocumentRequest => "FAILED_DOCUMENT_REQUEST",
    ErroredDocumentRequest => "ERRORED_DOCUMENT_REQUEST",
    TracingAlreadyStarted => "TRACING_ALREADY_STARTED",
    ParsingProblem => "PARSING_PROBLEM",
    ReadFailed => "READ_FAILED",
    InsecureDocumentRequest => "INSECURE_DOCUMENT_REQUEST",
    ProtocolTimeout => "PROTOCOL_TIMEOUT",
    PageHung => "PAGE_HUNG",
    DnsFailure => "DNS_FAILURE",
    CriTimeout => "CRI_TIMEOUT",
    NotHtml => "NOT_HTML",
    NoResourceRequest => "NO_RESOURCE_REQUEST",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for mode in [
            ScoreDisplayMode::Unspecified,
            ScoreDisplayMode::Numeric,
            ScoreDisplayMode::NotApplicable,
            ScoreDisplayMode::Error,
        ] {
            assert_eq!(
                ScoreDisplayMode::from_json_name(mode.as_json_name()),
                Some(mode)
            );
        }
        assert_eq!(
            LighthouseError::from_json_name("NO_DOCUMENT_REQUEST"),
            Some(LighthouseError::NoDocumentRequest)
        );
    }

    #[test]
    fn test_hyphenated_mode_is_not_a_schema_name() {
        // The preprocessor rewrites this spelling; the schema never accepts it.
        assert_eq!(ScoreDisplayMode::from_json_name("not-applicable"), None);
        assert_eq!(ScoreDisplayMode::from_json_name("not_applicable"), None);
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(ScoreDisplayMode::default(), ScoreDisplayMode::Unspecified);
        assert_eq!(EmulatedFormFactor::default(), EmulatedFormFactor::UnknownFormFactor);
        assert_eq!(LighthouseError::default(), LighthouseError::NoError);
        assert_eq!(i32::from(LighthouseError::NoError), 0);
    }
}
