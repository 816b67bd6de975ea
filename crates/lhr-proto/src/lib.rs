//! lhr-proto - `LighthouseResult` protobuf schema and round-trip validator.
//!
//! Checks that a Lighthouse report (LHR) survives conversion through the
//! `LighthouseResult` protobuf schema. A run takes the canonical sample
//! report, reshapes it with a preprocessor, decodes it strictly against the
//! schema, passes it through the binary wire format, and writes the
//! re-encoded JSON in a stable canonical text form. Diffing that file against
//! the preprocessed one shows where the schema loses information.
//!
//! # Modules
//!
//! - [`schema`]: message types with prost and serde derives
//! - [`preprocess`]: raw report to schema-compatible report
//! - [`roundtrip`]: decode, wire pass, encode
//! - [`canonical`]: deterministic text form of the result
//! - [`pipeline`]: cleanup, preprocessor invocation and the full run
//! - [`config`]: where the run reads and writes
//!
//! # Example
//!
//! ```rust
//! use lhr_proto::roundtrip::round_trip;
//!
//! let rt = round_trip(r#"{"lighthouseVersion": "9.0.0", "categories": {}}"#).unwrap();
//! assert_eq!(rt.report, serde_json::json!({"lighthouseVersion": "9.0.0"}));
//! ```

pub mod canonical;
pub mod config;
pub mod error;
pub mod golden_vectors;
pub mod pipeline;
pub mod preprocess;
pub mod roundtrip;
pub mod schema;

pub use config::{ConfigError, PreprocessorConfig, RoundTripConfig};
pub use error::RoundTripError;
pub use pipeline::{CleanOutcome, RunReport, run};
pub use schema::LighthouseResult;
