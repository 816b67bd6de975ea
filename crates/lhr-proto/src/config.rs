//! Path configuration for a round-trip run.
//!
//! Every path the pipeline touches lives in [`RoundTripConfig`], resolved
//! once at startup against an explicit root directory. Nothing is resolved
//! against the process working directory.
//!
//! A config file is TOML; relative paths in it resolve against the file's
//! own directory:
//!
//! ```toml
//! sample = "fixtures/sample_v2.json"
//! preprocessed = "proto/sample_v2_processed.json"
//! round_trip = "proto/sample_v2_round_trip.json"
//!
//! [preprocessor]
//! program = "node"
//! args = ["lighthouse-core/lib/proto-preprocessor.js"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location of the canonical sample, relative to the root.
pub const DEFAULT_SAMPLE: &str = "fixtures/sample_v2.json";

/// Default location of the preprocessed artifact, relative to the root.
pub const DEFAULT_PREPROCESSED: &str = "proto/sample_v2_processed.json";

/// Default location of the round-tripped artifact, relative to the root.
pub const DEFAULT_ROUND_TRIP: &str = "proto/sample_v2_round_trip.json";

/// Name of the bundled preprocessor binary.
pub const DEFAULT_PREPROCESSOR: &str = "lhr-preprocess";

/// Paths and programs used by one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundTripConfig {
    /// Canonical sample report (read only).
    #[serde(default = "default_sample")]
    pub sample: PathBuf,

    /// Preprocessed artifact, rewritten every run.
    #[serde(default = "default_preprocessed")]
    pub preprocessed: PathBuf,

    /// Round-tripped artifact, rewritten every run.
    #[serde(default = "default_round_trip")]
    pub round_trip: PathBuf,

    /// External preprocessor invocation.
    #[serde(default)]
    pub preprocessor: PreprocessorConfig,
}

/// How to invoke the external preprocessor.
///
/// The pipeline runs `program args... --in=<sample> --out=<preprocessed>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// Program to execute. A bare name is looked up on `PATH`; anything with
    /// a path separator resolves against the root.
    #[serde(default = "default_preprocessor")]
    pub program: PathBuf,

    /// Arguments placed before `--in`/`--out`.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_sample() -> PathBuf {
    PathBuf::from(DEFAULT_SAMPLE)
}

fn default_preprocessed() -> PathBuf {
    PathBuf::from(DEFAULT_PREPROCESSED)
}

fn default_round_trip() -> PathBuf {
    PathBuf::from(DEFAULT_ROUND_TRIP)
}

fn default_preprocessor() -> PathBuf {
    PathBuf::from(DEFAULT_PREPROCESSOR)
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            program: default_preprocessor(),
            args: Vec::new(),
        }
    }
}

impl Default for RoundTripConfig {
    fn default() -> Self {
        Self {
            sample: default_sample(),
            preprocessed: default_preprocessed(),
            round_trip: default_round_trip(),
            preprocessor: PreprocessorConfig::default(),
        }
    }
}

impl RoundTripConfig {
    /// Default configuration resolved against `root`.
    #[must_use]
    pub fn rooted_at(root: &Path) -> Self {
        Self::default().resolve(root)
    }

    /// Load configuration from a TOML file, resolving relative paths against
    /// the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::from_toml(&content)?.resolve(root))
    }

    /// Parse configuration from a TOML string. Paths are left unresolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, names unknown keys, or leaves
    /// a path empty.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects empty paths and an empty program.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("sample", &self.sample),
            ("preprocessed", &self.preprocessed),
            ("round_trip", &self.round_trip),
            ("preprocessor.program", &self.preprocessor.program),
        ];
        for (key, path) in checks {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.preprocessed == self.round_trip {
            return Err(ConfigError::Validation(
                "preprocessed and round_trip must be different paths".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves every relative path against `root`.
    #[must_use]
    pub fn resolve(mut self, root: &Path) -> Self {
        self.sample = root.join(&self.sample);
        self.preprocessed = root.join(&self.preprocessed);
        self.round_trip = root.join(&self.round_trip);
        if self.preprocessor.program.components().count() > 1 {
            self.preprocessor.program = root.join(&self.preprocessor.program);
        }
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RoundTripConfig::from_toml("").unwrap();
        assert_eq!(config, RoundTripConfig::default());
        assert_eq!(config.preprocessor.program, PathBuf::from("lhr-preprocess"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            sample = "lighthouse-core/test/results/sample_v2.json"
            preprocessed = "proto/scripts/sample_v2_processed.json"
            round_trip = "proto/sample_v2_round_trip.json"

            [preprocessor]
            program = "node"
            args = ["lighthouse-core/lib/proto-preprocessor.js"]
        "#;
        let config = RoundTripConfig::from_toml(toml).unwrap();
        assert_eq!(config.preprocessor.program, PathBuf::from("node"));
        assert_eq!(
            config.preprocessor.args,
            vec!["lighthouse-core/lib/proto-preprocessor.js".to_string()]
        );
        assert_eq!(
            config.sample,
            PathBuf::from("lighthouse-core/test/results/sample_v2.json")
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = RoundTripConfig::from_toml("samples = \"x.json\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = RoundTripConfig::from_toml("round_trip = \"\"").unwrap_err();
        assert!(err.to_string().contains("round_trip"), "{err}");
    }

    #[test]
    fn test_same_output_paths_are_rejected() {
        let err = RoundTripConfig::from_toml("preprocessed = \"a.json\"\nround_trip = \"a.json\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err}");
    }

    #[test]
    fn test_resolve_against_root() {
        let config = RoundTripConfig::rooted_at(Path::new("/repo"));
        assert_eq!(config.sample, PathBuf::from("/repo/fixtures/sample_v2.json"));
        assert_eq!(
            config.round_trip,
            PathBuf::from("/repo/proto/sample_v2_round_trip.json")
        );
        // Bare program names stay on PATH lookup.
        assert_eq!(config.preprocessor.program, PathBuf::from("lhr-preprocess"));

        let mut config = RoundTripConfig::default();
        config.preprocessor.program = PathBuf::from("scripts/preprocess.sh");
        let config = config.resolve(Path::new("/repo"));
        assert_eq!(
            config.preprocessor.program,
            PathBuf::from("/repo/scripts/preprocess.sh")
        );
    }

    #[test]
    fn test_from_file_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.toml");
        std::fs::write(&path, "sample = \"in.json\"\n").unwrap();
        let config = RoundTripConfig::from_file(&path).unwrap();
        assert_eq!(config.sample, dir.path().join("in.json"));
        assert_eq!(config.preprocessed, dir.path().join(DEFAULT_PREPROCESSED));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RoundTripConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(RoundTripConfig::from_toml(&text).unwrap(), config);
    }
}
