//! JSON configuration for strategies.
//!
//! ```rust
//! use holdem_ai::ai::StrategyConfig;
//!
//! let config = StrategyConfig::from_json(
//!     r#"{"type": "v2", "personality": {"tightness": 0.7}, "seed": 42}"#,
//! )
//! .unwrap();
//! let strategy = config.build();
//! ```
//!
//! Every personality setting left out is neutral (0.5). `from_str_or_file`
//! reads a file when one exists at the given path and parses the text as
//! inline JSON otherwise.

use std::{io::ErrorKind, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Strategy, StrategyKind, V2Strategy};
use crate::ai::hand_selection::HandSelectionScheme;
use crate::ai::rule_engine::{AccumulationPolicy, Personality};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Weighted rules with opponent modelling.
    V2 {
        #[serde(default)]
        personality: Personality,
        /// How rule contributions to one outcome are combined.
        #[serde(default)]
        accumulation: AccumulationPolicy,
        /// Draw from the outcome mix instead of always taking the strongest.
        #[serde(default = "default_randomize")]
        randomize: bool,
        /// Starting hand groups to use instead of the bias tables.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hand_selection: Option<HandSelectionScheme>,
        /// Seed for bet sizing and randomized choices. Seeded from the OS
        /// when missing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

fn default_randomize() -> bool {
    true
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::V2 {
            personality: Personality::default(),
            accumulation: AccumulationPolicy::default(),
            randomize: default_randomize(),
            hand_selection: None,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StrategyConfigError {
    #[error("Invalid personality setting {name}: {value} (must be between 0.0 and 1.0)")]
    InvalidSetting { name: &'static str, value: f32 },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl StrategyConfig {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::V2 { .. } => StrategyKind::V2,
        }
    }

    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        match self {
            StrategyConfig::V2 {
                personality,
                hand_selection,
                ..
            } => {
                for (name, value) in personality.settings() {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(StrategyConfigError::InvalidSetting { name, value });
                    }
                }
                if let Some(scheme) = hand_selection {
                    if !scheme.has_groups() {
                        return Err(StrategyConfigError::ValidationError(format!(
                            "hand selection scheme {:?} has no hands",
                            scheme.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, StrategyConfigError> {
        let config: StrategyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StrategyConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Try `input` as a path first, then as inline JSON.
    pub fn from_str_or_file(input: &str) -> Result<Self, StrategyConfigError> {
        match Self::from_file(input) {
            Ok(config) => Ok(config),
            Err(StrategyConfigError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
                Self::from_json(input)
            }
            Err(err) => Err(err),
        }
    }

    pub fn to_json(&self) -> Result<String, StrategyConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A fresh strategy playing this configuration.
    pub fn build(&self) -> Box<dyn Strategy> {
        match self {
            StrategyConfig::V2 {
                personality,
                accumulation,
                randomize,
                hand_selection,
                seed,
            } => Box::new(
                V2Strategy::new(*personality, *seed)
                    .with_accumulation(*accumulation)
                    .with_randomize(*randomize)
                    .with_hand_selection(hand_selection.clone()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = StrategyConfig::from_json(r#"{"type": "v2"}"#).unwrap();
        assert_eq!(StrategyConfig::default(), config);
        assert_eq!(StrategyKind::V2, config.kind());
    }

    #[test]
    fn test_partial_personality() {
        let json = r#"{
            "type": "v2",
            "personality": {"tightness": 0.8, "aggression": 0.2},
            "accumulation": "weighted_mean",
            "randomize": false,
            "seed": 7
        }"#;
        let StrategyConfig::V2 {
            personality,
            accumulation,
            randomize,
            hand_selection,
            seed,
        } = StrategyConfig::from_json(json).unwrap();
        assert_eq!(0.8, personality.tightness);
        assert_eq!(0.2, personality.aggression);
        assert_eq!(0.5, personality.tilt);
        assert_eq!(AccumulationPolicy::WeightedMean, accumulation);
        assert!(!randomize);
        assert!(hand_selection.is_none());
        assert_eq!(Some(7), seed);
    }

    #[test]
    fn test_out_of_range_setting() {
        let err = StrategyConfig::from_json(r#"{"type": "v2", "personality": {"tilt": 1.5}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            StrategyConfigError::InvalidSetting { name: "tilt", .. }
        ));
    }

    #[test]
    fn test_unknown_type() {
        let err = StrategyConfig::from_json(r#"{"type": "v1"}"#).unwrap_err();
        assert!(matches!(err, StrategyConfigError::JsonError(_)));
    }

    #[test]
    fn test_empty_hand_selection_rejected() {
        let json = r#"{"type": "v2", "hand_selection": {"name": "nothing"}}"#;
        let err = StrategyConfig::from_json(json).unwrap_err();
        assert!(matches!(err, StrategyConfigError::ValidationError(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = StrategyConfig::V2 {
            personality: Personality {
                steal_blinds: 0.9,
                ..Default::default()
            },
            accumulation: AccumulationPolicy::Max,
            randomize: false,
            hand_selection: None,
            seed: Some(3),
        };
        let json = config.to_json().unwrap();
        assert_eq!(config, StrategyConfig::from_json(&json).unwrap());
    }

    #[test]
    fn test_from_str_or_file() {
        let inline = StrategyConfig::from_str_or_file(r#"{"type": "v2", "seed": 1}"#).unwrap();
        assert!(matches!(inline, StrategyConfig::V2 { seed: Some(1), .. }));

        let path = std::env::temp_dir().join(format!(
            "holdem_ai_strategy_{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{"type": "v2", "seed": 2}"#).unwrap();
        drop(file);

        let from_file = StrategyConfig::from_str_or_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(from_file, StrategyConfig::V2 { seed: Some(2), .. }));
    }
}
