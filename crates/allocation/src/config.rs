//! Allocation settings.
//!
//! Defaults suit a typical storefront; a JSON document or `SHIPFORGE_*`
//! environment variables override them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shipforge_core::Weight;

/// Default package weight limit: 150 kg.
pub const DEFAULT_WEIGHT_THRESHOLD_GRAMS: u64 = 150_000;

pub const ENV_SPLIT_BY_CATEGORY: &str = "SHIPFORGE_SPLIT_BY_CATEGORY";
pub const ENV_SPLIT_BACKORDERS: &str = "SHIPFORGE_SPLIT_BACKORDERS";
pub const ENV_WEIGHT_THRESHOLD: &str = "SHIPFORGE_WEIGHT_THRESHOLD_GRAMS";
pub const ENV_FRONTEND_ONLY: &str = "SHIPFORGE_FRONTEND_ONLY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub split_by_shipping_category: bool,
    pub split_backorders: bool,
    /// `None` disables weight splitting.
    pub weight_threshold_grams: Option<u64>,
    /// Hide back-end-only shipping methods from estimates.
    pub frontend_only: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            split_by_shipping_category: true,
            split_backorders: true,
            weight_threshold_grams: Some(DEFAULT_WEIGHT_THRESHOLD_GRAMS),
            frontend_only: true,
        }
    }
}

impl AllocationConfig {
    pub fn weight_threshold(&self) -> Option<Weight> {
        self.weight_threshold_grams.map(Weight::from_grams)
    }

    /// Overlay process environment variables on `self`.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Overlay values from `lookup` (an environment or any key/value source).
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_SPLIT_BY_CATEGORY) {
            self.split_by_shipping_category = parse_bool(ENV_SPLIT_BY_CATEGORY, &v)?;
        }
        if let Some(v) = lookup(ENV_SPLIT_BACKORDERS) {
            self.split_backorders = parse_bool(ENV_SPLIT_BACKORDERS, &v)?;
        }
        if let Some(v) = lookup(ENV_WEIGHT_THRESHOLD) {
            self.weight_threshold_grams = parse_threshold(&v)?;
        }
        if let Some(v) = lookup(ENV_FRONTEND_ONLY) {
            self.frontend_only = parse_bool(ENV_FRONTEND_ONLY, &v)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject settings no source may produce, whichever way they were loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weight_threshold_grams == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "weight_threshold_grams",
                value: "0".to_string(),
                reason: "threshold must be positive",
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a boolean",
        }),
    }
}

fn parse_threshold(value: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("off") || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: ENV_WEIGHT_THRESHOLD,
            value: value.to_string(),
            reason: "threshold must be positive",
        }),
        Ok(grams) => Ok(Some(grams)),
        Err(_) => Err(ConfigError::InvalidValue {
            key: ENV_WEIGHT_THRESHOLD,
            value: value.to_string(),
            reason: "expected grams or \"off\"",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AllocationConfig::default();
        assert!(config.split_by_shipping_category);
        assert!(config.split_backorders);
        assert!(config.frontend_only);
        assert_eq!(config.weight_threshold(), Some(Weight::from_kilograms(150)));
    }

    #[test]
    fn overlay_reads_every_key() {
        let config = AllocationConfig::default()
            .overlay(lookup(&[
                (ENV_SPLIT_BY_CATEGORY, "no"),
                (ENV_SPLIT_BACKORDERS, "0"),
                (ENV_WEIGHT_THRESHOLD, "off"),
                (ENV_FRONTEND_ONLY, "FALSE"),
            ]))
            .unwrap();
        assert_eq!(
            config,
            AllocationConfig {
                split_by_shipping_category: false,
                split_backorders: false,
                weight_threshold_grams: None,
                frontend_only: false,
            }
        );
    }

    #[test]
    fn overlay_rejects_garbage() {
        let err = AllocationConfig::default()
            .overlay(lookup(&[(ENV_WEIGHT_THRESHOLD, "heavy")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_WEIGHT_THRESHOLD));

        assert!(AllocationConfig::default()
            .overlay(lookup(&[(ENV_WEIGHT_THRESHOLD, "0")]))
            .is_err());
        assert!(AllocationConfig::default()
            .overlay(lookup(&[(ENV_FRONTEND_ONLY, "maybe")]))
            .is_err());
    }

    #[test]
    fn zero_threshold_from_json_is_rejected() {
        let config: AllocationConfig =
            serde_json::from_str(r#"{"weight_threshold_grams": 0}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "weight_threshold_grams", .. })
        ));
        assert!(config.overlay(|_| None).is_err());
    }

    #[test]
    fn environment_overrides_a_loaded_config() {
        let loaded = AllocationConfig {
            split_backorders: false,
            ..AllocationConfig::default()
        };
        let config = loaded
            .overlay(lookup(&[(ENV_WEIGHT_THRESHOLD, "off")]))
            .unwrap();
        assert!(!config.split_backorders);
        assert_eq!(config.weight_threshold_grams, None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AllocationConfig =
            serde_json::from_str(r#"{"weight_threshold_grams": 20000}"#).unwrap();
        assert_eq!(config.weight_threshold_grams, Some(20_000));
        assert!(config.split_backorders);
    }
}
