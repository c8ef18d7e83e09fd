//! Rule registry for configuration-driven rule selection.

use crate::{CrossoverConfig, CrossoverRule, OscillatorConfig, OscillatorRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tradebot_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
};
use tracing::debug;

/// Information about a registered rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub name: String,
    /// Rule description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the built-in signal rules.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a registry with every built-in rule.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        strategies.insert(
            "crossover".to_string(),
            StrategyInfo {
                name: "crossover".to_string(),
                description: CrossoverRule::default().description().to_string(),
                default_config: serde_json::to_value(CrossoverConfig::default())
                    .unwrap_or(serde_json::Value::Null),
            },
        );

        strategies.insert(
            "oscillator".to_string(),
            StrategyInfo {
                name: "oscillator".to_string(),
                description: OscillatorRule::default().description().to_string(),
                default_config: serde_json::to_value(OscillatorConfig::default())
                    .unwrap_or(serde_json::Value::Null),
            },
        );

        Self { strategies }
    }

    /// List all available rules, ordered by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get rule info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a rule exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Create a rule instance from configuration.
    ///
    /// A `null` config selects the defaults; missing fields fall back to
    /// their defaults as well.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn SignalRule>, StrategyError> {
        let config = if config.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            config
        };

        let rule: Box<dyn SignalRule> = match name {
            "crossover" => {
                let config: CrossoverConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Box::new(CrossoverRule::new(config))
            }
            "oscillator" => {
                let config: OscillatorConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                Box::new(OscillatorRule::new(config))
            }
            _ => return Err(StrategyError::NotFound(name.to_string())),
        };

        debug!(rule = rule.name(), "Signal rule created");
        Ok(rule)
    }

    /// Create a rule with default configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn SignalRule>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
