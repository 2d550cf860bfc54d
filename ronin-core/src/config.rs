//! Rule constants and host toggles.

use crate::host::Settings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading a rules file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid honor bounds: min {min} > max {max}")]
    InvalidHonorBounds { min: i32, max: i32 },
}

/// Honor range and the dishonor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HonorBounds {
    pub min: i32,
    pub max: i32,
    /// Values at or below this are dishonored.
    pub dishonor_threshold: i32,
}

impl Default for HonorBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: 20,
            dishonor_threshold: 9,
        }
    }
}

impl HonorBounds {
    pub fn clamp(&self, honor: i32) -> i32 {
        honor.clamp(self.min, self.max)
    }

    pub fn is_dishonored(&self, honor: i32) -> bool {
        honor <= self.dishonor_threshold
    }
}

/// Names of the roll tables the procedures draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub moral: String,
    pub injuries: String,
    pub kamis_revenge: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            moral: "Moral".to_string(),
            injuries: "Debilitating Injuries".to_string(),
            kamis_revenge: "Kami's Revenge".to_string(),
        }
    }
}

/// Every constant the roll procedures use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Sides of the check die.
    pub check_die: u32,
    pub ability_dr: i32,
    pub attack_dr: i32,
    pub text_dr: i32,
    pub haiku_dr: i32,
    pub seppuku_spirit_dr: i32,
    pub seppuku_resilience_dr: i32,
    /// Character max HP is `base_hp + vigor + resilience`.
    pub base_hp: i32,
    pub honor: HonorBounds,
    /// Overencumbered at `capacity >= vigor + encumbrance_base`.
    pub encumbrance_base: i32,
    pub encumbrance_penalty: i32,
    /// Armor at or above this max category blocks text use.
    pub heavy_armor_category: u8,
    pub default_moral: i32,
    pub tables: TableNames,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            check_die: 20,
            ability_dr: 10,
            attack_dr: 12,
            text_dr: 12,
            haiku_dr: 12,
            seppuku_spirit_dr: 12,
            seppuku_resilience_dr: 14,
            base_hp: 10,
            honor: HonorBounds::default(),
            encumbrance_base: 8,
            encumbrance_penalty: 2,
            heavy_armor_category: 2,
            default_moral: 12,
            tables: TableNames::default(),
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.honor.min > self.honor.max {
            return Err(ConfigError::InvalidHonorBounds {
                min: self.honor.min,
                max: self.honor.max,
            });
        }
        Ok(())
    }

    pub fn with_ability_dr(mut self, dr: i32) -> Self {
        self.ability_dr = dr;
        self
    }

    pub fn with_attack_dr(mut self, dr: i32) -> Self {
        self.attack_dr = dr;
        self
    }

    pub fn with_honor_bounds(mut self, honor: HonorBounds) -> Self {
        self.honor = honor;
        self
    }

    pub fn with_encumbrance(mut self, base: i32, penalty: i32) -> Self {
        self.encumbrance_base = base;
        self.encumbrance_penalty = penalty;
        self
    }
}

/// Plain in-memory settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSettings {
    pub use_solo_rules: bool,
    pub deduct_consumables: bool,
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self {
            use_solo_rules: false,
            deduct_consumables: true,
        }
    }
}

impl StaticSettings {
    pub fn with_solo_rules(mut self, enabled: bool) -> Self {
        self.use_solo_rules = enabled;
        self
    }

    pub fn with_consumable_deduction(mut self, enabled: bool) -> Self {
        self.deduct_consumables = enabled;
        self
    }
}

impl Settings for StaticSettings {
    fn use_solo_rules(&self) -> bool {
        self.use_solo_rules
    }

    fn deduct_consumables(&self) -> bool {
        self.deduct_consumables
    }
}
