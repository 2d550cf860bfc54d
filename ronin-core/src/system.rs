//! Application bootstrap.
//!
//! The host builds its [`Services`] once, hands them over with the rules
//! constants, and gets back a ready [`RulesEngine`]. Nothing is looked up
//! afterwards.

use crate::config::{ConfigError, RulesConfig};
use crate::host::Services;
use crate::rules::RulesEngine;
use std::path::Path;

/// A bootstrapped RONIN system.
pub struct RoninSystem {
    engine: RulesEngine,
}

impl RoninSystem {
    /// Validate the configuration and wire the engine.
    pub fn bootstrap(services: Services, config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            check_die = config.check_die,
            ability_dr = config.ability_dr,
            solo = services.settings.use_solo_rules(),
            "RONIN system ready"
        );
        Ok(Self {
            engine: RulesEngine::new(services, config),
        })
    }

    /// Bootstrap with rules constants read from a JSON file.
    pub async fn bootstrap_from_file(
        services: Services,
        path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let config = RulesConfig::load_json(path).await?;
        Self::bootstrap(services, config)
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    pub fn config(&self) -> &RulesConfig {
        self.engine.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HonorBounds, StaticSettings};
    use crate::host::RngDiceRoller;
    use crate::testing::InMemoryHost;
    use std::sync::Arc;

    fn services() -> Services {
        Services::from_host(
            Arc::new(InMemoryHost::new()),
            Arc::new(RngDiceRoller::seeded(7)),
            Arc::new(StaticSettings::default()),
        )
    }

    #[test]
    fn test_bootstrap_with_defaults() {
        let system = RoninSystem::bootstrap(services(), RulesConfig::default()).unwrap();
        assert_eq!(system.config().ability_dr, 10);
        assert!(!system.engine().services().settings.use_solo_rules());
    }

    #[test]
    fn test_bootstrap_rejects_inverted_honor() {
        let config = RulesConfig::default().with_honor_bounds(HonorBounds {
            min: 20,
            max: 1,
            ..HonorBounds::default()
        });
        assert!(matches!(
            RoninSystem::bootstrap(services(), config),
            Err(ConfigError::InvalidHonorBounds { .. })
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_from_missing_file() {
        let result = RoninSystem::bootstrap_from_file(services(), "/nonexistent/ronin.json").await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
