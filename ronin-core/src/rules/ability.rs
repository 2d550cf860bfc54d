//! Ability checks.

use super::{outcome_verb, CheckProfile, Resolution, RulesEngine};
use crate::derived::{self, DrBreakdown};
use crate::error::{Rejection, RollError};
use crate::world::{Ability, Actor, ActorId};
use serde::{Deserialize, Serialize};

const ACTION: &str = "Ability check";

/// A request to test one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCheck {
    pub ability: Ability,
    /// Situational modifier added to the roll.
    pub modifier: i32,
    /// Base DR; the configured default when `None`.
    pub dr: Option<i32>,
}

impl AbilityCheck {
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            modifier: 0,
            dr: None,
        }
    }

    /// Build from a host-supplied ability key.
    pub fn from_key(key: &str) -> Result<Self, Rejection> {
        key.parse::<Ability>()
            .map(Self::new)
            .map_err(|_| Rejection::UnsupportedAbility {
                key: key.to_string(),
            })
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_dr(mut self, dr: i32) -> Self {
        self.dr = Some(dr);
        self
    }
}

/// Bracketed note listing DR adjustments, empty when there are none.
pub(crate) fn dr_note(dr: &DrBreakdown) -> String {
    let mut parts = Vec::new();
    if dr.encumbrance != 0 {
        parts.push(format!("encumbered +{}", dr.encumbrance));
    }
    if dr.armor != 0 {
        parts.push(format!("armor +{}", dr.armor));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}

impl RulesEngine {
    /// Roll 1d20 + ability + modifier against the DR, adjusted for
    /// encumbrance and armor.
    pub async fn ability_check(
        &self,
        actor_id: ActorId,
        check: AbilityCheck,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| {
            self.resolve_ability_check(actor, check)
        })
        .await
    }

    /// Like [`RulesEngine::ability_check`], for callers holding a raw key.
    pub async fn ability_check_by_key(
        &self,
        actor_id: ActorId,
        key: &str,
        modifier: i32,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| async move {
            let check = AbilityCheck::from_key(key)?.with_modifier(modifier);
            self.resolve_ability_check(actor, check).await
        })
        .await
    }

    async fn resolve_ability_check(
        &self,
        actor: Actor,
        check: AbilityCheck,
    ) -> Result<Resolution, RollError> {
        let base = check.dr.unwrap_or(self.config.ability_dr);
        let dr = derived::check_dr(&actor, check.ability, base, &self.config);
        let profile = CheckProfile::new(
            format!("{} check", check.ability),
            actor.ability(check.ability) + check.modifier,
            dr.total(),
        )
        .with_solo(self.services.settings.use_solo_rules());

        let mut tx = self.resources();
        let report = self.run_check(&mut tx, &profile).await?;

        let summary = format!(
            "{} {} the {} check ({} vs DR {}){}",
            actor.name,
            outcome_verb(report.classification()),
            check.ability,
            report.total(),
            dr.total(),
            dr_note(&dr)
        );
        Ok(Resolution::new(ACTION, summary)
            .for_actor(actor.id)
            .with_check(report)
            .with_effects(tx.into_effects()))
    }
}
