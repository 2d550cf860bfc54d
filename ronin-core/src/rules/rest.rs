//! Short and long rests.

use super::{Effect, Resolution, RulesEngine};
use crate::dice::DiceExpression;
use crate::error::RollError;
use crate::resources::ResourceEngine;
use crate::world::{Ability, Actor, ActorId};
use serde::{Deserialize, Serialize};

const SHORT_REST: &str = "Short rest";
const LONG_REST: &str = "Long rest";

/// Conditions the player declares before resting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOptions {
    pub infected_or_poisoned: bool,
    /// Declared when consumables are not deducted automatically.
    pub no_food_and_water: bool,
}

impl RestOptions {
    pub fn infected(mut self) -> Self {
        self.infected_or_poisoned = true;
        self
    }

    pub fn without_rations(mut self) -> Self {
        self.no_food_and_water = true;
        self
    }
}

impl RulesEngine {
    pub async fn short_rest(
        &self,
        actor_id: ActorId,
        options: RestOptions,
    ) -> Result<Resolution, RollError> {
        self.with_actor(SHORT_REST, actor_id, |actor| {
            self.resolve_short_rest(actor, options)
        })
        .await
    }

    /// Recover HP (if fed and healthy), then always restore virtues and
    /// texts and drop meditation bonuses.
    pub async fn long_rest(
        &self,
        actor_id: ActorId,
        options: RestOptions,
    ) -> Result<Resolution, RollError> {
        self.with_actor(LONG_REST, actor_id, |actor| {
            self.resolve_long_rest(actor, options)
        })
        .await
    }

    /// Whether the actor ate and drank. Spends rations when deduction is on.
    async fn eat(
        &self,
        tx: &mut ResourceEngine<'_>,
        actor: Actor,
        options: RestOptions,
    ) -> Result<(Actor, bool), RollError> {
        if self.services.settings.deduct_consumables() {
            return tx.consume_rations(&actor).await;
        }
        if options.no_food_and_water {
            tx.record(Effect::RecoveryBlocked {
                reason: "no food and water".to_string(),
            });
            return Ok((actor, false));
        }
        Ok((actor, true))
    }

    async fn resolve_short_rest(
        &self,
        actor: Actor,
        options: RestOptions,
    ) -> Result<Resolution, RollError> {
        let mut tx = self.resources();
        let (actor, fed) = self.eat(&mut tx, actor, options).await?;

        let summary = if fed {
            let roll = self.roll_formula(&mut tx, "1d4", "HP recovery").await?;
            let updated = tx.adjust_hp(&actor, roll.total).await?;
            format!(
                "{} rests and recovers {} HP ({}/{})",
                actor.name,
                updated.resources.hit_points.current - actor.resources.hit_points.current,
                updated.resources.hit_points.current,
                updated.resources.hit_points.maximum
            )
        } else {
            format!("{} rests without food and water and recovers nothing", actor.name)
        };

        Ok(Resolution::new(SHORT_REST, summary)
            .for_actor(actor.id)
            .with_effects(tx.into_effects()))
    }

    async fn resolve_long_rest(
        &self,
        actor: Actor,
        options: RestOptions,
    ) -> Result<Resolution, RollError> {
        let mut tx = self.resources();
        let (mut actor, fed) = self.eat(&mut tx, actor, options).await?;
        let mut lines = Vec::new();

        if options.infected_or_poisoned {
            let roll = self.roll_formula(&mut tx, "1d6", "infection damage").await?;
            tx.record(Effect::DamageReported {
                actor: actor.id,
                amount: roll.total,
                cause: "infection or poison".to_string(),
            });
            lines.push(format!(
                "recovers no HP and suffers {} damage from infection or poison",
                roll.total
            ));
        } else if !fed {
            let roll = self.roll_formula(&mut tx, "1d4", "starvation damage").await?;
            tx.record(Effect::DamageReported {
                actor: actor.id,
                amount: roll.total,
                cause: "starvation".to_string(),
            });
            lines.push(format!(
                "recovers no HP without food and water and risks {} starvation damage",
                roll.total
            ));
        } else {
            let roll = self.roll_formula(&mut tx, "1d6", "HP recovery").await?;
            let before = actor.resources.hit_points.current;
            actor = tx.adjust_hp(&actor, roll.total).await?;
            lines.push(format!(
                "recovers {} HP",
                actor.resources.hit_points.current - before
            ));
        }

        let formula = actor
            .class_template()
            .map(|class| class.virtues_formula().to_string())
            .unwrap_or_else(|| "1".to_string());
        let virtues = self.roll_formula(&mut tx, &formula, "virtue recovery").await?;
        let before = actor.resources.virtues;
        actor = tx.raise_virtues(&actor, virtues.total).await?;
        if actor.resources.virtues > before {
            lines.push(format!("restores virtues to {}", actor.resources.virtues));
        } else {
            lines.push(format!("keeps {} virtues", actor.resources.virtues));
        }

        let spirit = actor.ability(Ability::Spirit);
        let texts = self
            .roll(&mut tx, &DiceExpression::check(4, spirit), "text recovery")
            .await?;
        actor = tx.set_texts(&actor, texts.total).await?;
        lines.push(format!("has {} texts", actor.resources.texts));

        if !actor.ledger.is_empty() {
            actor = tx.revert_temporary(&actor).await?;
            lines.push("loses the meditation bonuses".to_string());
        }

        let summary = format!("{} takes a long rest: {}", actor.name, lines.join(", "));
        Ok(Resolution::new(LONG_REST, summary)
            .for_actor(actor.id)
            .with_effects(tx.into_effects()))
    }
}
