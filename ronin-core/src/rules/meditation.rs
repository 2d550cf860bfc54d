//! Meditation and haiku.

use super::{CheckProfile, Resolution, RulesEngine};
use crate::dice::formula_maximum;
use crate::error::RollError;
use crate::outcome::CriticalRule;
use crate::world::{Ability, Actor, ActorId};

const ACTION: &str = "Meditation";

impl RulesEngine {
    /// +1 to `ability` until the next long rest and +1 Honor. With a
    /// haiku, a Spirit check either earns a virtue or costs a point of
    /// Spirit until the next long rest.
    pub async fn meditate(
        &self,
        actor_id: ActorId,
        ability: Ability,
        haiku: bool,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| {
            self.resolve_meditation(actor, ability, haiku)
        })
        .await
    }

    async fn resolve_meditation(
        &self,
        actor: Actor,
        ability: Ability,
        haiku: bool,
    ) -> Result<Resolution, RollError> {
        let mut tx = self.resources();
        let actor = tx.add_temporary(&actor, ability, 1).await?;
        let actor = tx.adjust_honor(&actor, 1).await?;
        let mut summary = format!(
            "{} meditates: +1 {ability} until the next long rest, Honor {}",
            actor.name, actor.resources.honor
        );

        if !haiku {
            return Ok(Resolution::new(ACTION, summary)
                .for_actor(actor.id)
                .with_effects(tx.into_effects()));
        }

        let profile = CheckProfile::new(
            "haiku",
            actor.ability(Ability::Spirit),
            self.config.haiku_dr,
        )
        .with_rule(CriticalRule::Flagged);
        let report = self.run_check(&mut tx, &profile).await?;

        let actor = if report.succeeded() {
            let cap = actor
                .class_template()
                .map(|class| formula_maximum(class.virtues_formula()))
                .unwrap_or(1);
            let before = actor.resources.virtues;
            let updated = tx.gain_virtue(&actor, cap).await?;
            if updated.resources.virtues > before {
                summary.push_str(&format!(
                    "; the haiku moves the spirit (+1 virtue, {} of {cap})",
                    updated.resources.virtues
                ));
            } else {
                summary.push_str("; the haiku moves the spirit, but virtues are already full");
            }
            updated
        } else {
            summary.push_str("; the haiku falls flat (-1 Spirit until the next long rest)");
            tx.add_temporary(&actor, Ability::Spirit, -1).await?
        };
        summary.push_str(&format!(" ({} vs DR {})", report.total(), report.dr()));

        Ok(Resolution::new(ACTION, summary)
            .for_actor(actor.id)
            .with_check(report)
            .with_effects(tx.into_effects()))
    }
}
