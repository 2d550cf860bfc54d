//! Enemy moral checks.

use super::{Effect, Resolution, RulesEngine};
use crate::error::{Rejection, RollError};
use crate::outcome::Classification;
use crate::world::{Actor, ActorId};

const ACTION: &str = "Moral check";

impl RulesEngine {
    /// Roll 2d6 against an enemy's moral. Rolling over it breaks the enemy
    /// and draws from the moral table.
    pub async fn moral_check(&self, actor_id: ActorId) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| self.resolve_moral(actor))
            .await
    }

    async fn resolve_moral(&self, actor: Actor) -> Result<Resolution, RollError> {
        let profile = actor.enemy_profile().ok_or(Rejection::NotAnEnemy)?;
        let moral = if profile.moral > 0 {
            profile.moral
        } else {
            self.config.default_moral
        };

        let mut tx = self.resources();
        let roll = self.roll_formula(&mut tx, "2d6", "moral").await?;
        let demoralized = roll.total > moral;

        let mut resolution = if demoralized {
            tx.record(Effect::Demoralized { actor: actor.id });
            let mut summary = format!(
                "{} is demoralized ({} vs moral {moral})",
                actor.name, roll.total
            );
            let table = self.config.tables.moral.clone();
            if let Some(entry) = self.draw_table(&mut tx, &table).await? {
                summary.push_str(&format!(": {}", entry.label()));
            }
            let mut resolution = Resolution::new(ACTION, summary);
            resolution.classification = Some(Classification::Failure);
            resolution
        } else {
            let mut resolution = Resolution::new(
                ACTION,
                format!("{} holds ({} vs moral {moral})", actor.name, roll.total),
            );
            resolution.classification = Some(Classification::Success);
            resolution
        };
        resolution.total = Some(roll.total);
        resolution.dr = Some(moral);

        Ok(resolution
            .for_actor(actor.id)
            .with_effects(tx.into_effects()))
    }
}
