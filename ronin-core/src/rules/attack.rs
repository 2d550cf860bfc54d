//! Weapon attacks.

use super::ability::dr_note;
use super::{outcome_verb, CheckProfile, Resolution, RulesEngine};
use crate::derived;
use crate::error::{Rejection, RollError};
use crate::world::{Actor, ActorId, ItemId, ItemKind, ItemType};
use serde::{Deserialize, Serialize};

const ACTION: &str = "Attack";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    pub weapon: ItemId,
    pub modifier: i32,
    /// Base DR; the configured attack DR when `None`.
    pub dr: Option<i32>,
    /// Actor that takes the damage on a hit.
    pub target: Option<ActorId>,
}

impl AttackRequest {
    pub fn new(weapon: ItemId) -> Self {
        Self {
            weapon,
            modifier: 0,
            dr: None,
            target: None,
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_dr(mut self, dr: i32) -> Self {
        self.dr = Some(dr);
        self
    }

    pub fn against(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }
}

impl RulesEngine {
    /// Attack with a weapon: Vigor for melee, Swiftness for ranged. A hit
    /// rolls the weapon's damage, doubled on a natural maximum.
    pub async fn attack(
        &self,
        actor_id: ActorId,
        request: AttackRequest,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| self.resolve_attack(actor, request))
            .await
    }

    async fn resolve_attack(
        &self,
        actor: Actor,
        request: AttackRequest,
    ) -> Result<Resolution, RollError> {
        let item = actor.item(request.weapon).ok_or(Rejection::MissingItem {
            item: request.weapon,
        })?;
        let ItemKind::Weapon(weapon) = &item.kind else {
            return Err(Rejection::WrongItemType {
                expected: ItemType::Weapon,
                found: item.item_type(),
            }
            .into());
        };
        let target = match request.target {
            Some(id) => Some(self.load_actor(id).await?),
            None => None,
        };

        let ability = weapon.range.ability();
        let base = request.dr.unwrap_or(self.config.attack_dr);
        let dr = derived::check_dr(&actor, ability, base, &self.config);
        let profile = CheckProfile::new(
            format!("{} attack", item.name),
            actor.ability(ability) + request.modifier,
            dr.total(),
        )
        .with_solo(self.services.settings.use_solo_rules());

        let mut tx = self.resources();
        let report = self.run_check(&mut tx, &profile).await?;

        let mut summary = format!(
            "{} {} attacking with {} ({} vs DR {}){}",
            actor.name,
            outcome_verb(report.classification()),
            item.name,
            report.total(),
            dr.total(),
            dr_note(&dr)
        );

        if report.succeeded() {
            let roll = self
                .roll_formula(&mut tx, &weapon.damage, &format!("{} damage", item.name))
                .await?;
            let mut damage = roll.total.max(0);
            if report.critical() {
                damage *= 2;
            }
            summary.push_str(&format!(", dealing {damage} damage"));
            if report.critical() {
                summary.push_str(" (critical)");
            }
            if let Some(target) = target {
                let target = tx.adjust_hp(&target, -damage).await?;
                summary.push_str(&format!(
                    " to {} ({}/{} HP)",
                    target.name,
                    target.resources.hit_points.current,
                    target.resources.hit_points.maximum
                ));
            }
        }

        Ok(Resolution::new(ACTION, summary)
            .for_actor(actor.id)
            .with_check(report)
            .with_effects(tx.into_effects()))
    }
}
