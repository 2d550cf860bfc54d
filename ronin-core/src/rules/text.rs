//! Reading sacred texts.

use super::{CheckProfile, Resolution, RulesEngine};
use crate::error::{Rejection, RollError};
use crate::outcome::CriticalRule;
use crate::world::{Ability, Actor, ActorId, Hand, ItemId};
use serde::{Deserialize, Serialize};

const ACTION: &str = "Text use";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    /// The text item read, if any. Only used to name it.
    pub item: Option<ItemId>,
    pub modifier: i32,
    /// Base DR; the configured text DR when `None`.
    pub dr: Option<i32>,
}

impl TextRequest {
    pub fn for_item(item: ItemId) -> Self {
        Self {
            item: Some(item),
            ..Self::default()
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
}

impl RulesEngine {
    /// Spend a text on a Spirit check. A plain failure costs 1d2 HP, a
    /// fumble draws from the Kami's Revenge table.
    pub async fn use_text(
        &self,
        actor_id: ActorId,
        request: TextRequest,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTION, actor_id, |actor| self.resolve_text(actor, request))
            .await
    }

    fn check_can_read(&self, actor: &Actor) -> Result<(), Rejection> {
        if actor.resources.texts <= 0 {
            return Err(Rejection::NoTextsLeft);
        }
        if let Some(armor) = actor.equipped_armor() {
            if armor.max_category >= self.config.heavy_armor_category {
                return Err(Rejection::HeavyArmorEquipped);
            }
        }
        if actor.equipped_weapon_count(Hand::Two) > 0 {
            return Err(Rejection::TwoHandedWeaponEquipped);
        }
        if actor.equipped_weapon_count(Hand::One) >= 2 {
            return Err(Rejection::BothHandsFull);
        }
        Ok(())
    }

    async fn resolve_text(
        &self,
        actor: Actor,
        request: TextRequest,
    ) -> Result<Resolution, RollError> {
        self.check_can_read(&actor)?;
        let title = match request.item {
            Some(id) => actor
                .item(id)
                .map(|item| item.name.clone())
                .ok_or(Rejection::MissingItem { item: id })?,
            None => "a text".to_string(),
        };

        let dr = request.dr.unwrap_or(self.config.text_dr);
        let profile = CheckProfile::new(
            "text",
            actor.ability(Ability::Spirit) + request.modifier,
            dr,
        )
        .with_rule(CriticalRule::Flagged);

        let mut tx = self.resources();
        let report = self.run_check(&mut tx, &profile).await?;
        let mut summary = format!(
            "{} reads {title}: {} ({} vs DR {dr})",
            actor.name,
            report.classification(),
            report.total()
        );

        let mut current = actor;
        if report.fumble() {
            let table = self.config.tables.kamis_revenge.clone();
            if let Some(entry) = self.draw_table(&mut tx, &table).await? {
                summary.push_str(&format!("; {table}: {}", entry.label()));
            }
        } else if !report.succeeded() {
            let roll = self.roll_formula(&mut tx, "1d2", "text backlash").await?;
            current = tx.adjust_hp(&current, -roll.total).await?;
            summary.push_str(&format!("; the backlash deals {} damage", roll.total));
        }

        let current = tx.spend_text(&current).await?;
        summary.push_str(&format!(", {} texts left", current.resources.texts));

        Ok(Resolution::new(ACTION, summary)
            .for_actor(current.id)
            .with_check(report)
            .with_effects(tx.into_effects()))
    }
}
