//! Resource mutation.
//!
//! Every change to an actor is expressed as an [`ActorUpdate`] and sent to
//! the host's [`ActorRepository`]. [`ResourceEngine`] awaits each write and
//! continues from the actor the host hands back, so later steps always see
//! earlier ones. There is no rollback: a failure mid-sequence leaves the
//! earlier writes in place.

use crate::config::RulesConfig;
use crate::derived;
use crate::error::{HostError, Rejection, RollError};
use crate::host::ActorRepository;
use crate::rules::Effect;
use crate::world::{
    Ability, Actor, ConsumableType, HitPoints, Item, ItemId, ItemKind, ItemType, ModifierLedger,
};
use serde::{Deserialize, Serialize};

/// One write request against an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ActorUpdate {
    SetHitPoints { hit_points: HitPoints },
    SetHonor { value: i32 },
    SetVirtues { value: i32 },
    SetTexts { value: i32 },
    SetRyo { value: i32 },
    SetAbility { ability: Ability, value: i32 },
    SetLedger { ledger: ModifierLedger },
    /// Insert the item, or replace the one with the same id.
    PutItem { item: Item },
    RemoveItem { item: ItemId },
}

/// Apply one update to an in-memory actor.
pub fn apply_update(actor: &mut Actor, update: &ActorUpdate) -> Result<(), HostError> {
    match update {
        ActorUpdate::SetHitPoints { hit_points } => actor.resources.hit_points = *hit_points,
        ActorUpdate::SetHonor { value } => actor.resources.honor = *value,
        ActorUpdate::SetVirtues { value } => actor.resources.virtues = *value,
        ActorUpdate::SetTexts { value } => actor.resources.texts = *value,
        ActorUpdate::SetRyo { value } => actor.resources.ryo = *value,
        ActorUpdate::SetAbility { ability, value } => actor.abilities.set(*ability, *value),
        ActorUpdate::SetLedger { ledger } => actor.ledger = ledger.clone(),
        ActorUpdate::PutItem { item } => match actor.item_mut(item.id) {
            Some(existing) => *existing = item.clone(),
            None => actor.items.push(item.clone()),
        },
        ActorUpdate::RemoveItem { item } => {
            let before = actor.items.len();
            actor.items.retain(|i| i.id != *item);
            if actor.items.len() == before {
                return Err(HostError::ItemNotFound {
                    actor: actor.id,
                    item: *item,
                });
            }
        }
    }
    Ok(())
}

/// The consumable of `kind` with the fewest uses left, ignoring empty ones.
pub fn least_stocked(actor: &Actor, kind: ConsumableType) -> Option<&Item> {
    actor
        .items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::Consumable(c) if c.consumable_type == kind && c.uses.value > 0 => {
                Some((item, c.uses.value))
            }
            _ => None,
        })
        .min_by_key(|(_, uses)| *uses)
        .map(|(item, _)| item)
}

/// Commits resource changes for one resolution and records them as effects.
pub struct ResourceEngine<'a> {
    actors: &'a dyn ActorRepository,
    config: &'a RulesConfig,
    effects: Vec<Effect>,
}

impl<'a> ResourceEngine<'a> {
    pub fn new(actors: &'a dyn ActorRepository, config: &'a RulesConfig) -> Self {
        Self {
            actors,
            config,
            effects: Vec::new(),
        }
    }

    /// Effects committed so far.
    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }

    pub fn record(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    async fn commit(&self, actor: &Actor, updates: Vec<ActorUpdate>) -> Result<Actor, RollError> {
        Ok(self.actors.update_actor(actor.id, updates).await?)
    }

    /// Apply `delta` to current HP, clamped to `[0, max]`.
    pub async fn adjust_hp(&mut self, actor: &Actor, delta: i32) -> Result<Actor, RollError> {
        let mut hit_points = actor.resources.hit_points;
        let amount = hit_points.apply_delta(delta);
        let updated = self
            .commit(actor, vec![ActorUpdate::SetHitPoints { hit_points }])
            .await?;
        self.record(Effect::HpChanged {
            actor: actor.id,
            amount,
            current: updated.resources.hit_points.current,
            maximum: updated.resources.hit_points.maximum,
        });
        Ok(updated)
    }

    /// Spend one use of the least-stocked consumable of `kind`.
    pub async fn consume(
        &mut self,
        actor: &Actor,
        kind: ConsumableType,
    ) -> Result<(Actor, Option<ItemId>), RollError> {
        let Some(item) = least_stocked(actor, kind) else {
            return Ok((actor.clone(), None));
        };
        let mut item = item.clone();
        let remaining = item.kind.spend_use().unwrap_or(0);
        let id = item.id;
        let name = item.name.clone();
        let updated = self
            .commit(actor, vec![ActorUpdate::PutItem { item }])
            .await?;
        self.record(Effect::ConsumableUsed {
            actor: actor.id,
            item: id,
            name,
            remaining,
        });
        Ok((updated, Some(id)))
    }

    /// Spend one water and one food. When either is missing nothing is
    /// spent and `false` is returned.
    pub async fn consume_rations(&mut self, actor: &Actor) -> Result<(Actor, bool), RollError> {
        let has_water = least_stocked(actor, ConsumableType::Water).is_some();
        let has_food = least_stocked(actor, ConsumableType::Food).is_some();
        if !(has_water && has_food) {
            self.record(Effect::RecoveryBlocked {
                reason: "no water or food".to_string(),
            });
            return Ok((actor.clone(), false));
        }
        let (actor, _) = self.consume(actor, ConsumableType::Water).await?;
        let (actor, _) = self.consume(&actor, ConsumableType::Food).await?;
        Ok((actor, true))
    }

    /// Add a temporary ability delta and record it in the ledger.
    pub async fn add_temporary(
        &mut self,
        actor: &Actor,
        ability: Ability,
        delta: i32,
    ) -> Result<Actor, RollError> {
        let value = actor.ability(ability) + delta;
        let mut ledger = actor.ledger.clone();
        ledger.record(ability, delta);
        let updated = self
            .commit(
                actor,
                vec![
                    ActorUpdate::SetAbility { ability, value },
                    ActorUpdate::SetLedger { ledger },
                ],
            )
            .await?;
        self.record(Effect::AbilityChanged {
            actor: actor.id,
            ability,
            amount: delta,
            value: updated.ability(ability),
            temporary: true,
        });
        Ok(updated)
    }

    /// Subtract exactly what the ledger recorded, then clear it.
    pub async fn revert_temporary(&mut self, actor: &Actor) -> Result<Actor, RollError> {
        let reverted = actor.ledger.entries();
        if reverted.is_empty() {
            return Ok(actor.clone());
        }
        let mut updates: Vec<ActorUpdate> = reverted
            .iter()
            .map(|(ability, amount)| ActorUpdate::SetAbility {
                ability: *ability,
                value: actor.ability(*ability) - amount,
            })
            .collect();
        updates.push(ActorUpdate::SetLedger {
            ledger: ModifierLedger::new(),
        });
        let updated = self.commit(actor, updates).await?;
        self.record(Effect::ModifiersReverted {
            actor: actor.id,
            reverted,
        });
        Ok(updated)
    }

    /// Add to Honor, clamped to the configured bounds.
    pub async fn adjust_honor(&mut self, actor: &Actor, delta: i32) -> Result<Actor, RollError> {
        let before = actor.resources.honor;
        let value = self.config.honor.clamp(before.saturating_add(delta));
        let updated = self
            .commit(actor, vec![ActorUpdate::SetHonor { value }])
            .await?;
        self.record(Effect::HonorChanged {
            actor: actor.id,
            amount: value - before,
            current: value,
            dishonored: self.config.honor.is_dishonored(value),
        });
        Ok(updated)
    }

    /// Raise Virtues to `candidate` if that is higher. Never lowers.
    pub async fn raise_virtues(&mut self, actor: &Actor, candidate: i32) -> Result<Actor, RollError> {
        let from = actor.resources.virtues;
        if candidate <= from {
            return Ok(actor.clone());
        }
        self.set_virtues(actor, from, candidate).await
    }

    /// +1 Virtue if below `cap`.
    pub async fn gain_virtue(&mut self, actor: &Actor, cap: i32) -> Result<Actor, RollError> {
        let from = actor.resources.virtues;
        if from >= cap {
            return Ok(actor.clone());
        }
        self.set_virtues(actor, from, from + 1).await
    }

    async fn set_virtues(&mut self, actor: &Actor, from: i32, to: i32) -> Result<Actor, RollError> {
        let to = to.max(0);
        let updated = self
            .commit(actor, vec![ActorUpdate::SetVirtues { value: to }])
            .await?;
        self.record(Effect::VirtuesChanged {
            actor: actor.id,
            from,
            to,
        });
        Ok(updated)
    }

    /// Overwrite Texts, floored at 0.
    pub async fn set_texts(&mut self, actor: &Actor, value: i32) -> Result<Actor, RollError> {
        let from = actor.resources.texts;
        let to = value.max(0);
        let updated = self
            .commit(actor, vec![ActorUpdate::SetTexts { value: to }])
            .await?;
        self.record(Effect::TextsChanged {
            actor: actor.id,
            from,
            to,
        });
        Ok(updated)
    }

    pub async fn spend_text(&mut self, actor: &Actor) -> Result<Actor, RollError> {
        self.set_texts(actor, actor.resources.texts - 1).await
    }

    fn item<'b>(actor: &'b Actor, item_id: ItemId) -> Result<&'b Item, Rejection> {
        actor
            .item(item_id)
            .ok_or(Rejection::MissingItem { item: item_id })
    }

    async fn put_item(&mut self, actor: &Actor, item: Item) -> Result<Actor, RollError> {
        let id = item.id;
        let name = item.name.clone();
        let updated = self
            .commit(actor, vec![ActorUpdate::PutItem { item }])
            .await?;
        self.record(Effect::ItemUpdated {
            actor: actor.id,
            item: id,
            name,
        });
        Ok(updated)
    }

    /// Set a stack size, floored at 0.
    pub async fn set_quantity(
        &mut self,
        actor: &Actor,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<Actor, RollError> {
        let mut item = Self::item(actor, item_id)?.clone();
        if !item.kind.set_quantity(quantity) {
            return Err(Rejection::NoQuantity {
                item_type: item.item_type(),
            }
            .into());
        }
        self.put_item(actor, item).await
    }

    /// Toggle a weapon or armor, enforcing the slot rules when equipping.
    pub async fn toggle_equip(&mut self, actor: &Actor, item_id: ItemId) -> Result<Actor, RollError> {
        derived::check_equip(actor, item_id)?;
        let mut item = Self::item(actor, item_id)?.clone();
        match &mut item.kind {
            ItemKind::Weapon(w) => w.equipped = !w.equipped,
            ItemKind::Armor(a) => a.equipped = !a.equipped,
            other => {
                return Err(Rejection::WrongItemType {
                    expected: ItemType::Weapon,
                    found: other.item_type(),
                }
                .into())
            }
        }
        self.put_item(actor, item).await
    }

    pub async fn set_armor_category(
        &mut self,
        actor: &Actor,
        item_id: ItemId,
        category: u8,
    ) -> Result<Actor, RollError> {
        let mut item = Self::item(actor, item_id)?.clone();
        let found = item.item_type();
        let ItemKind::Armor(armor) = &mut item.kind else {
            return Err(Rejection::WrongItemType {
                expected: ItemType::Armor,
                found,
            }
            .into());
        };
        derived::set_armor_category(armor, category)?;
        self.put_item(actor, item).await
    }

    /// Spend one use of a gear or consumable item.
    pub async fn spend_use(&mut self, actor: &Actor, item_id: ItemId) -> Result<Actor, RollError> {
        let mut item = Self::item(actor, item_id)?.clone();
        let item_type = item.item_type();
        let has_uses = match &item.kind {
            ItemKind::Gear(g) => g.uses.value > 0,
            ItemKind::Consumable(c) => c.uses.value > 0,
            _ => return Err(Rejection::NotUsable { item_type }.into()),
        };
        if !has_uses {
            return Err(Rejection::NoUsesLeft.into());
        }
        let remaining = item.kind.spend_use().unwrap_or(0);
        let name = item.name.clone();
        let updated = self
            .commit(actor, vec![ActorUpdate::PutItem { item }])
            .await?;
        self.record(Effect::ConsumableUsed {
            actor: actor.id,
            item: item_id,
            name,
            remaining,
        });
        Ok(updated)
    }

    /// Give the actor an item. A second class item is rejected.
    pub async fn add_item(&mut self, actor: &Actor, mut item: Item) -> Result<Actor, RollError> {
        if item.item_type() == ItemType::Class && actor.class_template().is_some() {
            return Err(Rejection::ClassAlreadyAssigned.into());
        }
        item.kind.normalize();
        let id = item.id;
        let name = item.name.clone();
        let updated = self
            .commit(actor, vec![ActorUpdate::PutItem { item }])
            .await?;
        self.record(Effect::ItemAdded {
            actor: actor.id,
            item: id,
            name,
        });
        Ok(updated)
    }

    pub async fn remove_item(&mut self, actor: &Actor, item_id: ItemId) -> Result<Actor, RollError> {
        let name = Self::item(actor, item_id)?.name.clone();
        let updated = self
            .commit(actor, vec![ActorUpdate::RemoveItem { item: item_id }])
            .await?;
        self.record(Effect::ItemRemoved {
            actor: actor.id,
            item: item_id,
            name,
        });
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryHost;
    use crate::world::{consumable, create_sample_ronin, weapon, Hand, WeaponRange};

    async fn stored(host: &InMemoryHost, actor: Actor) -> Actor {
        host.create_actor(actor).await.unwrap()
    }

    #[test]
    fn test_apply_update_put_and_remove() {
        let mut actor = Actor::character("Kenji");
        let blade = weapon("Tanto", "1d4", Hand::One, WeaponRange::Melee);
        let id = blade.id;
        apply_update(&mut actor, &ActorUpdate::PutItem { item: blade }).unwrap();
        assert_eq!(actor.items.len(), 1);
        apply_update(&mut actor, &ActorUpdate::RemoveItem { item: id }).unwrap();
        assert!(actor.items.is_empty());
        assert!(apply_update(&mut actor, &ActorUpdate::RemoveItem { item: id }).is_err());
    }

    #[test]
    fn test_least_stocked_skips_empty() {
        let mut actor = Actor::character("Kenji");
        actor
            .items
            .push(consumable("Full Gourd", ConsumableType::Water, 3, 1));
        actor
            .items
            .push(consumable("Low Gourd", ConsumableType::Water, 1, 1));
        actor
            .items
            .push(consumable("Empty Gourd", ConsumableType::Water, 0, 1));
        let pick = least_stocked(&actor, ConsumableType::Water).unwrap();
        assert_eq!(pick.name, "Low Gourd");
        assert!(least_stocked(&actor, ConsumableType::Food).is_none());
    }

    #[tokio::test]
    async fn test_hp_delta_is_clamped() {
        let host = InMemoryHost::new();
        let config = RulesConfig::default();
        let mut actor = create_sample_ronin("Jubei");
        actor.resources.hit_points.current = 6;
        let actor = stored(&host, actor).await;

        let mut engine = ResourceEngine::new(&host, &config);
        let actor = engine.adjust_hp(&actor, 5).await.unwrap();
        let actor = engine.adjust_hp(&actor, 5).await.unwrap();
        assert_eq!(actor.resources.hit_points.current, 11);
        let actor = engine.adjust_hp(&actor, -100).await.unwrap();
        assert_eq!(actor.resources.hit_points.current, 0);
    }

    #[tokio::test]
    async fn test_ledger_reversal_keeps_other_changes() {
        let host = InMemoryHost::new();
        let config = RulesConfig::default();
        let mut actor = Actor::character("Kenji");
        actor.abilities.vigor = 1;
        let actor = stored(&host, actor).await;

        let mut engine = ResourceEngine::new(&host, &config);
        let actor = engine.add_temporary(&actor, Ability::Vigor, 1).await.unwrap();
        assert_eq!(actor.abilities.vigor, 2);

        // An unrelated permanent +2.
        let actor = host
            .update_actor(
                actor.id,
                vec![ActorUpdate::SetAbility {
                    ability: Ability::Vigor,
                    value: actor.abilities.vigor + 2,
                }],
            )
            .await
            .unwrap();

        let actor = engine.revert_temporary(&actor).await.unwrap();
        assert_eq!(actor.abilities.vigor, 3);
        assert!(actor.ledger.is_empty());
    }

    #[tokio::test]
    async fn test_rations_need_both_kinds() {
        let host = InMemoryHost::new();
        let config = RulesConfig::default();
        let mut actor = Actor::character("Kenji");
        actor
            .items
            .push(consumable("Water Gourd", ConsumableType::Water, 2, 1));
        let actor = stored(&host, actor).await;

        let mut engine = ResourceEngine::new(&host, &config);
        let (actor, fed) = engine.consume_rations(&actor).await.unwrap();
        assert!(!fed);
        match &actor.items[0].kind {
            ItemKind::Consumable(c) => assert_eq!(c.uses.value, 2),
            _ => panic!("expected consumable"),
        }
    }

    #[tokio::test]
    async fn test_second_class_rejected() {
        let host = InMemoryHost::new();
        let config = RulesConfig::default();
        let actor = stored(&host, create_sample_ronin("Jubei")).await;
        let mut engine = ResourceEngine::new(&host, &config);
        let second = Item::new("Monk", ItemKind::Class(Default::default()));
        let err = engine.add_item(&actor, second).await.unwrap_err();
        assert!(matches!(
            err,
            RollError::Rejected(Rejection::ClassAlreadyAssigned)
        ));
    }

    #[tokio::test]
    async fn test_honor_and_virtue_bounds() {
        let host = InMemoryHost::new();
        let config = RulesConfig::default();
        let mut actor = Actor::character("Kenji");
        actor.resources.honor = 19;
        actor.resources.virtues = 2;
        let actor = stored(&host, actor).await;

        let mut engine = ResourceEngine::new(&host, &config);
        let actor = engine.adjust_honor(&actor, 5).await.unwrap();
        assert_eq!(actor.resources.honor, 20);
        let actor = engine.raise_virtues(&actor, 1).await.unwrap();
        assert_eq!(actor.resources.virtues, 2);
        let actor = engine.raise_virtues(&actor, 4).await.unwrap();
        assert_eq!(actor.resources.virtues, 4);
        let actor = engine.gain_virtue(&actor, 4).await.unwrap();
        assert_eq!(actor.resources.virtues, 4);
        let actor = engine.set_texts(&actor, -3).await.unwrap();
        assert_eq!(actor.resources.texts, 0);
    }
}
