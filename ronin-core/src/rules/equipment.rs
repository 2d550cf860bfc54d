//! Inventory actions: equipping, armor category, stack sizes and items
//! entering or leaving an actor.

use super::{Resolution, RulesEngine};
use crate::error::{Rejection, RollError};
use crate::world::{ActorId, Item, ItemId, ItemKind};

const EQUIP: &str = "Equip";
const ARMOR_CATEGORY: &str = "Armor category";
const QUANTITY: &str = "Quantity";
const ADD_ITEM: &str = "Add item";
const REMOVE_ITEM: &str = "Remove item";

impl RulesEngine {
    /// Equip or unequip a weapon or armor. Equipping respects the hand
    /// and armor slots.
    pub async fn toggle_equipped(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<Resolution, RollError> {
        self.with_actor(EQUIP, actor_id, |actor| async move {
            let mut tx = self.resources();
            let updated = tx.toggle_equip(&actor, item_id).await?;
            let item = updated
                .item(item_id)
                .ok_or(Rejection::MissingItem { item: item_id })?;
            let verb = if item.kind.is_equipped() {
                "equips"
            } else {
                "unequips"
            };
            Ok(Resolution::new(EQUIP, format!("{} {verb} {}", actor.name, item.name))
                .for_actor(actor.id)
                .with_effects(tx.into_effects()))
        })
        .await
    }

    pub async fn set_armor_category(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
        category: u8,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ARMOR_CATEGORY, actor_id, |actor| async move {
            let mut tx = self.resources();
            let updated = tx.set_armor_category(&actor, item_id, category).await?;
            let summary = match updated.item(item_id) {
                Some(Item {
                    name,
                    kind: ItemKind::Armor(armor),
                    ..
                }) => format!(
                    "{name} set to category {} ({} protection)",
                    armor.current_category,
                    armor.protection()
                ),
                _ => format!("Armor set to category {category}"),
            };
            Ok(Resolution::new(ARMOR_CATEGORY, summary)
                .for_actor(actor.id)
                .with_effects(tx.into_effects()))
        })
        .await
    }

    pub async fn set_item_quantity(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<Resolution, RollError> {
        self.with_actor(QUANTITY, actor_id, |actor| async move {
            let mut tx = self.resources();
            let updated = tx.set_quantity(&actor, item_id, quantity).await?;
            let summary = match updated.item(item_id) {
                Some(item) => format!(
                    "{} now has {} {}",
                    actor.name,
                    item.kind.quantity().unwrap_or(0),
                    item.name
                ),
                None => format!("{} changes a quantity", actor.name),
            };
            Ok(Resolution::new(QUANTITY, summary)
                .for_actor(actor.id)
                .with_effects(tx.into_effects()))
        })
        .await
    }

    /// Give an item to an actor. A second class is rejected.
    pub async fn add_item(&self, actor_id: ActorId, item: Item) -> Result<Resolution, RollError> {
        self.with_actor(ADD_ITEM, actor_id, |actor| async move {
            let name = item.name.clone();
            let mut tx = self.resources();
            tx.add_item(&actor, item).await?;
            Ok(
                Resolution::new(ADD_ITEM, format!("{} receives {name}", actor.name))
                    .for_actor(actor.id)
                    .with_effects(tx.into_effects()),
            )
        })
        .await
    }

    pub async fn remove_item(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<Resolution, RollError> {
        self.with_actor(REMOVE_ITEM, actor_id, |actor| async move {
            let name = actor
                .item(item_id)
                .map(|item| item.name.clone())
                .ok_or(Rejection::MissingItem { item: item_id })?;
            let mut tx = self.resources();
            tx.remove_item(&actor, item_id).await?;
            Ok(
                Resolution::new(REMOVE_ITEM, format!("{} discards {name}", actor.name))
                    .for_actor(actor.id)
                    .with_effects(tx.into_effects()),
            )
        })
        .await
    }
}
