//! Item use and feat activation.

use super::{AttackRequest, Effect, Resolution, RulesEngine, TextRequest};
use crate::error::{Rejection, RollError};
use crate::world::{Actor, ActorId, ItemId, ItemKind, ItemType, UseEffect};

const USE_ITEM: &str = "Use item";
const ACTIVATE_FEAT: &str = "Feat";

impl RulesEngine {
    /// Use an item the way its kind is used: weapons attack, texts are
    /// read, feats activate and gear or consumables spend a use.
    pub async fn use_item(&self, actor_id: ActorId, item_id: ItemId) -> Result<Resolution, RollError> {
        let effect = match self.load_actor(actor_id).await {
            Ok(actor) => actor.item(item_id).map(|item| item.kind.use_effect()),
            Err(err) => {
                return self
                    .conclude(USE_ITEM, Some(actor_id), &actor_id.to_string(), Err(err))
                    .await
            }
        };
        match effect {
            Some(UseEffect::Attack) => self.attack(actor_id, AttackRequest::new(item_id)).await,
            Some(UseEffect::ReadText) => {
                self.use_text(actor_id, TextRequest::for_item(item_id))
                    .await
            }
            Some(UseEffect::ActivateFeat) => self.activate_feat(actor_id, item_id).await,
            _ => {
                self.with_actor(USE_ITEM, actor_id, |actor| {
                    self.resolve_spend_use(actor, item_id)
                })
                .await
            }
        }
    }

    /// Post a feat's activation text. No roll.
    pub async fn activate_feat(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
    ) -> Result<Resolution, RollError> {
        self.with_actor(ACTIVATE_FEAT, actor_id, |actor| async move {
            let item = actor
                .item(item_id)
                .ok_or(Rejection::MissingItem { item: item_id })?;
            let ItemKind::Feat(feat) = &item.kind else {
                return Err(Rejection::WrongItemType {
                    expected: ItemType::Feat,
                    found: item.item_type(),
                }
                .into());
            };
            let mut summary = format!("{} activates {}", actor.name, item.name);
            if !feat.activation.is_empty() {
                summary.push_str(&format!(": {}", feat.activation));
            }
            Ok(Resolution::new(ACTIVATE_FEAT, summary)
                .for_actor(actor.id)
                .with_effect(Effect::FeatActivated {
                    actor: actor.id,
                    name: item.name.clone(),
                    activation: feat.activation.clone(),
                }))
        })
        .await
    }

    async fn resolve_spend_use(&self, actor: Actor, item_id: ItemId) -> Result<Resolution, RollError> {
        let item = actor
            .item(item_id)
            .ok_or(Rejection::MissingItem { item: item_id })?;
        if item.kind.use_effect() == UseEffect::Unusable {
            return Err(Rejection::NotUsable {
                item_type: item.item_type(),
            }
            .into());
        }
        let name = item.name.clone();

        let mut tx = self.resources();
        let updated = tx.spend_use(&actor, item_id).await?;
        let remaining = match updated.item(item_id).map(|i| &i.kind) {
            Some(ItemKind::Gear(g)) => g.uses.value,
            Some(ItemKind::Consumable(c)) => c.uses.value,
            _ => 0,
        };
        let summary = format!("{} uses {name} ({remaining} uses left)", actor.name);
        Ok(Resolution::new(USE_ITEM, summary)
            .for_actor(actor.id)
            .with_effects(tx.into_effects()))
    }
}
