//! Error and rejection types shared by the roll procedures.

use crate::character_builder::BuilderError;
use crate::dice::DiceError;
use crate::world::{ActorId, ItemId, ItemType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a host service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Item {item} not found on actor {actor}")]
    ItemNotFound { actor: ActorId, item: ItemId },

    #[error("Host rejected the update: {0}")]
    Rejected(String),

    #[error("Host service unavailable: {0}")]
    Unavailable(String),
}

/// A precondition the action did not meet. The action is aborted with no
/// state change and the user is warned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("No such actor")]
    MissingActor { actor: ActorId },

    #[error("No such item")]
    MissingItem { item: ItemId },

    #[error("Expected a {expected} item, found {found}")]
    WrongItemType { expected: ItemType, found: ItemType },

    #[error("Unsupported ability: {key}")]
    UnsupportedAbility { key: String },

    #[error("No texts left")]
    NoTextsLeft,

    #[error("Cannot read texts in heavy armor")]
    HeavyArmorEquipped,

    #[error("Cannot read texts while wielding a two-handed weapon")]
    TwoHandedWeaponEquipped,

    #[error("Cannot read texts with both hands full")]
    BothHandsFull,

    #[error("Unequip your other weapons before equipping a two-handed weapon")]
    HandsOccupied,

    #[error("No free hand for another weapon")]
    WeaponSlotsFull,

    #[error("Another armor is already equipped")]
    ArmorAlreadyEquipped,

    #[error("Armor category {requested} exceeds the maximum of {max}")]
    CategoryAboveMax { requested: u8, max: u8 },

    #[error("{item_type} items have no quantity")]
    NoQuantity { item_type: ItemType },

    #[error("A character can only have one class")]
    ClassAlreadyAssigned,

    #[error("Only enemies make moral checks")]
    NotAnEnemy,

    #[error("{item_type} items cannot be used")]
    NotUsable { item_type: ItemType },

    #[error("No uses left")]
    NoUsesLeft,

    #[error("Seppuku cannot {input} while {stage}")]
    SeppukuOutOfOrder { stage: String, input: String },
}

/// Error type for the roll procedures.
#[derive(Debug, Error)]
pub enum RollError {
    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Dice error: {0}")]
    Dice(#[from] DiceError),

    #[error("Character generation error: {0}")]
    Builder(#[from] BuilderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_converts_into_roll_error() {
        let err: RollError = Rejection::NoTextsLeft.into();
        assert!(matches!(err, RollError::Rejected(Rejection::NoTextsLeft)));
        assert_eq!(err.to_string(), "No texts left");
    }

    #[test]
    fn test_rejection_serializes_with_reason() {
        let json = serde_json::to_value(Rejection::CategoryAboveMax {
            requested: 3,
            max: 2,
        })
        .unwrap();
        assert_eq!(json["reason"], "category_above_max");
        assert_eq!(json["requested"], 3);
    }
}
