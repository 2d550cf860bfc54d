//! Derived attributes: carrying capacity, encumbrance, check DRs and
//! equipment slot rules.

use crate::config::RulesConfig;
use crate::error::Rejection;
use crate::world::{
    protection_die, Ability, Actor, Armor, Hand, Item, ItemId, ItemKind, ItemType,
};
use serde::{Deserialize, Serialize};

/// Sum of item weight contributions, equipped armor excluded.
pub fn carrying_capacity(items: &[Item]) -> i32 {
    items
        .iter()
        .map(Item::capacity_contribution)
        .fold(0, i32::saturating_add)
}

/// Overencumbered at `capacity >= vigor + base` (inclusive).
pub fn is_overencumbered(actor: &Actor, config: &RulesConfig) -> bool {
    actor.carrying_capacity >= actor.ability(Ability::Vigor) + config.encumbrance_base
}

/// The DR of a check and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrBreakdown {
    pub base: i32,
    pub encumbrance: i32,
    pub armor: i32,
}

impl DrBreakdown {
    pub fn total(&self) -> i32 {
        self.base + self.encumbrance + self.armor
    }
}

/// DR for a check on `ability`.
///
/// Encumbrance hits vigor and swiftness. Equipped armor's swiftness
/// penalty hits swiftness. The two stack. Neither lowers the DR.
pub fn check_dr(actor: &Actor, ability: Ability, base: i32, config: &RulesConfig) -> DrBreakdown {
    let physical = matches!(ability, Ability::Vigor | Ability::Swiftness);
    let encumbrance = if physical && is_overencumbered(actor, config) {
        config.encumbrance_penalty
    } else {
        0
    };
    let armor = match (ability, actor.equipped_armor()) {
        (Ability::Swiftness, Some(armor)) => armor.swiftness_penalty.max(0),
        _ => 0,
    };
    DrBreakdown {
        base,
        encumbrance,
        armor,
    }
}

/// Check whether equipping `item_id` is allowed. Unequipping always is.
pub fn check_equip(actor: &Actor, item_id: ItemId) -> Result<(), Rejection> {
    let item = actor
        .item(item_id)
        .ok_or(Rejection::MissingItem { item: item_id })?;

    match &item.kind {
        ItemKind::Weapon(weapon) => {
            if weapon.equipped {
                return Ok(());
            }
            let mut one_handed = 0;
            let mut two_handed = 0;
            for other in actor.items.iter().filter(|i| i.id != item_id) {
                if let ItemKind::Weapon(w) = &other.kind {
                    if w.equipped {
                        match w.hand {
                            Hand::One => one_handed += 1,
                            Hand::Two => two_handed += 1,
                        }
                    }
                }
            }
            match weapon.hand {
                Hand::Two if one_handed + two_handed > 0 => Err(Rejection::HandsOccupied),
                Hand::One if two_handed > 0 => Err(Rejection::HandsOccupied),
                Hand::One if one_handed >= 2 => Err(Rejection::WeaponSlotsFull),
                _ => Ok(()),
            }
        }
        ItemKind::Armor(armor) => {
            if armor.equipped {
                return Ok(());
            }
            let other_armor = actor
                .items
                .iter()
                .filter(|i| i.id != item_id)
                .any(|i| matches!(&i.kind, ItemKind::Armor(a) if a.equipped));
            if other_armor {
                Err(Rejection::ArmorAlreadyEquipped)
            } else {
                Ok(())
            }
        }
        other => Err(Rejection::WrongItemType {
            expected: ItemType::Weapon,
            found: other.item_type(),
        }),
    }
}

/// Set an armor's current category. Above the maximum is rejected.
/// Returns the new protection die.
pub fn set_armor_category(armor: &mut Armor, category: u8) -> Result<&'static str, Rejection> {
    if category > armor.max_category {
        return Err(Rejection::CategoryAboveMax {
            requested: category,
            max: armor.max_category,
        });
    }
    armor.current_category = category;
    Ok(protection_die(category))
}

/// Character max HP. Enemies keep the maximum they were given.
pub fn max_hit_points(actor: &Actor, config: &RulesConfig) -> i32 {
    config
        .base_hp
        .saturating_add(actor.ability(Ability::Vigor))
        .saturating_add(actor.ability(Ability::Resilience))
        .max(1)
}

/// Recompute derived fields and pull resources back into range.
pub fn prepare(actor: &mut Actor, config: &RulesConfig) {
    for item in &mut actor.items {
        item.kind.normalize();
    }
    actor.carrying_capacity = carrying_capacity(&actor.items);

    if !actor.is_enemy() {
        let maximum = max_hit_points(actor, config);
        actor.resources.hit_points.maximum = maximum;
    }

    let resources = &mut actor.resources;
    resources.hit_points.maximum = resources.hit_points.maximum.max(1);
    resources.hit_points.current = resources
        .hit_points
        .current
        .clamp(0, resources.hit_points.maximum);
    resources.honor = config.honor.clamp(resources.honor);
    resources.virtues = resources.virtues.max(0);
    resources.texts = resources.texts.max(0);
    resources.ryo = resources.ryo.max(0);
}
