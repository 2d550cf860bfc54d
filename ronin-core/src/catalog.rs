//! Standard RONIN item catalog.
//!
//! Weapons, armor, provisions, gear, feats and classes that lookups by
//! name (starting gear, class feats) fall back to when the host's own
//! compendium has nothing.

use crate::error::HostError;
use crate::host::ItemCatalog;
use crate::world::{
    armor, consumable, gear, weapon, Ammo, AbilityScores, ClassTemplate, ConsumableType, Feat,
    Hand, Item, ItemKind, ItemType, StartingGear, Text, WeaponRange, WeightClass,
};
use async_trait::async_trait;

fn feat(name: &str, activation: &str) -> Item {
    Item::new(
        name,
        ItemKind::Feat(Feat {
            activation: activation.to_string(),
        }),
    )
}

fn text(name: &str, text_type: &str) -> Item {
    Item::new(
        name,
        ItemKind::Text(Text {
            text_type: text_type.to_string(),
        }),
    )
}

fn ammo(name: &str, quantity: i32) -> Item {
    Item::new(
        name,
        ItemKind::Ammo(Ammo {
            quantity,
            weight: WeightClass::Small,
        }),
    )
}

fn light_armor(name: &str) -> Item {
    let mut item = armor(name, 1, 0);
    if let ItemKind::Armor(a) = &mut item.kind {
        a.weight = WeightClass::Normal;
    }
    item
}

fn starting(name: &str, quantity: &str) -> StartingGear {
    StartingGear {
        name: name.to_string(),
        quantity: quantity.to_string(),
    }
}

fn class(name: &str, template: ClassTemplate) -> Item {
    Item::new(name, ItemKind::Class(template))
}

// ============================================================================
// Items
// ============================================================================

lazy_static::lazy_static! {
    /// Standard items, every kind except classes.
    pub static ref STANDARD_ITEMS: Vec<Item> = vec![
        // Weapons
        weapon("Katana", "1d8", Hand::One, WeaponRange::Melee),
        weapon("Wakizashi", "1d6", Hand::One, WeaponRange::Melee),
        weapon("Tanto", "1d4", Hand::One, WeaponRange::Melee),
        weapon("Jitte", "1d4", Hand::One, WeaponRange::Melee),
        weapon("Nodachi", "1d10", Hand::Two, WeaponRange::Melee),
        weapon("Yari", "1d8", Hand::Two, WeaponRange::Melee),
        weapon("Naginata", "1d10", Hand::Two, WeaponRange::Melee),
        weapon("Bo", "1d6", Hand::Two, WeaponRange::Melee),
        weapon("Yumi", "1d8", Hand::Two, WeaponRange::Ranged),
        weapon("Hankyu", "1d6", Hand::Two, WeaponRange::Ranged),
        weapon("Shuriken", "1d4", Hand::One, WeaponRange::Ranged),

        // Armor
        light_armor("Haramaki"),
        armor("Do-maru", 2, 1),
        armor("O-yoroi", 3, 2),

        // Provisions
        consumable("Rice Ball", ConsumableType::Food, 3, 1),
        consumable("Dried Fish", ConsumableType::Food, 2, 1),
        consumable("Water Gourd", ConsumableType::Water, 3, 1),
        consumable("Sake", ConsumableType::Other, 4, 1),
        consumable("Healing Herbs", ConsumableType::Other, 1, 1),

        // Gear
        gear("Rope", 1, WeightClass::Normal),
        gear("Torch", 1, WeightClass::Small),
        gear("Flint and Steel", 1, WeightClass::Small),
        gear("Bedroll", 1, WeightClass::Normal),
        gear("Prayer Beads", 1, WeightClass::None),
        gear("Straw Hat", 1, WeightClass::None),
        ammo("Arrows", 20),

        // Feats
        feat("Iaijutsu", "Strike first when drawing your blade; the first attack of a fight gains +2."),
        feat("Zen Archery", "Use Spirit instead of Swiftness for one ranged attack."),
        feat("Iron Body", "Once per day, ignore the damage of a single hit."),
        feat("Shadow Step", "Move unseen for one round in dim light."),
        feat("Ki Strike", "Unarmed attacks deal 1d6 damage."),
        feat("Mountain Stance", "Cannot be knocked down while standing still."),
        feat("Sutra Chanting", "Spend a text to grant an ally +1 on their next check."),

        // Texts
        text("Heart Sutra", "sutra"),
        text("Lotus Sutra", "sutra"),
        text("Book of Five Rings", "treatise"),
    ];

    /// Standard classes.
    pub static ref STANDARD_CLASSES: Vec<Item> = vec![
        class("Ronin", ClassTemplate {
            base: AbilityScores::new(1, 0, 0, 0),
            base_honor: 0,
            hp: "1d8".to_string(),
            virtues: "1d2".to_string(),
            ryo: "2d6".to_string(),
            feats: "Iaijutsu, [Ronin Feats]".to_string(),
            starting_gear: vec![
                starting("Katana", "1"),
                starting("Rice Ball", "1d2"),
                starting("Water Gourd", "1"),
                starting("Straw Hat", "1"),
            ],
        }),
        class("Sohei", ClassTemplate {
            base: AbilityScores::new(0, 0, 1, 0),
            base_honor: 1,
            hp: "1d6".to_string(),
            virtues: "1d4".to_string(),
            ryo: "1d6".to_string(),
            feats: "Sutra Chanting, [Sohei Feats]".to_string(),
            starting_gear: vec![
                starting("Naginata", "1"),
                starting("Prayer Beads", "1"),
                starting("Heart Sutra", "1"),
                starting("Rice Ball", "1"),
                starting("Water Gourd", "1"),
            ],
        }),
        class("Shinobi", ClassTemplate {
            base: AbilityScores::new(0, 1, 0, 0),
            base_honor: -2,
            hp: "1d6".to_string(),
            virtues: "1".to_string(),
            ryo: "2d6*2".to_string(),
            feats: "Shadow Step".to_string(),
            starting_gear: vec![
                starting("Tanto", "1"),
                starting("Shuriken", "1d4"),
                starting("Rope", "1"),
                starting("Dried Fish", "1"),
                starting("Water Gourd", "1"),
            ],
        }),
        class("Kyudoka", ClassTemplate {
            base: AbilityScores::new(0, 1, 0, 0),
            base_honor: 0,
            hp: "1d6".to_string(),
            virtues: "1d2".to_string(),
            ryo: "2d6".to_string(),
            feats: "Zen Archery".to_string(),
            starting_gear: vec![
                starting("Yumi", "1"),
                starting("Arrows", "2d6+6"),
                starting("Rice Ball", "1"),
                starting("Water Gourd", "1"),
            ],
        }),
    ];
}

fn matches_name(item: &Item, name: &str) -> bool {
    item.name.eq_ignore_ascii_case(name.trim())
}

/// Find a standard item or class by name, case-insensitively. Each hit is
/// a fresh copy with its own id.
pub fn find_item(name: &str, kind: Option<ItemType>) -> Option<Item> {
    STANDARD_ITEMS
        .iter()
        .chain(STANDARD_CLASSES.iter())
        .filter(|item| kind.map_or(true, |k| item.item_type() == k))
        .find(|item| matches_name(item, name))
        .map(Item::duplicate)
}

pub fn find_class(name: &str) -> Option<Item> {
    find_item(name, Some(ItemType::Class))
}

/// Copies of every standard class, ready for a [`crate::CharacterBuilder`].
pub fn standard_classes() -> Vec<Item> {
    STANDARD_CLASSES.iter().map(Item::duplicate).collect()
}

/// An [`ItemCatalog`] over the standard items.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

#[async_trait]
impl ItemCatalog for StaticCatalog {
    async fn find(&self, name: &str, kind: Option<ItemType>) -> Result<Option<Item>, HostError> {
        Ok(find_item(name, kind))
    }
}
