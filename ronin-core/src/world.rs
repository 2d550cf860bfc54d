//! RONIN world types.
//!
//! Actors (player characters and enemies), their resources and the items
//! they own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for items owned by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Abilities
// ============================================================================

/// The four abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Vigor,
    Swiftness,
    Spirit,
    Resilience,
}

impl Ability {
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Vigor => "vigor",
            Ability::Swiftness => "swiftness",
            Ability::Spirit => "spirit",
            Ability::Resilience => "resilience",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Vigor => "Vigor",
            Ability::Swiftness => "Swiftness",
            Ability::Spirit => "Spirit",
            Ability::Resilience => "Resilience",
        }
    }

    pub fn all() -> [Ability; 4] {
        [
            Ability::Vigor,
            Ability::Swiftness,
            Ability::Spirit,
            Ability::Resilience,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for ability keys that are not one of the four abilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAbility(pub String);

impl FromStr for Ability {
    type Err = UnknownAbility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Ability::all()
            .into_iter()
            .find(|a| a.key() == key)
            .ok_or(UnknownAbility(s.to_string()))
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityScores {
    pub vigor: i32,
    pub swiftness: i32,
    pub spirit: i32,
    pub resilience: i32,
}

impl AbilityScores {
    pub fn new(vigor: i32, swiftness: i32, spirit: i32, resilience: i32) -> Self {
        Self {
            vigor,
            swiftness,
            spirit,
            resilience,
        }
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Vigor => self.vigor,
            Ability::Swiftness => self.swiftness,
            Ability::Spirit => self.spirit,
            Ability::Resilience => self.resilience,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Vigor => self.vigor = value,
            Ability::Swiftness => self.swiftness = value,
            Ability::Spirit => self.spirit = value,
            Ability::Resilience => self.resilience = value,
        }
    }
}

/// Reversible record of temporary ability deltas (meditation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierLedger {
    deltas: HashMap<Ability, i32>,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ability: Ability, delta: i32) {
        *self.deltas.entry(ability).or_insert(0) += delta;
    }

    pub fn amount(&self, ability: Ability) -> i32 {
        self.deltas.get(&ability).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.values().all(|d| *d == 0)
    }

    /// Non-zero entries in ability order.
    pub fn entries(&self) -> Vec<(Ability, i32)> {
        Ability::all()
            .into_iter()
            .map(|a| (a, self.amount(a)))
            .filter(|(_, d)| *d != 0)
            .collect()
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        let maximum = maximum.max(1);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Apply a signed delta clamped to `[0, maximum]`. Returns the change
    /// actually applied.
    pub fn apply_delta(&mut self, delta: i32) -> i32 {
        let old = self.current;
        self.current = self.current.saturating_add(delta).clamp(0, self.maximum);
        self.current - old
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        self.apply_delta(amount.max(0))
    }

    pub fn take_damage(&mut self, amount: i32) -> i32 {
        -self.apply_delta(-amount.max(0))
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Spendable resources of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub hit_points: HitPoints,
    pub honor: i32,
    pub virtues: i32,
    pub texts: i32,
    pub ryo: i32,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            hit_points: HitPoints::default(),
            honor: 10,
            virtues: 0,
            texts: 0,
            ryo: 0,
        }
    }
}

// ============================================================================
// Actors
// ============================================================================

/// Fields only enemies carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub moral: i32,
    #[serde(default)]
    pub attack: String,
    #[serde(default)]
    pub defense: String,
    #[serde(default)]
    pub special: String,
    #[serde(default)]
    pub description: String,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            moral: 12,
            attack: String::new(),
            defense: String::new(),
            special: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActorKind {
    Character,
    Enemy(EnemyProfile),
}

/// A player character or an enemy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub abilities: AbilityScores,
    pub resources: Resources,
    /// Derived; recomputed by [`crate::derived::prepare`].
    #[serde(default)]
    pub carrying_capacity: i32,
    #[serde(default)]
    pub ledger: ModifierLedger,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Actor {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            abilities: AbilityScores::default(),
            resources: Resources::default(),
            carrying_capacity: 0,
            ledger: ModifierLedger::new(),
            items: Vec::new(),
        }
    }

    pub fn character(name: impl Into<String>) -> Self {
        Self::new(name, ActorKind::Character)
    }

    pub fn enemy(name: impl Into<String>, profile: EnemyProfile) -> Self {
        Self::new(name, ActorKind::Enemy(profile))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, ActorKind::Enemy(_))
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.kind {
            ActorKind::Enemy(profile) => Some(profile),
            ActorKind::Character => None,
        }
    }

    pub fn ability(&self, ability: Ability) -> i32 {
        self.abilities.get(ability)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn find_item_by_name(&self, name: &str) -> Option<&Item> {
        let name_lower = name.to_lowercase();
        self.items
            .iter()
            .find(|i| i.name.to_lowercase() == name_lower)
    }

    pub fn class_template(&self) -> Option<&ClassTemplate> {
        self.items.iter().find_map(|i| match &i.kind {
            ItemKind::Class(template) => Some(template),
            _ => None,
        })
    }

    pub fn equipped_armor(&self) -> Option<&Armor> {
        self.items.iter().find_map(|i| match &i.kind {
            ItemKind::Armor(armor) if armor.equipped => Some(armor),
            _ => None,
        })
    }

    pub fn equipped_weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.items.iter().filter_map(|i| match &i.kind {
            ItemKind::Weapon(weapon) if weapon.equipped => Some(weapon),
            _ => None,
        })
    }

    /// Number of equipped weapons with the given hand requirement.
    pub fn equipped_weapon_count(&self, hand: Hand) -> usize {
        self.equipped_weapons().filter(|w| w.hand == hand).count()
    }
}

// ============================================================================
// Items
// ============================================================================

/// Weight class of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightClass {
    None,
    Small,
    #[default]
    Normal,
    Heavy,
}

impl WeightClass {
    /// Carrying capacity contributed by one unit.
    pub fn contribution(&self) -> i32 {
        match self {
            WeightClass::None | WeightClass::Small => 0,
            WeightClass::Normal => 1,
            WeightClass::Heavy => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponRange {
    #[default]
    Melee,
    Ranged,
}

impl WeaponRange {
    /// Ability used to attack with this range.
    pub fn ability(&self) -> Ability {
        match self {
            WeaponRange::Melee => Ability::Vigor,
            WeaponRange::Ranged => Ability::Swiftness,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumableType {
    Water,
    Food,
    #[default]
    Other,
}

/// Remaining/maximum uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Uses {
    pub value: i32,
    pub max: i32,
}

impl Uses {
    pub fn new(value: i32, max: i32) -> Self {
        Self { value, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub hand: Hand,
    #[serde(default)]
    pub range: WeaponRange,
    #[serde(default)]
    pub weight: WeightClass,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub equipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub current_category: u8,
    pub max_category: u8,
    #[serde(default)]
    pub weight: WeightClass,
    #[serde(default)]
    pub swiftness_penalty: i32,
    #[serde(default)]
    pub defense_penalty: i32,
    #[serde(default)]
    pub equipped: bool,
}

/// Highest armor category in the rule set.
pub const MAX_ARMOR_CATEGORY: u8 = 3;

impl Armor {
    /// Protection die for the current category.
    pub fn protection(&self) -> &'static str {
        protection_die(self.current_category)
    }
}

/// Protection die for an armor category.
pub fn protection_die(category: u8) -> &'static str {
    match category {
        0 => "0",
        1 => "1d2",
        2 => "1d4",
        _ => "1d6",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub quantity: i32,
    #[serde(default)]
    pub weight: WeightClass,
    #[serde(default)]
    pub uses: Uses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub quantity: i32,
    #[serde(default)]
    pub weight: WeightClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub consumable_type: ConsumableType,
    pub uses: Uses,
    pub quantity: i32,
    #[serde(default)]
    pub weight: WeightClass,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feat {
    #[serde(default)]
    pub activation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub text_type: String,
}

/// A starting gear line on a class: item name plus a quantity formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingGear {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
}

fn default_quantity() -> String {
    "1".to_string()
}

/// A class as carried by a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTemplate {
    /// Offsets added to the 3d6 rolls during generation.
    #[serde(default)]
    pub base: AbilityScores,
    #[serde(default)]
    pub base_honor: i32,
    /// Hit point dice; empty means `1d6`.
    #[serde(default)]
    pub hp: String,
    /// Virtue formula; empty means `1`.
    #[serde(default)]
    pub virtues: String,
    /// Ryo formula, may carry a multiplier; empty means `2d6`.
    #[serde(default)]
    pub ryo: String,
    /// Feats as `Name, [Table], ...`.
    #[serde(default)]
    pub feats: String,
    #[serde(default)]
    pub starting_gear: Vec<StartingGear>,
}

impl ClassTemplate {
    pub fn hp_formula(&self) -> &str {
        non_empty_or(&self.hp, "1d6")
    }

    pub fn virtues_formula(&self) -> &str {
        non_empty_or(&self.virtues, "1")
    }

    pub fn ryo_formula(&self) -> &str {
        non_empty_or(&self.ryo, "2d6")
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Kind-specific item data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon(Weapon),
    Armor(Armor),
    Gear(Gear),
    Ammo(Ammo),
    Consumable(Consumable),
    Feat(Feat),
    Text(Text),
    Class(ClassTemplate),
}

/// Kind discriminant, used for lookups and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Gear,
    Ammo,
    Consumable,
    Feat,
    Text,
    Class,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Gear => "gear",
            ItemType::Ammo => "ammo",
            ItemType::Consumable => "consumable",
            ItemType::Feat => "feat",
            ItemType::Text => "text",
            ItemType::Class => "class",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseEffect {
    Attack,
    ReadText,
    ActivateFeat,
    SpendUse,
    Unusable,
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Weapon(_) => ItemType::Weapon,
            ItemKind::Armor(_) => ItemType::Armor,
            ItemKind::Gear(_) => ItemType::Gear,
            ItemKind::Ammo(_) => ItemType::Ammo,
            ItemKind::Consumable(_) => ItemType::Consumable,
            ItemKind::Feat(_) => ItemType::Feat,
            ItemKind::Text(_) => ItemType::Text,
            ItemKind::Class(_) => ItemType::Class,
        }
    }

    /// Fill in defaults and pull fields back into range.
    pub fn normalize(&mut self) {
        match self {
            ItemKind::Weapon(weapon) => {
                if weapon.damage.trim().is_empty() {
                    weapon.damage = "1d6".to_string();
                }
                weapon.quantity = weapon.quantity.max(0);
            }
            ItemKind::Armor(armor) => {
                armor.max_category = armor.max_category.clamp(1, MAX_ARMOR_CATEGORY);
                armor.current_category = armor.current_category.min(armor.max_category);
            }
            ItemKind::Gear(gear) => {
                gear.quantity = gear.quantity.max(0);
                if gear.uses.max <= 0 {
                    gear.uses = Uses::new(1, 1);
                }
                gear.uses.value = gear.uses.value.clamp(0, gear.uses.max);
            }
            ItemKind::Ammo(ammo) => {
                ammo.quantity = ammo.quantity.max(0);
            }
            ItemKind::Consumable(consumable) => {
                consumable.quantity = consumable.quantity.max(0);
                consumable.uses.value = consumable.uses.value.max(0);
            }
            ItemKind::Text(text) => {
                if text.text_type.trim().is_empty() {
                    text.text_type = "unseen".to_string();
                }
            }
            ItemKind::Feat(_) | ItemKind::Class(_) => {}
        }
    }

    pub fn use_effect(&self) -> UseEffect {
        match self {
            ItemKind::Weapon(_) => UseEffect::Attack,
            ItemKind::Text(_) => UseEffect::ReadText,
            ItemKind::Feat(_) => UseEffect::ActivateFeat,
            ItemKind::Gear(_) | ItemKind::Consumable(_) => UseEffect::SpendUse,
            ItemKind::Armor(_) | ItemKind::Ammo(_) | ItemKind::Class(_) => UseEffect::Unusable,
        }
    }

    /// Spend one use, floored at 0. Returns the remaining uses, or `None`
    /// for kinds without uses.
    pub fn spend_use(&mut self) -> Option<i32> {
        let uses = match self {
            ItemKind::Gear(gear) => &mut gear.uses,
            ItemKind::Consumable(consumable) => &mut consumable.uses,
            _ => return None,
        };
        uses.value = (uses.value - 1).max(0);
        Some(uses.value)
    }

    /// Stack size, for kinds that stack.
    pub fn quantity(&self) -> Option<i32> {
        match self {
            ItemKind::Gear(g) => Some(g.quantity),
            ItemKind::Ammo(a) => Some(a.quantity),
            ItemKind::Consumable(c) => Some(c.quantity),
            ItemKind::Weapon(w) => Some(w.quantity),
            _ => None,
        }
    }

    /// Set the stack size, floored at 0. Returns false for kinds without one.
    pub fn set_quantity(&mut self, quantity: i32) -> bool {
        let quantity = quantity.max(0);
        match self {
            ItemKind::Gear(g) => g.quantity = quantity,
            ItemKind::Ammo(a) => a.quantity = quantity,
            ItemKind::Consumable(c) => c.quantity = quantity,
            ItemKind::Weapon(w) => w.quantity = quantity,
            _ => return false,
        }
        true
    }

    pub fn is_equipped(&self) -> bool {
        match self {
            ItemKind::Weapon(w) => w.equipped,
            ItemKind::Armor(a) => a.equipped,
            _ => false,
        }
    }
}

/// An item owned by an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        let mut item = Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            kind,
        };
        item.kind.normalize();
        item
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Carrying capacity this item adds.
    ///
    /// Stacking kinds count per unit, equipped armor counts nothing, other
    /// kinds count once.
    pub fn capacity_contribution(&self) -> i32 {
        match &self.kind {
            ItemKind::Gear(g) => g.weight.contribution().saturating_mul(g.quantity.max(0)),
            ItemKind::Ammo(a) => a.weight.contribution().saturating_mul(a.quantity.max(0)),
            ItemKind::Consumable(c) => c.weight.contribution().saturating_mul(c.quantity.max(0)),
            ItemKind::Weapon(w) => w.weight.contribution(),
            ItemKind::Armor(a) if a.equipped => 0,
            ItemKind::Armor(a) => a.weight.contribution(),
            ItemKind::Feat(_) | ItemKind::Text(_) | ItemKind::Class(_) => 0,
        }
    }

    /// A fresh copy with a new id, as when dropping a catalog entry on an actor.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ItemId::new(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

pub fn weapon(name: &str, damage: &str, hand: Hand, range: WeaponRange) -> Item {
    Item::new(
        name,
        ItemKind::Weapon(Weapon {
            damage: damage.to_string(),
            hand,
            range,
            weight: WeightClass::Normal,
            quantity: 1,
            equipped: false,
        }),
    )
}

pub fn armor(name: &str, max_category: u8, swiftness_penalty: i32) -> Item {
    Item::new(
        name,
        ItemKind::Armor(Armor {
            current_category: max_category,
            max_category,
            weight: WeightClass::Heavy,
            swiftness_penalty,
            defense_penalty: 0,
            equipped: false,
        }),
    )
}

pub fn consumable(name: &str, consumable_type: ConsumableType, uses: i32, quantity: i32) -> Item {
    Item::new(
        name,
        ItemKind::Consumable(Consumable {
            consumable_type,
            uses: Uses::new(uses, uses.max(1)),
            quantity,
            weight: WeightClass::Normal,
        }),
    )
}

pub fn gear(name: &str, quantity: i32, weight: WeightClass) -> Item {
    Item::new(
        name,
        ItemKind::Gear(Gear {
            quantity,
            weight,
            uses: Uses::default(),
        }),
    )
}

/// A sample character for tests and demos.
pub fn create_sample_ronin(name: &str) -> Actor {
    let mut actor = Actor::character(name);
    actor.abilities = AbilityScores::new(1, 0, 1, 0);
    actor.resources = Resources {
        hit_points: HitPoints::new(11),
        honor: 10,
        virtues: 1,
        texts: 2,
        ryo: 7,
    };
    actor.items.push(Item::new(
        "Ronin",
        ItemKind::Class(ClassTemplate {
            virtues: "1d4".to_string(),
            ..ClassTemplate::default()
        }),
    ));
    actor.items.push(weapon("Katana", "1d8", Hand::One, WeaponRange::Melee));
    actor
        .items
        .push(consumable("Water Gourd", ConsumableType::Water, 3, 1));
    actor
        .items
        .push(consumable("Rice Ball", ConsumableType::Food, 3, 1));
    actor
}

/// A sample enemy for tests and demos.
pub fn create_sample_bandit(name: &str) -> Actor {
    let mut actor = Actor::enemy(
        name,
        EnemyProfile {
            moral: 7,
            attack: "Yari 1d8".to_string(),
            ..EnemyProfile::default()
        },
    );
    actor.resources.hit_points = HitPoints::new(6);
    actor.abilities = AbilityScores::new(1, 1, 0, 0);
    actor
}
