//! Random character generation.
//!
//! A [`CharacterBuilder`] collects the player's choices (name, alignment
//! and candidate classes). [`RulesEngine::generate_character`] rolls
//! everything else: the class, abilities, Honor, HP, texts, virtues, ryo,
//! feats and starting gear.

use crate::dice::DiceExpression;
use crate::error::RollError;
use crate::host::TableEntry;
use crate::resources::ResourceEngine;
use crate::rules::{Resolution, RulesEngine};
use crate::world::{
    Ability, AbilityScores, Actor, ClassTemplate, HitPoints, Item, ItemKind, ItemType, Resources,
};
use serde::{Deserialize, Serialize};

const ACTION: &str = "Character generation";

/// Standing the character starts with. Shifts every 3d6 roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Honored,
    #[default]
    Normal,
    Dishonored,
}

impl Alignment {
    pub fn modifier(&self) -> i32 {
        match self {
            Alignment::Honored => 1,
            Alignment::Normal => 0,
            Alignment::Dishonored => -1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Alignment::Honored => "Honored",
            Alignment::Normal => "Normal",
            Alignment::Dishonored => "Dishonored",
        }
    }

    pub fn all() -> &'static [Alignment] {
        &[Alignment::Honored, Alignment::Normal, Alignment::Dishonored]
    }
}

/// Convert a raw 3d6 total into an ability score.
pub fn band(raw: i32) -> i32 {
    match raw {
        i32::MIN..=4 => -3,
        5..=6 => -2,
        7..=8 => -1,
        9..=12 => 0,
        13..=14 => 1,
        15..=16 => 2,
        _ => 3,
    }
}

/// Where a class feat comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatSource {
    /// Looked up by name.
    Named(String),
    /// Drawn from a roll table.
    Table(String),
}

/// Parse a class feat list such as `Iaijutsu, [Ronin Feats]`.
pub fn parse_feat_list(text: &str) -> Vec<FeatSource> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            match part
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                Some(table) => FeatSource::Table(table.trim().to_string()),
                None => FeatSource::Named(part.to_string()),
            }
        })
        .collect()
}

/// Player choices for a new character.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    alignment: Alignment,
    classes: Vec<Item>,
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    MissingName,
    NoClasses,
    NotAClass(String),
}

impl std::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::MissingName => write!(f, "Character name is required"),
            BuilderError::NoClasses => write!(f, "Select at least one class"),
            BuilderError::NotAClass(name) => write!(f, "{name} is not a class"),
        }
    }
}

impl std::error::Error for BuilderError {}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Add a candidate class. One is picked at random.
    pub fn class(mut self, class: Item) -> Self {
        self.classes.push(class);
        self
    }

    pub fn classes(mut self, classes: impl IntoIterator<Item = Item>) -> Self {
        self.classes.extend(classes);
        self
    }

    pub fn validate(&self) -> Result<(), BuilderError> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => {}
            _ => return Err(BuilderError::MissingName),
        }
        if self.classes.is_empty() {
            return Err(BuilderError::NoClasses);
        }
        if let Some(item) = self
            .classes
            .iter()
            .find(|item| item.item_type() != ItemType::Class)
        {
            return Err(BuilderError::NotAClass(item.name.clone()));
        }
        Ok(())
    }
}

impl RulesEngine {
    /// Roll up a new character and store it through the host.
    pub async fn generate_character(
        &self,
        builder: CharacterBuilder,
    ) -> Result<Resolution, RollError> {
        let name = builder.name.clone().unwrap_or_default();
        let result = self.resolve_generation(builder).await;
        self.conclude(ACTION, None, &name, result).await
    }

    async fn resolve_generation(&self, builder: CharacterBuilder) -> Result<Resolution, RollError> {
        builder.validate()?;
        let CharacterBuilder {
            name,
            alignment,
            mut classes,
        } = builder;
        let name = name.unwrap_or_default();
        let shift = alignment.modifier();
        let mut tx = self.resources();
        let mut lines = Vec::new();

        let index = if classes.len() > 1 {
            let sides = u32::try_from(classes.len()).unwrap_or(u32::MAX);
            let pick = self
                .roll(&mut tx, &DiceExpression::check(sides, 0), "class")
                .await?;
            usize::try_from(pick.total - 1).unwrap_or(0).min(classes.len() - 1)
        } else {
            0
        };
        let class_item = classes.swap_remove(index).duplicate();
        let template = match &class_item.kind {
            ItemKind::Class(template) => template.clone(),
            _ => ClassTemplate::default(),
        };
        lines.push(format!("{} ({})", class_item.name, alignment.name()));

        let mut abilities = AbilityScores::default();
        for ability in Ability::all() {
            let roll = self
                .roll_formula(&mut tx, "3d6", ability.name())
                .await?;
            let raw = roll.total + template.base.get(ability) + shift;
            abilities.set(ability, band(raw));
            lines.push(format!("{ability} {:+} ({raw})", abilities.get(ability)));
        }

        let honor_roll = self.roll_formula(&mut tx, "3d6", "honor").await?;
        let honor = self
            .config()
            .honor
            .clamp(honor_roll.total + template.base_honor + shift);

        let hp_roll = self
            .roll_formula(&mut tx, template.hp_formula(), "hit points")
            .await?;
        let hp = (abilities.resilience + hp_roll.total).max(1);

        let texts_roll = self.roll_formula(&mut tx, "1d4", "texts").await?;
        let texts = (abilities.spirit + texts_roll.total).max(0);

        let virtues = self
            .roll_formula(&mut tx, template.virtues_formula(), "virtues")
            .await?
            .total
            .max(0);
        let ryo = self
            .roll_formula(&mut tx, template.ryo_formula(), "ryo")
            .await?
            .total
            .max(0);
        lines.push(format!(
            "Honor {honor}, HP {hp}, texts {texts}, virtues {virtues}, ryo {ryo}"
        ));

        let mut actor = Actor::character(name.clone());
        actor.abilities = abilities;
        actor.resources = Resources {
            hit_points: HitPoints::new(hp),
            honor,
            virtues,
            texts,
            ryo,
        };
        let actor = self.services().actors.create_actor(actor).await?;
        tracing::info!(actor = %name, class = %class_item.name, "character created");
        let mut actor = tx.add_item(&actor, class_item).await?;

        let mut feats = Vec::new();
        for source in parse_feat_list(&template.feats) {
            if let Some(feat) = self.resolve_feat(&mut tx, &source).await? {
                feats.push(feat.name.clone());
                actor = tx.add_item(&actor, feat).await?;
            }
        }
        if !feats.is_empty() {
            lines.push(format!("Feats: {}", feats.join(", ")));
        }

        let mut gear = Vec::new();
        for entry in &template.starting_gear {
            let Some(found) = self.services().catalog.find(&entry.name, None).await? else {
                self.lookup_missed(&mut tx, &format!("starting gear \"{}\"", entry.name));
                continue;
            };
            let mut item = found.duplicate();
            let quantity = self.roll_quantity(&mut tx, &entry.quantity, &entry.name).await?;
            item.kind.set_quantity(quantity);
            gear.push(format!("{} x{quantity}", item.name));
            actor = tx.add_item(&actor, item).await?;
        }
        if !gear.is_empty() {
            lines.push(format!("Gear: {}", gear.join(", ")));
        }

        let summary = format!("{} is born: {}", actor.name, lines.join("; "));
        Ok(Resolution::new(ACTION, summary)
            .for_actor(actor.id)
            .with_effects(tx.into_effects()))
    }

    /// A feat by name or from a table. Misses are warned about and skipped.
    async fn resolve_feat(
        &self,
        tx: &mut ResourceEngine<'_>,
        source: &FeatSource,
    ) -> Result<Option<Item>, RollError> {
        let name = match source {
            FeatSource::Named(name) => name.clone(),
            FeatSource::Table(table) => match self.draw_table(tx, table).await? {
                Some(TableEntry::Item(item)) => return Ok(Some(item.duplicate())),
                Some(TableEntry::Text(name)) => name,
                None => return Ok(None),
            },
        };
        match self
            .services()
            .catalog
            .find(&name, Some(ItemType::Feat))
            .await?
        {
            Some(feat) => Ok(Some(feat.duplicate())),
            None => {
                self.lookup_missed(tx, &format!("feat \"{name}\""));
                Ok(None)
            }
        }
    }

    /// Starting gear quantities may be flat (`3`) or rolled (`1d4`).
    async fn roll_quantity(
        &self,
        tx: &mut ResourceEngine<'_>,
        formula: &str,
        item: &str,
    ) -> Result<i32, RollError> {
        let expression = DiceExpression::parse_lenient(formula);
        if expression.dice_count() == 0 {
            return Ok(expression.maximum().max(0));
        }
        let roll = self
            .roll(tx, &expression, &format!("{item} quantity"))
            .await?;
        Ok(roll.total.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(band(3), -3);
        assert_eq!(band(4), -3);
        assert_eq!(band(5), -2);
        assert_eq!(band(6), -2);
        assert_eq!(band(8), -1);
        assert_eq!(band(9), 0);
        assert_eq!(band(12), 0);
        assert_eq!(band(13), 1);
        assert_eq!(band(16), 2);
        assert_eq!(band(17), 3);
        assert_eq!(band(20), 3);
    }

    #[test]
    fn test_parse_feat_list() {
        let feats = parse_feat_list("Iaijutsu,  [Ronin Feats] , ,Zen Archery");
        assert_eq!(
            feats,
            vec![
                FeatSource::Named("Iaijutsu".into()),
                FeatSource::Table("Ronin Feats".into()),
                FeatSource::Named("Zen Archery".into()),
            ]
        );
        assert!(parse_feat_list("").is_empty());
    }

    #[test]
    fn test_alignment_modifiers() {
        assert_eq!(Alignment::Honored.modifier(), 1);
        assert_eq!(Alignment::default().modifier(), 0);
        assert_eq!(Alignment::Dishonored.modifier(), -1);
        assert_eq!(Alignment::all().len(), 3);
    }

    #[test]
    fn test_missing_name_error() {
        let class = Item::new("Ronin", ItemKind::Class(ClassTemplate::default()));
        let result = CharacterBuilder::new().class(class).validate();
        assert_eq!(result, Err(BuilderError::MissingName));
    }

    #[test]
    fn test_non_class_candidate_rejected() {
        let sword = crate::world::weapon(
            "Katana",
            "1d8",
            crate::world::Hand::One,
            crate::world::WeaponRange::Melee,
        );
        let result = CharacterBuilder::new().name("Jubei").class(sword).validate();
        assert_eq!(result, Err(BuilderError::NotAClass("Katana".into())));
        assert_eq!(
            CharacterBuilder::new().name("Jubei").validate(),
            Err(BuilderError::NoClasses)
        );
    }
}
