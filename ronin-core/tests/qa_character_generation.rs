//! Random character generation from class templates.

use ronin_core::catalog;
use ronin_core::character_builder::{Alignment, BuilderError, CharacterBuilder};
use ronin_core::rules::Effect;
use ronin_core::testing::{assert_effect, assert_resolved, TestHarness};
use ronin_core::world::{ItemKind, ItemType};
use ronin_core::RollError;

/// Faces for a lone Ronin: four abilities, Honor, HP, texts, virtues,
/// ryo and the rice ball count.
const RONIN_FACES: &[u32] = &[
    4, 4, 4, // vigor 12 + 1 class
    3, 3, 3, // swiftness 9
    6, 6, 5, // spirit 17
    2, 2, 2, // resilience 6
    3, 3, 4, // honor 10
    5, // hp 1d8
    2, // texts 1d4
    2, // virtues 1d2
    3, 4, // ryo 2d6
    2, // rice balls 1d2
];

#[tokio::test]
async fn test_generate_ronin() {
    let harness = TestHarness::new();
    harness.queue(RONIN_FACES);
    let builder = CharacterBuilder::new()
        .name("Jubei")
        .class(catalog::find_class("Ronin").unwrap());

    let resolution = harness.engine.generate_character(builder).await.unwrap();
    assert_resolved(&resolution);
    assert_eq!(harness.dice.remaining(), 0);

    let actor = harness.actor(resolution.actor.unwrap()).await.unwrap();
    assert_eq!(actor.name, "Jubei");
    assert_eq!(actor.abilities.vigor, 1);
    assert_eq!(actor.abilities.swiftness, 0);
    assert_eq!(actor.abilities.spirit, 3);
    assert_eq!(actor.abilities.resilience, -2);
    assert_eq!(actor.resources.honor, 10);
    // Rolled HP is current; the maximum is 10 + vigor + resilience.
    assert_eq!(actor.resources.hit_points.current, 3);
    assert_eq!(actor.resources.hit_points.maximum, 9);
    assert_eq!(actor.resources.texts, 5);
    assert_eq!(actor.resources.virtues, 2);
    assert_eq!(actor.resources.ryo, 7);

    assert!(actor.class_template().is_some());
    let feat = actor.find_item_by_name("Iaijutsu").unwrap();
    assert_eq!(feat.item_type(), ItemType::Feat);
    let rice = actor.find_item_by_name("Rice Ball").unwrap();
    assert_eq!(rice.kind.quantity(), Some(2));
    assert!(actor.find_item_by_name("Straw Hat").is_some());
    assert_eq!(actor.items.len(), 6);

    // The class feat table is not registered.
    assert_effect(&resolution, "missed table", |e| {
        matches!(e, Effect::LookupMissed { what } if what.contains("Ronin Feats"))
    });
    assert_eq!(harness.host.warnings().len(), 1);
}

#[tokio::test]
async fn test_feat_table_supplies_a_feat() {
    let harness = TestHarness::new();
    harness
        .host
        .add_table(
            "Ronin Feats",
            vec![ronin_core::host::TableEntry::Text("Ki Strike".into())],
        )
        .await;
    harness.queue(RONIN_FACES);
    let builder = CharacterBuilder::new()
        .name("Jubei")
        .class(catalog::find_class("Ronin").unwrap());

    let resolution = harness.engine.generate_character(builder).await.unwrap();
    let actor = harness.actor(resolution.actor.unwrap()).await.unwrap();
    assert!(actor.find_item_by_name("Ki Strike").is_some());
    assert!(harness.host.warnings().is_empty());
}

#[tokio::test]
async fn test_alignment_shifts_rolls() {
    let harness = TestHarness::new();
    harness.queue(RONIN_FACES);
    let builder = CharacterBuilder::new()
        .name("Jubei")
        .alignment(Alignment::Honored)
        .class(catalog::find_class("Ronin").unwrap());

    let resolution = harness.engine.generate_character(builder).await.unwrap();
    let actor = harness.actor(resolution.actor.unwrap()).await.unwrap();
    // Swiftness 9 + 1 stays in band; resilience 6 + 1 moves up a band.
    assert_eq!(actor.abilities.swiftness, 0);
    assert_eq!(actor.abilities.resilience, -1);
    assert_eq!(actor.resources.honor, 11);
}

#[tokio::test]
async fn test_class_is_picked_from_candidates() {
    let harness = TestHarness::new();
    // 1d2 picks the second candidate, then the Shinobi rolls.
    let mut faces = vec![2];
    faces.extend_from_slice(&[3; 15]);
    faces.extend_from_slice(&[1; 5]);
    harness.queue(&faces);
    let builder = CharacterBuilder::new()
        .name("Kage")
        .class(catalog::find_class("Ronin").unwrap())
        .class(catalog::find_class("Shinobi").unwrap());

    let resolution = harness.engine.generate_character(builder).await.unwrap();
    assert_eq!(harness.dice.remaining(), 0);
    let actor = harness.actor(resolution.actor.unwrap()).await.unwrap();
    let class = actor
        .items
        .iter()
        .find(|i| matches!(i.kind, ItemKind::Class(_)))
        .unwrap();
    assert_eq!(class.name, "Shinobi");
    // 2d6*2 ryo.
    assert_eq!(actor.resources.ryo, 4);
    // Honor 9 - 2 for the Shinobi.
    assert_eq!(actor.resources.honor, 7);
}

#[tokio::test]
async fn test_missing_name_is_an_error() {
    let harness = TestHarness::new();
    let builder = CharacterBuilder::new().class(catalog::find_class("Ronin").unwrap());
    let result = harness.engine.generate_character(builder).await;
    assert!(matches!(
        result,
        Err(RollError::Builder(BuilderError::MissingName))
    ));
    assert_eq!(harness.host.errors().len(), 1);
}
