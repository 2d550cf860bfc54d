//! Equipment slots, armor categories, carrying capacity and item use.

use ronin_core::catalog;
use ronin_core::rules::{Effect, TextRequest};
use ronin_core::testing::{assert_effect, assert_rejected, assert_resolved, TestHarness};
use ronin_core::world::{
    armor, gear, weapon, Actor, Hand, ItemId, ItemKind, WeaponRange, WeightClass,
};
use ronin_core::Rejection;

fn id_of(actor: &Actor, name: &str) -> ItemId {
    actor.find_item_by_name(name).map(|i| i.id).unwrap()
}

fn armed(name: &str) -> Actor {
    let mut actor = Actor::character(name);
    actor
        .items
        .push(weapon("Katana", "1d8", Hand::One, WeaponRange::Melee));
    actor
        .items
        .push(weapon("Wakizashi", "1d6", Hand::One, WeaponRange::Melee));
    actor
        .items
        .push(weapon("Tanto", "1d4", Hand::One, WeaponRange::Melee));
    actor
        .items
        .push(weapon("Nodachi", "1d10", Hand::Two, WeaponRange::Melee));
    actor
}

// =============================================================================
// Weapon and armor slots
// =============================================================================

#[tokio::test]
async fn test_third_one_handed_weapon_is_rejected() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(armed("Jubei")).await.unwrap();

    for name in ["Katana", "Wakizashi"] {
        let resolution = harness
            .engine
            .toggle_equipped(actor.id, id_of(&actor, name))
            .await
            .unwrap();
        assert_resolved(&resolution);
    }
    let resolution = harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Tanto"))
        .await
        .unwrap();
    assert_rejected(&resolution, &Rejection::WeaponSlotsFull);

    let stored = harness.actor(actor.id).await.unwrap();
    assert!(!stored.find_item_by_name("Tanto").unwrap().kind.is_equipped());
}

#[tokio::test]
async fn test_two_handed_weapon_needs_free_hands() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(armed("Jubei")).await.unwrap();
    harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Katana"))
        .await
        .unwrap();

    let resolution = harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Nodachi"))
        .await
        .unwrap();
    assert_rejected(&resolution, &Rejection::HandsOccupied);

    // Unequipping is always allowed, and frees the hands.
    harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Katana"))
        .await
        .unwrap();
    let resolution = harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Nodachi"))
        .await
        .unwrap();
    assert_resolved(&resolution);
}

#[tokio::test]
async fn test_second_armor_is_rejected() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(armor("Do-maru", 2, 1));
    actor.items.push(armor("O-yoroi", 3, 2));
    let actor = harness.add_actor(actor).await.unwrap();

    harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Do-maru"))
        .await
        .unwrap();
    let resolution = harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "O-yoroi"))
        .await
        .unwrap();
    assert_rejected(&resolution, &Rejection::ArmorAlreadyEquipped);
}

#[tokio::test]
async fn test_armor_category_above_max_is_rejected() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(armor("Do-maru", 2, 1));
    let actor = harness.add_actor(actor).await.unwrap();
    let domaru = id_of(&actor, "Do-maru");

    let resolution = harness
        .engine
        .set_armor_category(actor.id, domaru, 3)
        .await
        .unwrap();
    assert_rejected(
        &resolution,
        &Rejection::CategoryAboveMax {
            requested: 3,
            max: 2,
        },
    );

    let resolution = harness
        .engine
        .set_armor_category(actor.id, domaru, 1)
        .await
        .unwrap();
    assert!(resolution.summary.contains("1d2"));
    let stored = harness.actor(actor.id).await.unwrap();
    match &stored.item(domaru).unwrap().kind {
        ItemKind::Armor(a) => assert_eq!(a.current_category, 1),
        other => panic!("expected armor, got {other:?}"),
    }
}

// =============================================================================
// Carrying capacity
// =============================================================================

#[tokio::test]
async fn test_capacity_follows_quantities() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(gear("Rope", 12, WeightClass::Normal));
    actor.items.push(gear("Prayer Beads", 5, WeightClass::None));
    let actor = harness.add_actor(actor).await.unwrap();
    assert_eq!(actor.carrying_capacity, 12);

    harness
        .engine
        .set_item_quantity(actor.id, id_of(&actor, "Rope"), 4)
        .await
        .unwrap();
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.carrying_capacity, 4);

    let resolution = harness
        .engine
        .set_item_quantity(actor.id, id_of(&actor, "Rope"), -3)
        .await
        .unwrap();
    assert!(resolution.summary.contains("0 Rope"));
}

#[tokio::test]
async fn test_equipped_armor_carries_no_weight() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(armor("O-yoroi", 3, 2));
    let actor = harness.add_actor(actor).await.unwrap();
    assert_eq!(actor.carrying_capacity, 2);

    harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "O-yoroi"))
        .await
        .unwrap();
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.carrying_capacity, 0);
}

#[tokio::test]
async fn test_feats_have_no_quantity() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(Actor::character("Jubei")).await.unwrap();
    let feat = catalog::find_item("Iaijutsu", None).unwrap();
    let feat_id = feat.id;
    harness.engine.add_item(actor.id, feat).await.unwrap();

    let resolution = harness
        .engine
        .set_item_quantity(actor.id, feat_id, 2)
        .await
        .unwrap();
    assert!(matches!(
        resolution.rejection,
        Some(Rejection::NoQuantity { .. })
    ));
}

// =============================================================================
// Items entering, leaving and being used
// =============================================================================

#[tokio::test]
async fn test_second_class_is_rejected() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(Actor::character("Jubei")).await.unwrap();
    let first = harness
        .engine
        .add_item(actor.id, catalog::find_class("Ronin").unwrap())
        .await
        .unwrap();
    assert_resolved(&first);

    let second = harness
        .engine
        .add_item(actor.id, catalog::find_class("Sohei").unwrap())
        .await
        .unwrap();
    assert_rejected(&second, &Rejection::ClassAlreadyAssigned);
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.items.len(), 1);
}

#[tokio::test]
async fn test_remove_item() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(armed("Jubei")).await.unwrap();
    let tanto = id_of(&actor, "Tanto");
    let resolution = harness.engine.remove_item(actor.id, tanto).await.unwrap();
    assert_effect(&resolution, "removal", |e| {
        matches!(e, Effect::ItemRemoved { .. })
    });

    let again = harness.engine.remove_item(actor.id, tanto).await.unwrap();
    assert_rejected(&again, &Rejection::MissingItem { item: tanto });
}

#[tokio::test]
async fn test_using_consumables_until_empty() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(catalog::find_item("Healing Herbs", None).unwrap());
    let actor = harness.add_actor(actor).await.unwrap();
    let herbs = id_of(&actor, "Healing Herbs");

    let resolution = harness.engine.use_item(actor.id, herbs).await.unwrap();
    assert_effect(&resolution, "consumption", |e| {
        matches!(e, Effect::ConsumableUsed { remaining: 0, .. })
    });
    let resolution = harness.engine.use_item(actor.id, herbs).await.unwrap();
    assert_rejected(&resolution, &Rejection::NoUsesLeft);
}

#[tokio::test]
async fn test_using_a_feat_activates_it() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(catalog::find_item("Iron Body", None).unwrap());
    let actor = harness.add_actor(actor).await.unwrap();

    let resolution = harness
        .engine
        .use_item(actor.id, id_of(&actor, "Iron Body"))
        .await
        .unwrap();
    assert_effect(&resolution, "feat", |e| {
        matches!(e, Effect::FeatActivated { name, .. } if name == "Iron Body")
    });
    assert!(resolution.rolls().next().is_none());
}

#[tokio::test]
async fn test_armor_cannot_be_used() {
    let harness = TestHarness::new();
    let mut actor = Actor::character("Jubei");
    actor.items.push(armor("Do-maru", 2, 1));
    let actor = harness.add_actor(actor).await.unwrap();
    let resolution = harness
        .engine
        .use_item(actor.id, id_of(&actor, "Do-maru"))
        .await
        .unwrap();
    assert!(matches!(
        resolution.rejection,
        Some(Rejection::NotUsable { .. })
    ));
}

// =============================================================================
// Texts
// =============================================================================

fn scholar(name: &str) -> Actor {
    let mut actor = armed(name);
    actor.abilities.spirit = 2;
    actor.resources.texts = 2;
    actor.resources.hit_points = ronin_core::world::HitPoints::new(6);
    actor.items.push(catalog::find_item("Heart Sutra", None).unwrap());
    actor
}

#[tokio::test]
async fn test_reading_a_text_spends_it() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(scholar("Benkei")).await.unwrap();
    harness.queue(&[12]);
    let resolution = harness
        .engine
        .use_item(actor.id, id_of(&actor, "Heart Sutra"))
        .await
        .unwrap();
    assert_resolved(&resolution);
    assert_eq!(resolution.total, Some(14));
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.resources.texts, 1);
    assert_eq!(stored.resources.hit_points.current, 6);
}

#[tokio::test]
async fn test_failed_text_costs_hp() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(scholar("Benkei")).await.unwrap();
    harness.queue(&[5, 2]);
    harness
        .engine
        .use_text(actor.id, TextRequest::default())
        .await
        .unwrap();
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.resources.hit_points.current, 4);
    assert_eq!(stored.resources.texts, 1);
}

#[tokio::test]
async fn test_fumbled_text_draws_kamis_revenge() {
    let harness = TestHarness::new();
    harness
        .host
        .add_table(
            "Kami's Revenge",
            vec![ronin_core::host::TableEntry::Text("Struck mute".into())],
        )
        .await;
    let actor = harness.add_actor(scholar("Benkei")).await.unwrap();
    harness.queue(&[1]);
    let resolution = harness
        .engine
        .use_text(actor.id, TextRequest::default())
        .await
        .unwrap();
    assert!(resolution.summary.contains("Struck mute"));
    let stored = harness.actor(actor.id).await.unwrap();
    assert_eq!(stored.resources.hit_points.current, 6);
    assert_eq!(stored.resources.texts, 1);
}

#[tokio::test]
async fn test_texts_need_free_hands() {
    let harness = TestHarness::new();
    let actor = harness.add_actor(scholar("Benkei")).await.unwrap();
    harness
        .engine
        .toggle_equipped(actor.id, id_of(&actor, "Nodachi"))
        .await
        .unwrap();
    let resolution = harness
        .engine
        .use_text(actor.id, TextRequest::default())
        .await
        .unwrap();
    assert_rejected(&resolution, &Rejection::TwoHandedWeaponEquipped);
}

#[tokio::test]
async fn test_no_texts_left() {
    let harness = TestHarness::new();
    let mut actor = scholar("Benkei");
    actor.resources.texts = 0;
    let actor = harness.add_actor(actor).await.unwrap();
    let resolution = harness
        .engine
        .use_text(actor.id, TextRequest::default())
        .await
        .unwrap();
    assert_rejected(&resolution, &Rejection::NoTextsLeft);
}
