//! Testing utilities for the rules engine.
//!
//! This module provides tools for integration testing:
//! - `InMemoryHost` implements every host service over plain maps
//! - `ScriptedDice` returns die faces from a queue
//! - `TestHarness` wires a `RulesEngine` over both
//! - Assertion helpers for resolutions and actors

use crate::catalog;
use crate::config::{RulesConfig, StaticSettings};
use crate::derived;
use crate::dice::{DiceExpression, RollResult};
use crate::error::{HostError, Rejection};
use crate::host::{
    ActorRepository, ChatLog, DiceRoller, ItemCatalog, Notifier, RollTables, Services, TableEntry,
};
use crate::outcome::Classification;
use crate::resources::{apply_update, ActorUpdate};
use crate::rules::{Effect, Resolution, RulesEngine};
use crate::world::{Actor, ActorId, Item, ItemType};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tokio::sync::Mutex;

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Severity of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

struct Table {
    entries: Vec<TableEntry>,
    next: usize,
}

/// A host kept entirely in memory.
///
/// Actor writes run `derived::prepare` afterwards, as a real host
/// recomputes derived data on every save. Tables hand out their entries
/// in order and wrap around.
pub struct InMemoryHost {
    actors: Mutex<HashMap<ActorId, Actor>>,
    tables: Mutex<HashMap<String, Table>>,
    items: Mutex<Vec<Item>>,
    posted: Mutex<Vec<Resolution>>,
    notices: StdMutex<Vec<Notice>>,
    config: RulesConfig,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self {
            actors: Mutex::new(HashMap::new()),
            tables: Mutex::new(HashMap::new()),
            items: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
            notices: StdMutex::new(Vec::new()),
            config,
        }
    }

    /// Register a roll table.
    pub async fn add_table(&self, name: impl Into<String>, entries: Vec<TableEntry>) {
        self.tables
            .lock()
            .await
            .insert(name.into(), Table { entries, next: 0 });
    }

    /// Add a compendium entry, searched before the standard catalog.
    pub async fn add_catalog_item(&self, item: Item) {
        self.items.lock().await.push(item);
    }

    /// Everything posted to the chat log, oldest first.
    pub async fn posted(&self) -> Vec<Resolution> {
        self.posted.lock().await.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(NoticeLevel::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NoticeLevel::Error)
    }

    fn messages(&self, level: NoticeLevel) -> Vec<String> {
        lock(&self.notices)
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        lock(&self.notices).push(Notice {
            level,
            message: message.to_string(),
        });
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorRepository for InMemoryHost {
    async fn actor(&self, id: ActorId) -> Result<Option<Actor>, HostError> {
        Ok(self.actors.lock().await.get(&id).cloned())
    }

    async fn create_actor(&self, mut actor: Actor) -> Result<Actor, HostError> {
        derived::prepare(&mut actor, &self.config);
        self.actors.lock().await.insert(actor.id, actor.clone());
        Ok(actor)
    }

    async fn update_actor(
        &self,
        id: ActorId,
        updates: Vec<ActorUpdate>,
    ) -> Result<Actor, HostError> {
        let mut actors = self.actors.lock().await;
        let stored = actors.get_mut(&id).ok_or(HostError::ActorNotFound(id))?;
        let mut actor = stored.clone();
        for update in &updates {
            apply_update(&mut actor, update)?;
        }
        derived::prepare(&mut actor, &self.config);
        *stored = actor.clone();
        Ok(actor)
    }
}

#[async_trait]
impl RollTables for InMemoryHost {
    async fn draw(&self, table: &str) -> Result<Option<TableEntry>, HostError> {
        let mut tables = self.tables.lock().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(None);
        };
        if table.entries.is_empty() {
            return Ok(None);
        }
        let entry = table.entries[table.next % table.entries.len()].clone();
        table.next += 1;
        Ok(Some(entry))
    }
}

#[async_trait]
impl ItemCatalog for InMemoryHost {
    async fn find(&self, name: &str, kind: Option<ItemType>) -> Result<Option<Item>, HostError> {
        let items = self.items.lock().await;
        let found = items
            .iter()
            .filter(|item| kind.map_or(true, |k| item.item_type() == k))
            .find(|item| item.name.eq_ignore_ascii_case(name.trim()))
            .map(Item::duplicate);
        Ok(found.or_else(|| catalog::find_item(name, kind)))
    }
}

#[async_trait]
impl ChatLog for InMemoryHost {
    async fn post(&self, resolution: &Resolution) -> Result<(), HostError> {
        self.posted.lock().await.push(resolution.clone());
        Ok(())
    }
}

impl Notifier for InMemoryHost {
    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NoticeLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Dice that return queued faces in order.
///
/// Rolling more dice than are queued fails with
/// [`HostError::Unavailable`] instead of inventing a face.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    faces: StdMutex<VecDeque<u32>>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, faces: &[u32]) {
        lock(&self.faces).extend(faces.iter().copied());
    }

    pub fn remaining(&self) -> usize {
        lock(&self.faces).len()
    }
}

#[async_trait]
impl DiceRoller for ScriptedDice {
    async fn roll(&self, expression: &DiceExpression) -> Result<RollResult, HostError> {
        let mut faces = lock(&self.faces);
        let needed = expression.dice_count() as usize;
        if faces.len() < needed {
            return Err(HostError::Unavailable(format!(
                "scripted dice exhausted rolling {expression}"
            )));
        }
        Ok(expression.roll_with(|_| faces.pop_front().unwrap_or(1)))
    }
}

/// Test harness for running roll procedures.
pub struct TestHarness {
    pub host: Arc<InMemoryHost>,
    pub dice: Arc<ScriptedDice>,
    pub engine: RulesEngine,
}

impl TestHarness {
    /// Default rules and settings (no solo mode, consumables deducted).
    pub fn new() -> Self {
        Self::build(RulesConfig::default(), StaticSettings::default())
    }

    pub fn with_settings(settings: StaticSettings) -> Self {
        Self::build(RulesConfig::default(), settings)
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self::build(config, StaticSettings::default())
    }

    fn build(config: RulesConfig, settings: StaticSettings) -> Self {
        let host = Arc::new(InMemoryHost::with_config(config.clone()));
        let dice = Arc::new(ScriptedDice::new());
        let services = Services::from_host(host.clone(), dice.clone(), Arc::new(settings));
        Self {
            host,
            dice,
            engine: RulesEngine::new(services, config),
        }
    }

    /// Queue die faces for the next rolls.
    pub fn queue(&self, faces: &[u32]) -> &Self {
        self.dice.push(faces);
        self
    }

    pub async fn add_actor(&self, actor: Actor) -> Result<Actor, HostError> {
        self.host.create_actor(actor).await
    }

    pub async fn actor(&self, id: ActorId) -> Option<Actor> {
        self.host.actor(id).await.ok().flatten()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert an actor's HP.
#[track_caller]
pub fn assert_hp(actor: &Actor, current: i32, max: i32) {
    let hp = actor.resources.hit_points;
    assert_eq!(
        (hp.current, hp.maximum),
        (current, max),
        "Expected HP {current}/{max}, got {}/{}",
        hp.current,
        hp.maximum
    );
}

/// Assert a resolution was rejected for the given reason.
#[track_caller]
pub fn assert_rejected(resolution: &Resolution, expected: &Rejection) {
    assert_eq!(
        resolution.rejection.as_ref(),
        Some(expected),
        "Expected rejection {expected:?}, got {:?} ({})",
        resolution.rejection,
        resolution.summary
    );
}

/// Assert a resolution went through.
#[track_caller]
pub fn assert_resolved(resolution: &Resolution) {
    assert!(
        !resolution.is_rejected(),
        "Expected a resolution, got rejection: {}",
        resolution.summary
    );
}

#[track_caller]
pub fn assert_classification(resolution: &Resolution, expected: Classification) {
    assert_eq!(
        resolution.classification,
        Some(expected),
        "Unexpected outcome for: {}",
        resolution.summary
    );
}

/// Assert at least one effect matches.
#[track_caller]
pub fn assert_effect(resolution: &Resolution, what: &str, predicate: impl Fn(&Effect) -> bool) {
    assert!(
        resolution.effects.iter().any(predicate),
        "Expected a {what} effect in {:?}",
        resolution.effects
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{create_sample_ronin, Ability};

    #[tokio::test]
    async fn test_scripted_dice_run_out() {
        let dice = ScriptedDice::new();
        dice.push(&[4, 5]);
        let expr = DiceExpression::parse("2d6+1").unwrap();
        let roll = dice.roll(&expr).await.unwrap();
        assert_eq!(roll.total, 10);
        assert_eq!(dice.remaining(), 0);
        assert!(matches!(
            dice.roll(&expr).await,
            Err(HostError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_tables_cycle() {
        let host = InMemoryHost::new();
        host.add_table(
            "Moral",
            vec![
                TableEntry::Text("Flee".into()),
                TableEntry::Text("Surrender".into()),
            ],
        )
        .await;
        let first = host.draw("Moral").await.unwrap().unwrap();
        let second = host.draw("Moral").await.unwrap().unwrap();
        let third = host.draw("Moral").await.unwrap().unwrap();
        assert_eq!(first.label(), "Flee");
        assert_eq!(second.label(), "Surrender");
        assert_eq!(third.label(), "Flee");
        assert!(host.draw("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_actor() {
        let host = InMemoryHost::new();
        let result = host
            .update_actor(ActorId::new(), vec![ActorUpdate::SetHonor { value: 3 }])
            .await;
        assert!(matches!(result, Err(HostError::ActorNotFound(_))));
    }

    #[tokio::test]
    async fn test_harness_ability_check() {
        let harness = TestHarness::new();
        let actor = harness
            .add_actor(create_sample_ronin("Jubei"))
            .await
            .unwrap();
        harness.queue(&[12]);
        let resolution = harness
            .engine
            .ability_check(actor.id, crate::rules::AbilityCheck::new(Ability::Vigor))
            .await
            .unwrap();
        assert_resolved(&resolution);
        assert_classification(&resolution, Classification::Success);
        assert_eq!(resolution.total, Some(13));
        assert_eq!(harness.host.posted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_prefers_host_items() {
        let host = InMemoryHost::new();
        let custom = crate::world::gear("Rope", 5, crate::world::WeightClass::Small);
        host.add_catalog_item(custom).await;
        let found = host.find("rope", None).await.unwrap().unwrap();
        assert_eq!(found.kind.quantity(), Some(5));
        assert!(host.find("Katana", None).await.unwrap().is_some());
    }
}
