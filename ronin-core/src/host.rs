//! Services supplied by the tabletop host.
//!
//! The rules never own persistence, randomness, chat or compendium
//! storage. They reach them through these traits, handed in once at
//! bootstrap as a [`Services`] bundle.

use crate::dice::{DiceExpression, RollResult};
use crate::error::HostError;
use crate::resources::ActorUpdate;
use crate::rules::Resolution;
use crate::world::{Actor, ActorId, Item, ItemType};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Actor persistence.
#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Fetch an actor. `Ok(None)` when it does not exist.
    async fn actor(&self, id: ActorId) -> Result<Option<Actor>, HostError>;

    /// Store a new actor and return it as stored.
    async fn create_actor(&self, actor: Actor) -> Result<Actor, HostError>;

    /// Apply updates in order and return the actor as stored afterwards.
    async fn update_actor(&self, id: ActorId, updates: Vec<ActorUpdate>)
        -> Result<Actor, HostError>;
}

/// The host's dice engine.
#[async_trait]
pub trait DiceRoller: Send + Sync {
    async fn roll(&self, expression: &DiceExpression) -> Result<RollResult, HostError>;
}

/// One entry drawn from a roll table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TableEntry {
    Text(String),
    Item(Item),
}

impl TableEntry {
    pub fn label(&self) -> &str {
        match self {
            TableEntry::Text(text) => text,
            TableEntry::Item(item) => &item.name,
        }
    }
}

/// Named random tables.
#[async_trait]
pub trait RollTables: Send + Sync {
    /// Draw one entry. `Ok(None)` when no table has that name.
    async fn draw(&self, table: &str) -> Result<Option<TableEntry>, HostError>;
}

/// Compendium lookup.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Find an item by name, optionally restricted to one kind.
    async fn find(&self, name: &str, kind: Option<ItemType>) -> Result<Option<Item>, HostError>;
}

/// Chat log.
#[async_trait]
pub trait ChatLog: Send + Sync {
    async fn post(&self, resolution: &Resolution) -> Result<(), HostError>;
}

/// User-facing notifications.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Host setting toggles.
pub trait Settings: Send + Sync {
    /// Roll two dice for ability checks and attacks.
    fn use_solo_rules(&self) -> bool;
    /// Spend water and food during rests.
    fn deduct_consumables(&self) -> bool;
}

/// Everything the rules engine needs from the host.
#[derive(Clone)]
pub struct Services {
    pub actors: Arc<dyn ActorRepository>,
    pub dice: Arc<dyn DiceRoller>,
    pub tables: Arc<dyn RollTables>,
    pub catalog: Arc<dyn ItemCatalog>,
    pub chat: Arc<dyn ChatLog>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<dyn Settings>,
}

impl Services {
    /// Wire every service except dice and settings to one host object.
    pub fn from_host<H>(host: Arc<H>, dice: Arc<dyn DiceRoller>, settings: Arc<dyn Settings>) -> Self
    where
        H: ActorRepository + RollTables + ItemCatalog + ChatLog + Notifier + 'static,
    {
        Self {
            actors: host.clone(),
            dice,
            tables: host.clone(),
            catalog: host.clone(),
            chat: host.clone(),
            notifier: host,
            settings,
        }
    }
}

/// A [`DiceRoller`] backed by a local RNG.
pub struct RngDiceRoller {
    rng: Mutex<StdRng>,
}

impl RngDiceRoller {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RngDiceRoller {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[async_trait]
impl DiceRoller for RngDiceRoller {
    async fn roll(&self, expression: &DiceExpression) -> Result<RollResult, HostError> {
        let mut rng = self.rng.lock().await;
        Ok(expression.roll_with_rng(&mut *rng))
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "ronin::notify", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "ronin::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "ronin::notify", "{message}");
    }
}
