//! RONIN rule-set core for a virtual tabletop host.
//!
//! This crate provides:
//! - Dice expressions and a check outcome classifier with solo dual rolls
//! - Actor and item models with derived attributes
//! - A resource mutation engine for HP, Honor, virtues, texts and gear
//! - Roll procedures: checks, attacks, rests, meditation, seppuku, texts,
//!   moral, initiative, item use and character generation
//!
//! The host supplies persistence, dice, tables, compendium, chat and
//! notifications through the traits in [`host`].
//!
//! # Quick Start
//!
//! ```ignore
//! use ronin_core::{AbilityCheck, RoninSystem, RulesConfig, Services};
//! use ronin_core::world::Ability;
//!
//! let system = RoninSystem::bootstrap(services, RulesConfig::default())?;
//! let resolution = system
//!     .engine()
//!     .ability_check(actor_id, AbilityCheck::new(Ability::Vigor))
//!     .await?;
//! println!("{}", resolution.summary);
//! ```

pub mod catalog;
pub mod character_builder;
pub mod config;
pub mod derived;
pub mod dice;
pub mod error;
pub mod host;
pub mod outcome;
pub mod resources;
pub mod rules;
pub mod system;
pub mod testing;
pub mod world;

// Primary public API
pub use character_builder::{Alignment, BuilderError, CharacterBuilder};
pub use config::{ConfigError, RulesConfig, StaticSettings};
pub use dice::{DiceError, DiceExpression, RollResult};
pub use error::{HostError, Rejection, RollError};
pub use host::Services;
pub use outcome::{CheckReport, Classification};
pub use rules::{
    AbilityCheck, AttackRequest, Effect, InitiativeOrder, Resolution, RestOptions, RulesEngine,
    SeppukuFlow, SeppukuInput, SeppukuStage, TextRequest,
};
pub use system::RoninSystem;
pub use testing::{InMemoryHost, ScriptedDice, TestHarness};
pub use world::{Actor, ActorId, Item, ItemId};
