//! The rules engine.
//!
//! Every roll procedure follows the same path: check preconditions, work
//! out the formula and DR, roll, classify, commit resource effects and
//! return a [`Resolution`] that is also posted to the chat log.
//!
//! Procedures live in submodules as `impl RulesEngine` blocks.

mod ability;
mod attack;
mod equipment;
mod initiative;
mod meditation;
mod moral;
mod rest;
pub mod seppuku;
mod text;
mod usage;

pub use ability::AbilityCheck;
pub use attack::AttackRequest;
pub use initiative::{InitiativeOrder, InitiativeSlot, Side};
pub use rest::RestOptions;
pub use seppuku::{SeppukuFlow, SeppukuInput, SeppukuStage, SeppukuStep};
pub use text::TextRequest;

use crate::config::RulesConfig;
use crate::dice::{DiceExpression, RollResult};
use crate::error::{Rejection, RollError};
use crate::host::{Services, TableEntry};
use crate::outcome::{CheckOutcome, CheckReport, Classification, CriticalRule, SoloOutcome};
use crate::resources::ResourceEngine;
use crate::world::{Ability, Actor, ActorId, ItemId};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// The result of one roll procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub action: String,
    pub actor: Option<ActorId>,
    pub summary: String,
    pub check: Option<CheckReport>,
    pub classification: Option<Classification>,
    pub total: Option<i32>,
    pub dr: Option<i32>,
    pub rejection: Option<Rejection>,
    pub effects: Vec<Effect>,
}

impl Resolution {
    pub fn new(action: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            actor: None,
            summary: summary.into(),
            check: None,
            classification: None,
            total: None,
            dr: None,
            rejection: None,
            effects: Vec::new(),
        }
    }

    /// An aborted action. Nothing was changed.
    pub fn rejected(action: impl Into<String>, rejection: Rejection) -> Self {
        let summary = rejection.to_string();
        let mut resolution = Self::new(action, summary);
        resolution.rejection = Some(rejection);
        resolution
    }

    pub fn for_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_check(mut self, check: CheckReport) -> Self {
        self.classification = Some(check.classification());
        self.total = Some(check.total());
        self.dr = Some(check.dr());
        self.check = Some(check);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Every roll made while resolving, in order.
    pub fn rolls(&self) -> impl Iterator<Item = &RollResult> {
        self.effects.iter().filter_map(|e| match e {
            Effect::DiceRolled { roll, .. } => Some(roll),
            _ => None,
        })
    }
}

/// A change committed (or an event observed) while resolving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    DiceRolled {
        roll: RollResult,
        purpose: String,
    },
    HpChanged {
        actor: ActorId,
        amount: i32,
        current: i32,
        maximum: i32,
    },
    HonorChanged {
        actor: ActorId,
        amount: i32,
        current: i32,
        dishonored: bool,
    },
    VirtuesChanged {
        actor: ActorId,
        from: i32,
        to: i32,
    },
    TextsChanged {
        actor: ActorId,
        from: i32,
        to: i32,
    },
    AbilityChanged {
        actor: ActorId,
        ability: Ability,
        amount: i32,
        value: i32,
        temporary: bool,
    },
    ModifiersReverted {
        actor: ActorId,
        reverted: Vec<(Ability, i32)>,
    },
    ConsumableUsed {
        actor: ActorId,
        item: ItemId,
        name: String,
        remaining: i32,
    },
    /// Rest recovery was skipped.
    RecoveryBlocked {
        reason: String,
    },
    /// Damage rolled for the table to apply, not written to the actor.
    DamageReported {
        actor: ActorId,
        amount: i32,
        cause: String,
    },
    ItemAdded {
        actor: ActorId,
        item: ItemId,
        name: String,
    },
    ItemUpdated {
        actor: ActorId,
        item: ItemId,
        name: String,
    },
    ItemRemoved {
        actor: ActorId,
        item: ItemId,
        name: String,
    },
    TableDrawn {
        table: String,
        entry: TableEntry,
    },
    /// A table or compendium entry that could not be found.
    LookupMissed {
        what: String,
    },
    Demoralized {
        actor: ActorId,
    },
    InitiativeSet {
        actor: ActorId,
        name: String,
        side: Side,
        priority: f64,
    },
    FeatActivated {
        actor: ActorId,
        name: String,
        activation: String,
    },
}

/// Verb for a summary line.
pub(crate) fn outcome_verb(classification: Classification) -> &'static str {
    match classification {
        Classification::CriticalSuccess => "critically succeeds",
        Classification::Success => "succeeds",
        Classification::PartialSuccess => "partly succeeds",
        Classification::Failure => "fails",
        Classification::CriticalFumble => "fumbles",
    }
}

/// How one check is rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckProfile {
    pub label: String,
    /// Ability score plus situational modifier.
    pub modifier: i32,
    pub dr: i32,
    pub rule: CriticalRule,
    pub solo: bool,
}

impl CheckProfile {
    pub fn new(label: impl Into<String>, modifier: i32, dr: i32) -> Self {
        Self {
            label: label.into(),
            modifier,
            dr,
            rule: CriticalRule::Override,
            solo: false,
        }
    }

    pub fn with_rule(mut self, rule: CriticalRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_solo(mut self, solo: bool) -> Self {
        self.solo = solo;
        self
    }
}

/// The rules engine resolves roll procedures against host services.
pub struct RulesEngine {
    services: Services,
    config: RulesConfig,
}

impl RulesEngine {
    pub fn new(services: Services, config: RulesConfig) -> Self {
        Self { services, config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub(crate) fn resources(&self) -> ResourceEngine<'_> {
        ResourceEngine::new(self.services.actors.as_ref(), &self.config)
    }

    /// Fetch an actor, rejecting unknown ids.
    pub(crate) async fn load_actor(&self, id: ActorId) -> Result<Actor, RollError> {
        self.services
            .actors
            .actor(id)
            .await?
            .ok_or_else(|| Rejection::MissingActor { actor: id }.into())
    }

    /// Roll through the host and record the roll.
    pub(crate) async fn roll(
        &self,
        tx: &mut ResourceEngine<'_>,
        expression: &DiceExpression,
        purpose: &str,
    ) -> Result<RollResult, RollError> {
        let roll = self.services.dice.roll(expression).await?;
        tracing::debug!(
            expression = %expression,
            total = roll.total,
            purpose,
            "dice rolled"
        );
        tx.record(Effect::DiceRolled {
            roll: roll.clone(),
            purpose: purpose.to_string(),
        });
        Ok(roll)
    }

    /// Roll a class- or item-supplied formula, tolerating bad input.
    pub(crate) async fn roll_formula(
        &self,
        tx: &mut ResourceEngine<'_>,
        formula: &str,
        purpose: &str,
    ) -> Result<RollResult, RollError> {
        let expression = DiceExpression::parse_lenient(formula);
        self.roll(tx, &expression, purpose).await
    }

    /// Roll and classify one check, twice in solo mode.
    pub(crate) async fn run_check(
        &self,
        tx: &mut ResourceEngine<'_>,
        profile: &CheckProfile,
    ) -> Result<CheckReport, RollError> {
        let expression = DiceExpression::check(self.config.check_die, profile.modifier);
        let first = self.roll(tx, &expression, &profile.label).await?;
        let first = CheckOutcome::from_roll(&first, profile.dr, profile.rule);
        if !profile.solo {
            return Ok(CheckReport::Single(first));
        }
        let second = self.roll(tx, &expression, &profile.label).await?;
        let second = CheckOutcome::from_roll(&second, profile.dr, profile.rule);
        Ok(CheckReport::Solo(SoloOutcome::reconcile(first, second)))
    }

    /// Draw from a named table. A missing table is warned about and
    /// recorded, not fatal.
    pub(crate) async fn draw_table(
        &self,
        tx: &mut ResourceEngine<'_>,
        table: &str,
    ) -> Result<Option<TableEntry>, RollError> {
        match self.services.tables.draw(table).await? {
            Some(entry) => {
                tx.record(Effect::TableDrawn {
                    table: table.to_string(),
                    entry: entry.clone(),
                });
                Ok(Some(entry))
            }
            None => {
                self.lookup_missed(tx, &format!("roll table \"{table}\""));
                Ok(None)
            }
        }
    }

    /// Warn about a missing table or compendium entry and move on.
    pub(crate) fn lookup_missed(&self, tx: &mut ResourceEngine<'_>, what: &str) {
        tracing::warn!(what, "lookup failed, skipping");
        self.services.notifier.warn(&format!("Could not find {what}"));
        tx.record(Effect::LookupMissed {
            what: what.to_string(),
        });
    }

    /// Orchestrator boundary: post successes, turn rejections into a
    /// warning and a rejected resolution, report anything else once.
    /// Rejections carry `actor` when the caller knows it.
    pub(crate) async fn conclude(
        &self,
        action: &str,
        actor: Option<ActorId>,
        actor_name: &str,
        result: Result<Resolution, RollError>,
    ) -> Result<Resolution, RollError> {
        match result {
            Ok(resolution) => {
                tracing::info!(
                    actor = actor_name,
                    action,
                    total = ?resolution.total,
                    dr = ?resolution.dr,
                    classification = ?resolution.classification,
                    "{}",
                    resolution.summary
                );
                if let Err(err) = self.services.chat.post(&resolution).await {
                    return Err(self.report_failure(action, actor_name, err.into()));
                }
                Ok(resolution)
            }
            Err(RollError::Rejected(rejection)) => {
                tracing::warn!(actor = actor_name, action, %rejection, "action rejected");
                self.services.notifier.warn(&rejection.to_string());
                let resolution = Resolution::rejected(action, rejection);
                Ok(match actor {
                    Some(id) => resolution.for_actor(id),
                    None => resolution,
                })
            }
            Err(err) => Err(self.report_failure(action, actor_name, err)),
        }
    }

    fn report_failure(&self, action: &str, actor_name: &str, err: RollError) -> RollError {
        tracing::error!(actor = actor_name, action, error = %err, "roll procedure failed");
        self.services
            .notifier
            .error(&format!("{action} failed for {actor_name}: {err}"));
        err
    }

    /// Load the actor, run `procedure` on it and conclude.
    pub(crate) async fn with_actor<F, Fut>(
        &self,
        action: &str,
        actor_id: ActorId,
        procedure: F,
    ) -> Result<Resolution, RollError>
    where
        F: FnOnce(Actor) -> Fut,
        Fut: Future<Output = Result<Resolution, RollError>>,
    {
        let actor = match self.load_actor(actor_id).await {
            Ok(actor) => actor,
            Err(err) => {
                return self
                    .conclude(action, Some(actor_id), &actor_id.to_string(), Err(err))
                    .await
            }
        };
        let name = actor.name.clone();
        let result = procedure(actor).await;
        self.conclude(action, Some(actor_id), &name, result).await
    }
}
