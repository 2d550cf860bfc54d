//! Seppuku, as a resumable state machine.
//!
//! The ritual is driven one input at a time so a host can park the flow
//! between prompts (for example behind a chat button) and resume it later.
//!
//! ```text
//! Confirming --Confirm--> AskingAssistant --Assistant(_)--> SpiritTest
//! SpiritTest --Continue--> ResilienceTest  (spirit passed)
//!                      \-> Resolved        (spirit failed)
//! ResilienceTest --Continue--> Resolved
//! any unfinished stage --Cancel--> Cancelled
//! ```

use super::{CheckProfile, Resolution, RulesEngine};
use crate::error::{Rejection, RollError};
use crate::outcome::{CheckReport, CriticalRule};
use crate::resources::ResourceEngine;
use crate::world::{Ability, Actor, ActorId};
use serde::{Deserialize, Serialize};
use std::fmt;

const ACTION: &str = "Seppuku";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SeppukuStage {
    Confirming,
    AskingAssistant,
    SpiritTest { assisted: bool },
    ResilienceTest { assisted: bool },
    Resolved,
    Cancelled,
}

impl fmt::Display for SeppukuStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeppukuStage::Confirming => write!(f, "confirming"),
            SeppukuStage::AskingAssistant => write!(f, "asking for an assistant"),
            SeppukuStage::SpiritTest { .. } => write!(f, "awaiting the spirit test"),
            SeppukuStage::ResilienceTest { .. } => write!(f, "awaiting the resilience test"),
            SeppukuStage::Resolved => write!(f, "resolved"),
            SeppukuStage::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum SeppukuInput {
    Confirm,
    Cancel,
    Assistant { present: bool },
    Continue,
}

impl fmt::Display for SeppukuInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeppukuInput::Confirm => write!(f, "confirm"),
            SeppukuInput::Cancel => write!(f, "cancel"),
            SeppukuInput::Assistant { .. } => write!(f, "choose an assistant"),
            SeppukuInput::Continue => write!(f, "continue"),
        }
    }
}

/// What an input asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeppukuTransition {
    /// Move to a stage without rolling.
    To(SeppukuStage),
    RollSpirit { assisted: bool },
    RollResilience { assisted: bool },
}

/// A seppuku in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeppukuFlow {
    pub actor: ActorId,
    pub stage: SeppukuStage,
}

impl SeppukuFlow {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            stage: SeppukuStage::Confirming,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.stage,
            SeppukuStage::Resolved | SeppukuStage::Cancelled
        )
    }

    /// The transition `input` triggers from the current stage.
    pub fn transition(&self, input: SeppukuInput) -> Result<SeppukuTransition, Rejection> {
        use SeppukuInput as I;
        use SeppukuStage as S;
        match (self.stage, input) {
            (S::Confirming, I::Confirm) => Ok(SeppukuTransition::To(S::AskingAssistant)),
            (S::AskingAssistant, I::Assistant { present }) => {
                Ok(SeppukuTransition::To(S::SpiritTest { assisted: present }))
            }
            (S::SpiritTest { assisted }, I::Continue) => {
                Ok(SeppukuTransition::RollSpirit { assisted })
            }
            (S::ResilienceTest { assisted }, I::Continue) => {
                Ok(SeppukuTransition::RollResilience { assisted })
            }
            (stage, I::Cancel) if !self.is_finished() && !matches!(stage, S::ResilienceTest { .. }) => {
                Ok(SeppukuTransition::To(S::Cancelled))
            }
            (stage, input) => Err(Rejection::SeppukuOutOfOrder {
                stage: stage.to_string(),
                input: input.to_string(),
            }),
        }
    }
}

/// The flow after one input, and what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct SeppukuStep {
    pub flow: SeppukuFlow,
    pub resolution: Resolution,
}

/// A test passes on the raw total or on a natural maximum.
fn passed(report: &CheckReport) -> bool {
    report.succeeded() || report.critical()
}

impl RulesEngine {
    /// Feed one input to a seppuku flow. A rejected input leaves the flow
    /// where it was.
    pub async fn advance_seppuku(
        &self,
        flow: &SeppukuFlow,
        input: SeppukuInput,
    ) -> Result<SeppukuStep, RollError> {
        let actor = match self.load_actor(flow.actor).await {
            Ok(actor) => actor,
            Err(err) => {
                let resolution = self
                    .conclude(ACTION, Some(flow.actor), &flow.actor.to_string(), Err(err))
                    .await?;
                return Ok(SeppukuStep {
                    flow: *flow,
                    resolution,
                });
            }
        };
        let name = actor.name.clone();

        let result = match flow.transition(input) {
            Ok(transition) => self.run_seppuku(actor, transition).await,
            Err(rejection) => Err(rejection.into()),
        };
        let (stage, result) = match result {
            Ok((stage, resolution)) => (stage, Ok(resolution)),
            Err(err) => (flow.stage, Err(err)),
        };
        let resolution = self.conclude(ACTION, Some(flow.actor), &name, result).await?;
        Ok(SeppukuStep {
            flow: SeppukuFlow {
                actor: flow.actor,
                stage,
            },
            resolution,
        })
    }

    async fn run_seppuku(
        &self,
        actor: Actor,
        transition: SeppukuTransition,
    ) -> Result<(SeppukuStage, Resolution), RollError> {
        match transition {
            SeppukuTransition::To(stage) => {
                let summary = match stage {
                    SeppukuStage::AskingAssistant => {
                        format!("{} resolves to commit seppuku", actor.name)
                    }
                    SeppukuStage::SpiritTest { assisted: true } => {
                        format!("{} kneels, a second at their side", actor.name)
                    }
                    SeppukuStage::SpiritTest { assisted: false } => {
                        format!("{} kneels alone", actor.name)
                    }
                    _ => format!("{} steps back from seppuku", actor.name),
                };
                Ok((stage, Resolution::new(ACTION, summary).for_actor(actor.id)))
            }
            SeppukuTransition::RollSpirit { assisted } => {
                self.seppuku_spirit_test(actor, assisted).await
            }
            SeppukuTransition::RollResilience { assisted } => {
                self.seppuku_resilience_test(actor, assisted).await
            }
        }
    }

    async fn seppuku_check(
        &self,
        tx: &mut ResourceEngine<'_>,
        actor: &Actor,
        ability: Ability,
        dr: i32,
    ) -> Result<CheckReport, RollError> {
        let profile = CheckProfile::new(
            format!("seppuku {ability}"),
            actor.ability(ability),
            dr,
        )
        .with_rule(CriticalRule::Flagged);
        self.run_check(tx, &profile).await
    }

    async fn seppuku_spirit_test(
        &self,
        actor: Actor,
        assisted: bool,
    ) -> Result<(SeppukuStage, Resolution), RollError> {
        let mut tx = self.resources();
        let dr = self.config.seppuku_spirit_dr;
        let report = self.seppuku_check(&mut tx, &actor, Ability::Spirit, dr).await?;

        let (stage, summary) = if passed(&report) {
            (
                SeppukuStage::ResilienceTest { assisted },
                format!(
                    "{} steadies their spirit ({} vs DR {dr}) and draws the blade",
                    actor.name,
                    report.total()
                ),
            )
        } else {
            (
                SeppukuStage::Resolved,
                format!(
                    "{} falters ({} vs DR {dr}) and cannot go through with it",
                    actor.name,
                    report.total()
                ),
            )
        };
        Ok((
            stage,
            Resolution::new(ACTION, summary)
                .for_actor(actor.id)
                .with_check(report)
                .with_effects(tx.into_effects()),
        ))
    }

    async fn seppuku_resilience_test(
        &self,
        actor: Actor,
        assisted: bool,
    ) -> Result<(SeppukuStage, Resolution), RollError> {
        let mut tx = self.resources();
        let dr = self.config.seppuku_resilience_dr;
        let report = self
            .seppuku_check(&mut tx, &actor, Ability::Resilience, dr)
            .await?;

        let summary = if passed(&report) {
            let honor = self.roll_formula(&mut tx, "2d6+2", "seppuku honor").await?;
            let updated = tx.adjust_honor(&actor, honor.total).await?;
            format!(
                "{} dies with honor ({} vs DR {dr}), Honor {}",
                actor.name,
                report.total(),
                updated.resources.honor
            )
        } else if assisted {
            let honor = self.roll_formula(&mut tx, "1d6+1", "seppuku honor").await?;
            let updated = tx.adjust_honor(&actor, honor.total).await?;
            format!(
                "{} wavers ({} vs DR {dr}) but the second strikes clean, Honor {}",
                actor.name,
                report.total(),
                updated.resources.honor
            )
        } else {
            let damage = self.roll_formula(&mut tx, "1d8", "seppuku wound").await?;
            tx.adjust_hp(&actor, -damage.total).await?;
            let mut summary = format!(
                "{} botches the cut ({} vs DR {dr}) and takes {} damage",
                actor.name,
                report.total(),
                damage.total
            );
            let table = self.config.tables.injuries.clone();
            if let Some(entry) = self.draw_table(&mut tx, &table).await? {
                summary.push_str(&format!("; {table}: {}", entry.label()));
            }
            summary
        };

        Ok((
            SeppukuStage::Resolved,
            Resolution::new(ACTION, summary)
                .for_actor(actor.id)
                .with_check(report)
                .with_effects(tx.into_effects()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut flow = SeppukuFlow::new(ActorId::new());
        assert_eq!(
            flow.transition(SeppukuInput::Confirm),
            Ok(SeppukuTransition::To(SeppukuStage::AskingAssistant))
        );
        flow.stage = SeppukuStage::AskingAssistant;
        assert_eq!(
            flow.transition(SeppukuInput::Assistant { present: true }),
            Ok(SeppukuTransition::To(SeppukuStage::SpiritTest { assisted: true }))
        );
        flow.stage = SeppukuStage::SpiritTest { assisted: true };
        assert_eq!(
            flow.transition(SeppukuInput::Continue),
            Ok(SeppukuTransition::RollSpirit { assisted: true })
        );
        flow.stage = SeppukuStage::ResilienceTest { assisted: true };
        assert_eq!(
            flow.transition(SeppukuInput::Continue),
            Ok(SeppukuTransition::RollResilience { assisted: true })
        );
    }

    #[test]
    fn test_out_of_order_input_rejected() {
        let flow = SeppukuFlow::new(ActorId::new());
        assert!(matches!(
            flow.transition(SeppukuInput::Continue),
            Err(Rejection::SeppukuOutOfOrder { .. })
        ));

        let done = SeppukuFlow {
            actor: ActorId::new(),
            stage: SeppukuStage::Resolved,
        };
        assert!(done.is_finished());
        assert!(done.transition(SeppukuInput::Cancel).is_err());
    }

    #[test]
    fn test_cancel_before_the_blade() {
        let mut flow = SeppukuFlow::new(ActorId::new());
        assert_eq!(
            flow.transition(SeppukuInput::Cancel),
            Ok(SeppukuTransition::To(SeppukuStage::Cancelled))
        );
        flow.stage = SeppukuStage::ResilienceTest { assisted: false };
        assert!(flow.transition(SeppukuInput::Cancel).is_err());
    }

    #[test]
    fn test_flow_serializes() {
        let flow = SeppukuFlow {
            actor: ActorId::new(),
            stage: SeppukuStage::ResilienceTest { assisted: true },
        };
        let json = serde_json::to_string(&flow).unwrap();
        let back: SeppukuFlow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flow);
    }
}
