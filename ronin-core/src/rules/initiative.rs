//! Group initiative.

use super::{Effect, Resolution, RulesEngine};
use crate::dice::DiceExpression;
use crate::error::RollError;
use crate::world::{Ability, ActorId};
use serde::{Deserialize, Serialize};
use std::fmt;

const ACTION: &str = "Group initiative";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Characters,
    Enemies,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Characters => write!(f, "characters"),
            Side::Enemies => write!(f, "enemies"),
        }
    }
}

/// One combatant's place in the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeSlot {
    pub actor: ActorId,
    pub name: String,
    pub side: Side,
    /// Side priority (2 first, 1 second) plus a tie-break fraction.
    pub priority: f64,
}

/// Combatants sorted by priority, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitiativeOrder {
    pub slots: Vec<InitiativeSlot>,
}

impl InitiativeOrder {
    pub fn from_effects<'a>(effects: impl IntoIterator<Item = &'a Effect>) -> Self {
        let mut slots: Vec<InitiativeSlot> = effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::InitiativeSet {
                    actor,
                    name,
                    side,
                    priority,
                } => Some(InitiativeSlot {
                    actor: *actor,
                    name: name.clone(),
                    side: *side,
                    priority: *priority,
                }),
                _ => None,
            })
            .collect();
        slots.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        Self { slots }
    }

    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self::from_effects(&resolution.effects)
    }

    pub fn first(&self) -> Option<&InitiativeSlot> {
        self.slots.first()
    }
}

/// Priority for a side, with a two-digit tie-break suffix (2 and 45 give 2.45).
fn side_priority(base: i32, tie_break: Option<i32>) -> f64 {
    match tie_break {
        Some(t) => f64::from(base) + f64::from(t.clamp(0, 99)) / 100.0,
        None => f64::from(base),
    }
}

impl RulesEngine {
    /// One shared d6 picks the side that acts first: 1-3 enemies, 4-6
    /// characters. Characters break ties within their side with d6 +
    /// Swiftness. Unknown combatants are skipped.
    pub async fn group_initiative(&self, combatants: &[ActorId]) -> Result<Resolution, RollError> {
        let result = self.resolve_initiative(combatants).await;
        self.conclude(ACTION, None, "party", result).await
    }

    async fn resolve_initiative(&self, combatants: &[ActorId]) -> Result<Resolution, RollError> {
        let mut tx = self.resources();
        let side_roll = self.roll_formula(&mut tx, "1d6", "group initiative").await?;
        let enemies_first = side_roll.total <= 3;
        let (enemy_base, character_base) = if enemies_first { (2, 1) } else { (1, 2) };

        for id in combatants {
            let Some(actor) = self.services.actors.actor(*id).await? else {
                self.lookup_missed(&mut tx, &format!("combatant {id}"));
                continue;
            };
            let (side, priority) = if actor.is_enemy() {
                (Side::Enemies, side_priority(enemy_base, None))
            } else {
                let expression = DiceExpression::check(6, actor.ability(Ability::Swiftness));
                let tie = self
                    .roll(&mut tx, &expression, &format!("{} tie-break", actor.name))
                    .await?;
                (Side::Characters, side_priority(character_base, Some(tie.total)))
            };
            tracing::debug!(actor = %actor.name, %side, priority, "initiative set");
            tx.record(Effect::InitiativeSet {
                actor: actor.id,
                name: actor.name,
                side,
                priority,
            });
        }

        let first = if enemies_first {
            Side::Enemies
        } else {
            Side::Characters
        };
        let mut resolution = Resolution::new(
            ACTION,
            format!("Rolled {} on the group die: the {first} act first", side_roll.total),
        )
        .with_effects(tx.into_effects());
        resolution.total = Some(side_roll.total);
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_priority_suffix() {
        assert!(close(side_priority(2, Some(45)), 2.45));
        assert!(close(side_priority(1, Some(-3)), 1.0));
        assert!(close(side_priority(1, Some(150)), 1.99));
        assert!(close(side_priority(2, None), 2.0));
    }

    #[test]
    fn test_order_sorts_highest_first() {
        let a = ActorId::new();
        let b = ActorId::new();
        let effects = vec![
            Effect::InitiativeSet {
                actor: a,
                name: "Bandit".into(),
                side: Side::Enemies,
                priority: 1.0,
            },
            Effect::InitiativeSet {
                actor: b,
                name: "Jubei".into(),
                side: Side::Characters,
                priority: 2.07,
            },
        ];
        let order = InitiativeOrder::from_effects(&effects);
        assert_eq!(order.first().map(|s| s.actor), Some(b));
        assert_eq!(order.slots.len(), 2);
    }
}
