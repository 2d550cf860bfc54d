//! Outcome classification for checks.
//!
//! A check is one die (normally a d20) plus modifiers against a DR. Solo
//! play rolls two of them and reconciles the pair into a three-way result.

use crate::dice::RollResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tag reported for a resolved check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    CriticalSuccess,
    Success,
    PartialSuccess,
    Failure,
    CriticalFumble,
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::CriticalSuccess => "critical-success",
            Classification::Success => "success",
            Classification::PartialSuccess => "partial-success",
            Classification::Failure => "failure",
            Classification::CriticalFumble => "critical-fumble",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How natural extremes interact with the success flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CriticalRule {
    /// A natural maximum always succeeds and a natural 1 always fails.
    /// The tag collapses to success or failure.
    #[default]
    Override,
    /// Success is the raw total against the DR. Extremes only change the tag.
    Flagged,
}

/// One die against one DR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub face: u32,
    pub max_face: u32,
    pub total: i32,
    pub dr: i32,
    pub success: bool,
    pub critical: bool,
    pub fumble: bool,
    pub rule: CriticalRule,
}

impl CheckOutcome {
    /// Classify `face + modifier` against `dr`.
    pub fn classify(face: u32, max_face: u32, modifier: i32, dr: i32, rule: CriticalRule) -> Self {
        let total = i32::try_from(face)
            .unwrap_or(i32::MAX)
            .saturating_add(modifier);
        Self::from_parts(face, max_face, total, dr, rule)
    }

    /// Classify a rolled `1dM + K` expression.
    ///
    /// Rolls without a single natural die never report extremes.
    pub fn from_roll(roll: &RollResult, dr: i32, rule: CriticalRule) -> Self {
        let face = roll.natural().unwrap_or(0);
        let max_face = roll.natural_sides().unwrap_or(0);
        Self::from_parts(face, max_face, roll.total, dr, rule)
    }

    /// The same roll judged under another rule.
    pub fn rescore(self, rule: CriticalRule) -> Self {
        Self::from_parts(self.face, self.max_face, self.total, self.dr, rule)
    }

    fn from_parts(face: u32, max_face: u32, total: i32, dr: i32, rule: CriticalRule) -> Self {
        let critical = max_face > 0 && face == max_face;
        let fumble = max_face > 0 && face == 1;
        let raw = total >= dr;
        let success = match rule {
            CriticalRule::Override => critical || (raw && !fumble),
            CriticalRule::Flagged => raw,
        };
        Self {
            face,
            max_face,
            total,
            dr,
            success,
            critical,
            fumble,
            rule,
        }
    }

    pub fn classification(&self) -> Classification {
        match self.rule {
            CriticalRule::Override => {
                if self.success {
                    Classification::Success
                } else {
                    Classification::Failure
                }
            }
            CriticalRule::Flagged => {
                if self.critical {
                    Classification::CriticalSuccess
                } else if self.fumble {
                    Classification::CriticalFumble
                } else if self.success {
                    Classification::Success
                } else {
                    Classification::Failure
                }
            }
        }
    }
}

/// Two independent checks against the same DR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoloOutcome {
    pub first: CheckOutcome,
    pub second: CheckOutcome,
    /// At least one natural maximum.
    pub critical: bool,
    /// A natural 1 on a side that failed.
    pub fumble: bool,
}

impl SoloOutcome {
    /// Each side succeeds on its raw total. A natural maximum only sets
    /// the critical flag.
    pub fn reconcile(first: CheckOutcome, second: CheckOutcome) -> Self {
        let first = first.rescore(CriticalRule::Flagged);
        let second = second.rescore(CriticalRule::Flagged);
        let critical = first.critical || second.critical;
        let fumble = (first.fumble && !first.success) || (second.fumble && !second.success);
        Self {
            first,
            second,
            critical,
            fumble,
        }
    }

    pub fn successes(&self) -> usize {
        [self.first.success, self.second.success]
            .iter()
            .filter(|s| **s)
            .count()
    }

    /// Complete success, partial success or failure. Extremes are reported
    /// through the flags only.
    pub fn classification(&self) -> Classification {
        match self.successes() {
            2 => Classification::Success,
            1 => Classification::PartialSuccess,
            _ => Classification::Failure,
        }
    }
}

/// A classified check in either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CheckReport {
    Single(CheckOutcome),
    Solo(SoloOutcome),
}

impl CheckReport {
    pub fn classification(&self) -> Classification {
        match self {
            CheckReport::Single(o) => o.classification(),
            CheckReport::Solo(o) => o.classification(),
        }
    }

    /// At least one side met the DR.
    pub fn succeeded(&self) -> bool {
        match self {
            CheckReport::Single(o) => o.success,
            CheckReport::Solo(o) => o.successes() > 0,
        }
    }

    pub fn critical(&self) -> bool {
        match self {
            CheckReport::Single(o) => o.critical,
            CheckReport::Solo(o) => o.critical,
        }
    }

    pub fn fumble(&self) -> bool {
        match self {
            CheckReport::Single(o) => o.fumble,
            CheckReport::Solo(o) => o.fumble,
        }
    }

    pub fn dr(&self) -> i32 {
        match self {
            CheckReport::Single(o) => o.dr,
            CheckReport::Solo(o) => o.first.dr,
        }
    }

    /// The reported total. Solo mode reports the better side.
    pub fn total(&self) -> i32 {
        match self {
            CheckReport::Single(o) => o.total,
            CheckReport::Solo(o) => o.first.total.max(o.second.total),
        }
    }
}
