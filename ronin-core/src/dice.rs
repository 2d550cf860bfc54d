//! RONIN dice rolling system.
//!
//! Supports the notation used by the rule set: `NdM`, `dM`, flat integers,
//! any sum of those (`2d6+1d4-1`, `3d6 + -2`), optional surrounding
//! parentheses and a trailing multiplier (`2d6*10`).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on dice in a single term.
const MAX_DICE: u32 = 1000;

/// Upper bound on die size, so a full term always fits in an `i32`.
const MAX_SIDES: u32 = i32::MAX as u32 / MAX_DICE;

/// Error type for dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
    #[error("Too many dice in {0}")]
    TooManyDice(String),
    #[error("Dice expression overflows: {0}")]
    Overflow(String),
}

/// A single `NdM` term of a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub sides: u32,
    /// +1 or -1.
    pub sign: i32,
}

/// A complete dice expression (e.g., `2d6+3` or `1d6*10`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub terms: Vec<DiceTerm>,
    pub modifier: i32,
    pub multiplier: i32,
    pub original: String,
}

impl DiceExpression {
    /// Parse a dice notation string.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let original = notation.trim().to_lowercase();
        let compact: String = original.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = strip_parens(&compact);
        if compact.is_empty() {
            return Err(DiceError::NoDice);
        }

        let (sum, multiplier) = match compact.rfind('*') {
            Some(pos) => {
                let factor = strip_parens(&compact[pos + 1..]);
                let factor: i32 = factor
                    .parse()
                    .map_err(|_| DiceError::InvalidNotation(original.clone()))?;
                (strip_parens(&compact[..pos]), factor)
            }
            None => (compact, 1),
        };

        let mut terms = Vec::new();
        let mut modifier: i32 = 0;
        let mut current = String::new();
        let mut sign: i32 = 1;
        let mut seen_term = false;

        for ch in sum.chars() {
            match ch {
                '+' | '-' => {
                    if !current.is_empty() {
                        Self::parse_term(&current, sign, &mut terms, &mut modifier)?;
                        seen_term = true;
                        current.clear();
                        sign = 1;
                    }
                    if ch == '-' {
                        sign = -sign;
                    }
                }
                _ => current.push(ch),
            }
        }

        if current.is_empty() {
            // Trailing operator or nothing but signs.
            if !seen_term {
                return Err(DiceError::NoDice);
            }
            return Err(DiceError::InvalidNotation(original));
        }
        Self::parse_term(&current, sign, &mut terms, &mut modifier)?;

        let expr = DiceExpression {
            terms,
            modifier,
            multiplier,
            original,
        };
        if expr.scaled_range().is_none() {
            return Err(DiceError::Overflow(expr.original));
        }
        Ok(expr)
    }

    /// Parse a class- or item-supplied formula without failing.
    ///
    /// Malformed input is logged and falls back to whatever flat value can
    /// be salvaged from it, or 0.
    pub fn parse_lenient(notation: &str) -> Self {
        match Self::parse(notation) {
            Ok(expr) => expr,
            Err(err) => {
                let fallback = salvage_flat(notation);
                tracing::error!(
                    expression = notation,
                    error = %err,
                    fallback,
                    "malformed dice expression"
                );
                Self::flat(fallback)
            }
        }
    }

    /// An expression that always totals `value`.
    pub fn flat(value: i32) -> Self {
        Self {
            terms: Vec::new(),
            modifier: value,
            multiplier: 1,
            original: value.to_string(),
        }
    }

    /// `1dM + modifier`, the shape of every check in the rule set.
    pub fn check(sides: u32, modifier: i32) -> Self {
        let original = match modifier {
            0 => format!("1d{sides}"),
            m if m > 0 => format!("1d{sides}+{m}"),
            m => format!("1d{sides}{m}"),
        };
        Self {
            terms: vec![DiceTerm {
                count: 1,
                sides,
                sign: 1,
            }],
            modifier,
            multiplier: 1,
            original,
        }
    }

    fn parse_term(
        s: &str,
        sign: i32,
        terms: &mut Vec<DiceTerm>,
        modifier: &mut i32,
    ) -> Result<(), DiceError> {
        if let Some(d_pos) = s.find('d') {
            let count_str = &s[..d_pos];
            let sides_str = &s[d_pos + 1..];

            let count: u32 = if count_str.is_empty() {
                1
            } else {
                count_str
                    .parse()
                    .map_err(|_| DiceError::InvalidNotation(s.to_string()))?
            };
            if count > MAX_DICE {
                return Err(DiceError::TooManyDice(s.to_string()));
            }

            let sides: u32 = sides_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(s.to_string()))?;
            if sides == 0 || sides > MAX_SIDES {
                return Err(DiceError::InvalidDieSize(sides));
            }

            // 0dM is legal and contributes nothing.
            if count > 0 {
                terms.push(DiceTerm { count, sides, sign });
            }
        } else {
            let value: i32 = s
                .parse()
                .map_err(|_| DiceError::InvalidNotation(s.to_string()))?;
            *modifier = modifier
                .checked_add(sign * value)
                .ok_or_else(|| DiceError::InvalidNotation(s.to_string()))?;
        }

        Ok(())
    }

    /// Roll the dice expression with the thread RNG.
    pub fn roll(&self) -> RollResult {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> RollResult {
        self.roll_with(|sides| rng.gen_range(1..=sides))
    }

    /// Roll drawing each face from `face(sides)`.
    ///
    /// Faces outside `1..=sides` are clamped into range.
    pub fn roll_with<F: FnMut(u32) -> u32>(&self, mut face: F) -> RollResult {
        let term_results: Vec<TermResult> = self
            .terms
            .iter()
            .map(|term| {
                let rolls: Vec<u32> = (0..term.count)
                    .map(|_| face(term.sides).clamp(1, term.sides))
                    .collect();
                let sum: i64 = rolls.iter().map(|r| i64::from(*r)).sum();
                let subtotal = saturate(sum * i64::from(term.sign));
                TermResult {
                    sides: term.sides,
                    sign: term.sign,
                    rolls,
                    subtotal,
                }
            })
            .collect();

        let dice_total: i64 = term_results.iter().map(|t| i64::from(t.subtotal)).sum();
        let total = saturate(
            (dice_total + i64::from(self.modifier)).saturating_mul(i64::from(self.multiplier)),
        );

        RollResult {
            expression: self.clone(),
            term_results,
            modifier: self.modifier,
            multiplier: self.multiplier,
            total,
        }
    }

    /// Highest total the expression can produce.
    pub fn maximum(&self) -> i32 {
        let (low, high) = self.unscaled_range();
        let factor = i64::from(self.multiplier);
        saturate(high.saturating_mul(factor).max(low.saturating_mul(factor)))
    }

    /// Lowest and highest dice-plus-modifier sums, before the multiplier.
    fn unscaled_range(&self) -> (i64, i64) {
        let flat = i64::from(self.modifier);
        self.terms.iter().fold((flat, flat), |(low, high), t| {
            let count = i64::from(t.count);
            let top = count * i64::from(t.sides);
            if t.sign > 0 {
                (low.saturating_add(count), high.saturating_add(top))
            } else {
                (low.saturating_sub(top), high.saturating_sub(count))
            }
        })
    }

    /// Lowest and highest totals, or `None` if either leaves `i32`.
    fn scaled_range(&self) -> Option<(i32, i32)> {
        let (low, high) = self.unscaled_range();
        let factor = i64::from(self.multiplier);
        let a = i32::try_from(low.checked_mul(factor)?).ok()?;
        let b = i32::try_from(high.checked_mul(factor)?).ok()?;
        Some((a.min(b), a.max(b)))
    }

    /// Number of dice rolled by this expression.
    pub fn dice_count(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.count)
            .fold(0, u32::saturating_add)
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn strip_parens(s: &str) -> &str {
    let mut s = s;
    while s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        s = &s[1..s.len() - 1];
    }
    s
}

/// Sum the integer-only terms of a broken formula.
fn salvage_flat(notation: &str) -> i32 {
    let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
    let mut total = 0i32;
    let mut current = String::new();
    let mut sign = 1;
    for ch in compact.chars().chain(std::iter::once('+')) {
        match ch {
            '+' | '-' => {
                if let Ok(value) = current.parse::<i32>() {
                    total = total.saturating_add(sign * value);
                }
                current.clear();
                sign = if ch == '-' { -1 } else { 1 };
            }
            '(' | ')' => {}
            _ => current.push(ch),
        }
    }
    total
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Result of rolling a single term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermResult {
    pub sides: u32,
    pub sign: i32,
    pub rolls: Vec<u32>,
    pub subtotal: i32,
}

/// Complete result of a dice roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub expression: DiceExpression,
    pub term_results: Vec<TermResult>,
    pub modifier: i32,
    pub multiplier: i32,
    pub total: i32,
}

impl RollResult {
    /// Every face rolled, in order.
    pub fn faces(&self) -> Vec<u32> {
        self.term_results
            .iter()
            .flat_map(|t| t.rolls.iter().copied())
            .collect()
    }

    /// The natural face of a single-die roll such as `1d20+3`.
    pub fn natural(&self) -> Option<u32> {
        match self.term_results.as_slice() {
            [only] if only.rolls.len() == 1 => only.rolls.first().copied(),
            _ => None,
        }
    }

    /// Sides of the die behind [`RollResult::natural`].
    pub fn natural_sides(&self) -> Option<u32> {
        match self.term_results.as_slice() {
            [only] if only.rolls.len() == 1 => Some(only.sides),
            _ => None,
        }
    }

    /// Format the individual dice results for display.
    pub fn dice_display(&self) -> String {
        let dice_str = self
            .term_results
            .iter()
            .map(|t| {
                let faces = t
                    .rolls
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                if t.sign < 0 {
                    format!("-[{faces}]")
                } else {
                    format!("[{faces}]")
                }
            })
            .collect::<Vec<_>>()
            .join(" + ");

        let mut out = if dice_str.is_empty() {
            self.modifier.to_string()
        } else if self.modifier > 0 {
            format!("{} + {}", dice_str, self.modifier)
        } else if self.modifier < 0 {
            format!("{} - {}", dice_str, self.modifier.abs())
        } else {
            dice_str
        };
        if self.multiplier != 1 {
            out = format!("({out}) x {}", self.multiplier);
        }
        out
    }

    /// Check if the roll meets or exceeds a DR.
    pub fn meets_dr(&self, dr: i32) -> bool {
        self.total >= dr
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}

/// Convenience function to roll dice from a notation string.
pub fn roll(notation: &str) -> Result<RollResult, DiceError> {
    let expr = DiceExpression::parse(notation)?;
    Ok(expr.roll())
}

/// Highest total a formula can produce, parsed leniently.
pub fn formula_maximum(formula: &str) -> i32 {
    DiceExpression::parse_lenient(formula).maximum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_formula_maximum() {
        assert_eq!(formula_maximum("1d4"), 4);
        assert_eq!(formula_maximum("2d6*2"), 24);
        assert_eq!(formula_maximum("1"), 1);
    }

    #[test]
    fn test_oversized_dice_do_not_overflow() {
        assert_eq!(formula_maximum("1000d5000000"), 0);
        assert_eq!(
            DiceExpression::parse("1d4294967295"),
            Err(DiceError::InvalidDieSize(4294967295))
        );
        assert!(matches!(
            DiceExpression::parse("1000d2000000*1000"),
            Err(DiceError::Overflow(_))
        ));
        assert!(matches!(
            DiceExpression::parse("1000d2000000+1000d2000000"),
            Err(DiceError::Overflow(_))
        ));

        let expr = DiceExpression::parse("1000d2000000").unwrap();
        assert_eq!(expr.maximum(), 2_000_000_000);
        assert_eq!(expr.roll_with(|sides| sides).total, 2_000_000_000);
    }

    #[test]
    fn test_negative_multiplier_maximum() {
        let expr = DiceExpression::parse("1d6*-2").unwrap();
        assert_eq!(expr.maximum(), -2);
    }

    #[test]
    fn test_parse_simple() {
        let expr = DiceExpression::parse("1d20").unwrap();
        assert_eq!(expr.terms.len(), 1);
        assert_eq!(expr.terms[0].count, 1);
        assert_eq!(expr.terms[0].sides, 20);
        assert_eq!(expr.modifier, 0);
        assert_eq!(expr.multiplier, 1);
    }

    #[test]
    fn test_parse_with_modifier() {
        let expr = DiceExpression::parse("1d20+5").unwrap();
        assert_eq!(expr.modifier, 5);

        let expr = DiceExpression::parse("2d6-2").unwrap();
        assert_eq!(expr.modifier, -2);

        let expr = DiceExpression::parse("d6").unwrap();
        assert_eq!(expr.terms[0].count, 1);
    }

    #[test]
    fn test_parse_combined_signs() {
        let expr = DiceExpression::parse("3d6 + 2 + -1").unwrap();
        assert_eq!(expr.modifier, 1);

        let expr = DiceExpression::parse("1d20 - -2").unwrap();
        assert_eq!(expr.modifier, 2);
    }

    #[test]
    fn test_parse_multiplier_and_parens() {
        let expr = DiceExpression::parse("2d6*10").unwrap();
        assert_eq!(expr.multiplier, 10);

        let expr = DiceExpression::parse("(1d6+1)").unwrap();
        assert_eq!(expr.modifier, 1);
        assert_eq!(expr.terms[0].sides, 6);

        let expr = DiceExpression::parse("(1d4+1)*2").unwrap();
        let roll = expr.roll_with(|_| 3);
        assert_eq!(roll.total, 8);
    }

    #[test]
    fn test_parse_bare_integer() {
        let expr = DiceExpression::parse("3").unwrap();
        assert!(expr.terms.is_empty());
        assert_eq!(expr.roll().total, 3);

        let expr = DiceExpression::parse("0").unwrap();
        assert_eq!(expr.roll().total, 0);
    }

    #[test]
    fn test_zero_dice_is_flat() {
        let expr = DiceExpression::parse("0d6+2").unwrap();
        assert!(expr.terms.is_empty());
        let roll = expr.roll();
        assert_eq!(roll.total, 2);
        assert!(roll.faces().is_empty());
    }

    #[test]
    fn test_invalid_notation() {
        assert_eq!(
            DiceExpression::parse("1d0"),
            Err(DiceError::InvalidDieSize(0))
        );
        assert!(DiceExpression::parse("").is_err());
        assert!(DiceExpression::parse("banana").is_err());
        assert!(DiceExpression::parse("1d6+").is_err());
        assert!(DiceExpression::parse("1d6*x").is_err());
        assert!(matches!(
            DiceExpression::parse("5000d6"),
            Err(DiceError::TooManyDice(_))
        ));
    }

    #[test]
    fn test_lenient_fallback() {
        assert_eq!(DiceExpression::parse_lenient("2d6").terms.len(), 1);
        assert_eq!(DiceExpression::parse_lenient("").roll().total, 0);
        assert_eq!(DiceExpression::parse_lenient("xd6+3").roll().total, 3);
        assert_eq!(DiceExpression::parse_lenient("1d0").roll().total, 0);
    }

    #[test]
    fn test_roll_with_scripted_faces() {
        let expr = DiceExpression::parse("2d6+1d4-1").unwrap();
        let mut faces = vec![5, 2, 4].into_iter();
        let roll = expr.roll_with(|_| faces.next().unwrap());
        assert_eq!(roll.faces(), vec![5, 2, 4]);
        assert_eq!(roll.total, 10);
        assert_eq!(roll.natural(), None);
    }

    #[test]
    fn test_scripted_faces_are_clamped() {
        let expr = DiceExpression::parse("1d6").unwrap();
        assert_eq!(expr.roll_with(|_| 9).total, 6);
        assert_eq!(expr.roll_with(|_| 0).total, 1);
    }

    #[test]
    fn test_natural_face() {
        let expr = DiceExpression::check(20, 3);
        assert_eq!(expr.original, "1d20+3");
        let roll = expr.roll_with(|_| 17);
        assert_eq!(roll.natural(), Some(17));
        assert_eq!(roll.natural_sides(), Some(20));
        assert_eq!(roll.total, 20);

        assert_eq!(DiceExpression::check(20, -1).original, "1d20-1");
    }

    #[test]
    fn test_roll_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let expr = DiceExpression::parse("1d20+5").unwrap();
        for _ in 0..100 {
            let result = expr.roll_with_rng(&mut rng);
            assert!(result.total >= 6 && result.total <= 25);
        }
    }

    #[test]
    fn test_maximum() {
        assert_eq!(DiceExpression::parse("1d4").unwrap().maximum(), 4);
        assert_eq!(DiceExpression::parse("2d6+2").unwrap().maximum(), 14);
        assert_eq!(DiceExpression::parse("2").unwrap().maximum(), 2);
        assert_eq!(DiceExpression::parse("1d6*10").unwrap().maximum(), 60);
    }

    #[test]
    fn test_display() {
        let roll = DiceExpression::parse("2d6+1").unwrap().roll_with(|_| 3);
        assert_eq!(roll.to_string(), "[3, 3] + 1 = 7");
    }
}
