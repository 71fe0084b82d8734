//! Bracket roles and the game skeletons built from them.

use std::fmt;

use crate::models::PlacementFormat;

/// The structural role of a bracket game, independent of its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BracketRole {
    QuarterFinal(u8),
    SemiFinal(u8),
    Crossover(u8),
    ThirdPlace,
    Final,
}

impl BracketRole {
    /// Recognize a role from a default standing label.
    pub fn from_standing(standing: &str) -> Option<Self> {
        let standing = standing.trim();
        match standing {
            "Final" => return Some(BracketRole::Final),
            "3rd Place" => return Some(BracketRole::ThirdPlace),
            _ => {}
        }

        let prefix = standing.get(..2)?;
        let digits = standing.get(2..)?;
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: u8 = digits.parse().ok()?;
        match (prefix, number) {
            ("QF", 1..=4) => Some(BracketRole::QuarterFinal(number)),
            ("SF", 1..=2) => Some(BracketRole::SemiFinal(number)),
            ("CO", 1..=2) => Some(BracketRole::Crossover(number)),
            _ => None,
        }
    }

    /// Default standing label for a freshly created game.
    pub fn standing(&self) -> String {
        self.to_string()
    }

    /// Play order within a bracket stage: earlier rounds first, the final last.
    pub fn play_order(&self) -> u32 {
        match self {
            BracketRole::QuarterFinal(n) => u32::from(*n),
            BracketRole::Crossover(n) => 4 + u32::from(*n),
            BracketRole::SemiFinal(n) => 6 + u32::from(*n),
            BracketRole::ThirdPlace => 9,
            BracketRole::Final => 10,
        }
    }
}

impl fmt::Display for BracketRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketRole::QuarterFinal(n) => write!(f, "QF{}", n),
            BracketRole::SemiFinal(n) => write!(f, "SF{}", n),
            BracketRole::Crossover(n) => write!(f, "CO{}", n),
            BracketRole::ThirdPlace => write!(f, "3rd Place"),
            BracketRole::Final => write!(f, "Final"),
        }
    }
}

/// Games of a placement stage, in creation order.
///
/// Returns `None` for position counts the format does not support; callers
/// fall back to a lone final.
pub fn skeleton(positions: usize, format: PlacementFormat) -> Option<Vec<BracketRole>> {
    use BracketRole::*;

    match (format, positions) {
        (_, 2) => Some(vec![Final]),
        (PlacementFormat::SingleElimination, 4) => {
            Some(vec![SemiFinal(1), SemiFinal(2), Final, ThirdPlace])
        }
        (PlacementFormat::SingleElimination, 8) => Some(vec![
            QuarterFinal(1),
            QuarterFinal(2),
            QuarterFinal(3),
            QuarterFinal(4),
            SemiFinal(1),
            SemiFinal(2),
            Final,
            ThirdPlace,
        ]),
        (PlacementFormat::Crossover, 4) => {
            Some(vec![Crossover(1), Crossover(2), Final, ThirdPlace])
        }
        _ => None,
    }
}
