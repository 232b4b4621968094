use crate::models::{LockedPick, Player, TournamentResult};

/// Anything that identifies a golfer by id and/or name
pub trait PlayerRecord {
    fn record_id(&self) -> Option<u32>;
    fn record_name(&self) -> Option<&str>;
}

impl PlayerRecord for Player {
    fn record_id(&self) -> Option<u32> {
        Some(self.id)
    }

    fn record_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl PlayerRecord for LockedPick {
    fn record_id(&self) -> Option<u32> {
        Some(self.player_id)
    }

    fn record_name(&self) -> Option<&str> {
        Some(&self.player_name)
    }
}

impl PlayerRecord for TournamentResult {
    fn record_id(&self) -> Option<u32> {
        self.player_id
    }

    fn record_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }
}

/// Normalize a golfer name for loose comparison
/// "  Ludvig ÅBERG " -> "ludvig åberg"
pub fn normalize_player_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A single way two records can be considered the same golfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    ExactId,
    ExactName,
    NormalizedName,
}

impl MatchRule {
    pub fn matches(&self, target: &impl PlayerRecord, candidate: &impl PlayerRecord) -> bool {
        match self {
            MatchRule::ExactId => match (target.record_id(), candidate.record_id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            MatchRule::ExactName => match (target.record_name(), candidate.record_name()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            MatchRule::NormalizedName => match (target.record_name(), candidate.record_name()) {
                (Some(a), Some(b)) => {
                    let a = normalize_player_name(a);
                    !a.is_empty() && a == normalize_player_name(b)
                }
                _ => false,
            },
        }
    }
}

/// Tries each rule in order across all candidates and returns the first hit
#[derive(Debug, Clone)]
pub struct PlayerMatcher {
    rules: Vec<MatchRule>,
}

impl Default for PlayerMatcher {
    fn default() -> Self {
        Self::new(vec![
            MatchRule::ExactId,
            MatchRule::ExactName,
            MatchRule::NormalizedName,
        ])
    }
}

impl PlayerMatcher {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    pub fn find<'a, T: PlayerRecord>(
        &self,
        target: &impl PlayerRecord,
        candidates: &'a [T],
    ) -> Option<&'a T> {
        self.rules.iter().find_map(|rule| {
            candidates
                .iter()
                .find(|candidate| rule.matches(target, *candidate))
        })
    }
}
