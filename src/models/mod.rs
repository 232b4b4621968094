use crate::error::{Result, ScoringError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Odds in either sportsbook representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "lowercase")]
pub enum OddsValue {
    American(i32), // e.g. +150, -110
    Decimal(f64),  // total payout multiple including stake, always > 1.0
}

/// Scoring rules for a fantasy league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueScoringConfig {
    pub win_points: f64,
    #[serde(rename = "top_5_bonus")]
    pub top5_bonus: f64,
    #[serde(rename = "top_10_bonus")]
    pub top10_bonus: f64,
    pub made_cut_bonus: f64,
    /// Exponent applied to the odds curve; 1.0 uses the curve as-is
    pub odds_multiplier: f64,
}

impl Default for LeagueScoringConfig {
    fn default() -> Self {
        Self {
            win_points: 100.0,
            top5_bonus: 50.0,
            top10_bonus: 25.0,
            made_cut_bonus: 10.0,
            odds_multiplier: 1.0,
        }
    }
}

impl LeagueScoringConfig {
    /// Reject negative bonuses and a non-positive odds multiplier
    pub fn validate(&self) -> Result<()> {
        let bonuses = [
            ("win_points", self.win_points),
            ("top_5_bonus", self.top5_bonus),
            ("top_10_bonus", self.top10_bonus),
            ("made_cut_bonus", self.made_cut_bonus),
        ];
        for (name, value) in bonuses {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidScoringConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !self.odds_multiplier.is_finite() || self.odds_multiplier <= 0.0 {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "odds_multiplier must be positive, got {}",
                self.odds_multiplier
            )));
        }

        Ok(())
    }
}

/// Where a player ended a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Position(u32),
    MissedCut,
}

/// One player's outcome plus the decimal odds locked in with the lineup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub finish: Finish,
    pub decimal_odds: f64,
}

impl PlayerResult {
    pub fn new(finish: Finish, decimal_odds: f64) -> Self {
        Self {
            finish,
            decimal_odds,
        }
    }

    pub fn missed_cut(decimal_odds: f64) -> Self {
        Self::new(Finish::MissedCut, decimal_odds)
    }

    pub fn finished(position: u32, decimal_odds: f64) -> Self {
        Self::new(Finish::Position(position), decimal_odds)
    }
}

/// A golfer known to the league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
}

/// Final result row from the tournament results feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub tournament_id: u32,
    #[serde(default)]
    pub player_id: Option<u32>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub made_cut: bool,
}

impl TournamentResult {
    /// Resolve the feed row into a finish, rejecting rows that made the cut
    /// without a usable position
    pub fn finish(&self) -> Result<Finish> {
        if !self.made_cut {
            return Ok(Finish::MissedCut);
        }

        match self.position {
            Some(position) if position > 0 => Ok(Finish::Position(position)),
            _ => Err(ScoringError::MissingFinishPosition(self.label())),
        }
    }

    fn label(&self) -> String {
        match (&self.player_name, self.player_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("player {}", id),
            (None, None) => "unidentified player".to_string(),
        }
    }
}

/// A golfer selected in a lineup, with the odds captured at submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedPick {
    pub player_id: u32,
    pub player_name: String,
    pub decimal_odds: f64,
}

/// How a single player's fantasy total was built
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub position_points: f64,
    pub bonus_points: f64,
    pub odds_multiplier: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Breakdown for a player who scores nothing (missed cut or no result)
    pub fn zero() -> Self {
        Self {
            position_points: 0.0,
            bonus_points: 0.0,
            odds_multiplier: 1.0,
            total: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Pushed,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Pushed => "pushed",
        }
    }
}

/// A wager recorded in a user's betting ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: u32,
    pub bet_type: String, // "outright", "top_5", "top_10", "head_to_head", ...
    pub amount: f64,
    #[serde(default)]
    pub odds: Option<f64>, // Decimal odds
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LeagueScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_negative_bonus() {
        let config = LeagueScoringConfig {
            top10_bonus: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoringError::InvalidScoringConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_non_positive_multiplier() {
        for multiplier in [0.0, -1.0, f64::NAN] {
            let config = LeagueScoringConfig {
                odds_multiplier: multiplier,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_config_uses_league_field_names() {
        let json = r#"{"win_points": 150, "top_5_bonus": 75, "top_10_bonus": 40}"#;
        let config: LeagueScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.win_points, 150.0);
        assert_eq!(config.top5_bonus, 75.0);
        assert_eq!(config.top10_bonus, 40.0);
        // Unspecified fields fall back to league defaults
        assert_eq!(config.made_cut_bonus, 10.0);
        assert_eq!(config.odds_multiplier, 1.0);
    }

    #[test]
    fn test_tournament_result_finish() {
        let mut row = TournamentResult {
            tournament_id: 1,
            player_id: Some(7),
            player_name: None,
            position: Some(12),
            made_cut: true,
        };
        assert_eq!(row.finish().unwrap(), Finish::Position(12));

        row.made_cut = false;
        assert_eq!(row.finish().unwrap(), Finish::MissedCut);

        row.made_cut = true;
        row.position = None;
        assert_eq!(
            row.finish(),
            Err(ScoringError::MissingFinishPosition("player 7".to_string()))
        );

        row.position = Some(0);
        assert!(row.finish().is_err());
    }

    #[test]
    fn test_odds_value_serde_shape() {
        let json = serde_json::to_string(&OddsValue::American(-110)).unwrap();
        assert_eq!(json, r#"{"format":"american","value":-110}"#);
    }
}
