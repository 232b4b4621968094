use crate::error::{Result, ScoringError};
use crate::models::{
    Finish, LeagueScoringConfig, LockedPick, PlayerResult, ScoreBreakdown, TournamentResult,
};
use crate::utils::fantasy_scoring::{round_to, FantasyScoreCalculator, PositionCurve};
use crate::utils::odds::implied_probability;
use crate::utils::player_match::PlayerMatcher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// Golfers per weekly lineup
pub const LINEUP_SIZE: usize = 3;

/// Unvalidated lineup as it arrives over the wire or from disk
#[derive(Debug, Clone, Deserialize)]
struct WeeklyLineupData {
    team_id: u32,
    tournament_id: u32,
    picks: Vec<LockedPick>,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    config: LeagueScoringConfig,
}

/// A team's three-golfer lineup for one tournament.
///
/// The odds on each pick and the league scoring config are captured when the
/// lineup is built; neither is refreshed afterwards, so later odds moves or
/// league edits never change how this lineup scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeeklyLineupData")]
pub struct WeeklyLineup {
    team_id: u32,
    tournament_id: u32,
    picks: Vec<LockedPick>,
    is_locked: bool,
    config: LeagueScoringConfig,
}

impl TryFrom<WeeklyLineupData> for WeeklyLineup {
    type Error = ScoringError;

    fn try_from(data: WeeklyLineupData) -> Result<Self> {
        let mut lineup = Self::new(data.team_id, data.tournament_id, data.picks, data.config)?;
        lineup.is_locked = data.is_locked;
        Ok(lineup)
    }
}

fn validate_picks(picks: &[LockedPick]) -> Result<()> {
    if picks.len() != LINEUP_SIZE {
        return Err(ScoringError::InvalidLineup(format!(
            "must select exactly {} players, got {}",
            LINEUP_SIZE,
            picks.len()
        )));
    }

    let unique: HashSet<u32> = picks.iter().map(|pick| pick.player_id).collect();
    if unique.len() != picks.len() {
        return Err(ScoringError::InvalidLineup(
            "cannot select the same player twice".to_string(),
        ));
    }

    for pick in picks {
        implied_probability(pick.decimal_odds).map_err(|_| {
            ScoringError::InvalidOddsInput(format!(
                "{} has invalid locked odds {}",
                pick.player_name, pick.decimal_odds
            ))
        })?;
    }

    Ok(())
}

impl WeeklyLineup {
    pub fn new(
        team_id: u32,
        tournament_id: u32,
        picks: Vec<LockedPick>,
        config: LeagueScoringConfig,
    ) -> Result<Self> {
        validate_picks(&picks)?;
        config.validate()?;

        Ok(Self {
            team_id,
            tournament_id,
            picks,
            is_locked: false,
            config,
        })
    }

    pub fn team_id(&self) -> u32 {
        self.team_id
    }

    pub fn tournament_id(&self) -> u32 {
        self.tournament_id
    }

    pub fn picks(&self) -> &[LockedPick] {
        &self.picks
    }

    pub fn config(&self) -> &LeagueScoringConfig {
        &self.config
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Swap in a new selection (with freshly captured odds) before the lock
    pub fn replace_picks(&mut self, picks: Vec<LockedPick>) -> Result<()> {
        if self.is_locked {
            return Err(ScoringError::LineupLocked {
                team_id: self.team_id,
                tournament_id: self.tournament_id,
            });
        }
        validate_picks(&picks)?;
        self.picks = picks;
        Ok(())
    }

    /// Freeze the lineup once the tournament starts
    pub fn lock(&mut self) {
        if !self.is_locked {
            info!(
                team_id = self.team_id,
                tournament_id = self.tournament_id,
                "Locking lineup"
            );
        }
        self.is_locked = true;
    }
}

/// Score for one golfer in a lineup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickScore {
    pub player_id: u32,
    pub player_name: String,
    pub finish: Option<Finish>,
    pub decimal_odds: f64,
    pub breakdown: ScoreBreakdown,
}

/// Score for a whole lineup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupScore {
    pub team_id: u32,
    pub tournament_id: u32,
    pub picks: Vec<PickScore>,
    pub total_points: f64,
}

impl LineupScore {
    pub fn format(&self) -> String {
        let picks: Vec<String> = self
            .picks
            .iter()
            .map(|pick| {
                let finish = match pick.finish {
                    Some(Finish::Position(position)) => position.to_string(),
                    Some(Finish::MissedCut) => "MC".to_string(),
                    None => "-".to_string(),
                };
                format!(
                    "{} ({}, {:.1}) {:.2}",
                    pick.player_name, finish, pick.decimal_odds, pick.breakdown.total
                )
            })
            .collect();
        format!(
            "Team {} | Tournament {} | {} | Total: {:.2}",
            self.team_id,
            self.tournament_id,
            picks.join(" | "),
            self.total_points
        )
    }
}

/// Score a lineup against tournament results using its snapshotted config.
/// Picks with no result row score zero.
pub fn score_lineup<C: PositionCurve>(
    lineup: &WeeklyLineup,
    results: &[TournamentResult],
    curve: &C,
) -> Result<LineupScore> {
    let calculator = FantasyScoreCalculator::with_curve(lineup.config.clone(), curve)?;
    let matcher = PlayerMatcher::default();

    let tournament_results: Vec<TournamentResult> = results
        .iter()
        .filter(|result| result.tournament_id == lineup.tournament_id)
        .cloned()
        .collect();

    let mut picks = Vec::with_capacity(lineup.picks.len());
    let mut total_points = 0.0;

    for pick in &lineup.picks {
        let (finish, breakdown) = match matcher.find(pick, &tournament_results) {
            Some(result) => {
                let finish = result.finish()?;
                let breakdown =
                    calculator.score_breakdown(&PlayerResult::new(finish, pick.decimal_odds))?;
                (Some(finish), breakdown)
            }
            None => {
                warn!(
                    player = %pick.player_name,
                    tournament_id = lineup.tournament_id,
                    "No result found for pick, scoring zero"
                );
                (None, ScoreBreakdown::zero())
            }
        };

        total_points += breakdown.total;
        picks.push(PickScore {
            player_id: pick.player_id,
            player_name: pick.player_name.clone(),
            finish,
            decimal_odds: pick.decimal_odds,
            breakdown,
        });
    }

    Ok(LineupScore {
        team_id: lineup.team_id,
        tournament_id: lineup.tournament_id,
        picks,
        total_points: round_to(total_points, 2),
    })
}

/// A team fields one lineup per tournament; a second one for the same week
/// is rejected rather than scored twice
pub fn ensure_unique_lineups(lineups: &[WeeklyLineup]) -> Result<()> {
    let mut seen = HashSet::new();
    for lineup in lineups {
        if !seen.insert((lineup.team_id, lineup.tournament_id)) {
            return Err(ScoringError::InvalidLineup(format!(
                "team {} already has a lineup for tournament {}",
                lineup.team_id, lineup.tournament_id
            )));
        }
    }
    Ok(())
}

/// A team's accumulated points across every scored lineup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTotal {
    pub team_id: u32,
    pub lineups: usize,
    pub total_points: f64,
}

/// Sum lineup scores per team, ordered by team id
pub fn season_totals(scores: &[LineupScore]) -> Vec<TeamTotal> {
    let mut totals: BTreeMap<u32, TeamTotal> = BTreeMap::new();

    for score in scores {
        let entry = totals.entry(score.team_id).or_insert(TeamTotal {
            team_id: score.team_id,
            lineups: 0,
            total_points: 0.0,
        });
        entry.lineups += 1;
        entry.total_points += score.total_points;
    }

    totals
        .into_values()
        .map(|mut total| {
            total.total_points = round_to(total.total_points, 2);
            total
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub position: usize,
    pub team_id: u32,
    pub total_points: f64,
}

/// Rank teams by points (descending). Ties keep team id order.
pub fn league_standings(totals: &[TeamTotal]) -> Vec<StandingsEntry> {
    let mut ordered: Vec<&TeamTotal> = totals.iter().collect();
    ordered.sort_by_key(|total| total.team_id);
    // Stable sort keeps the team id order for ties
    ordered.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, total)| StandingsEntry {
            position: i + 1,
            team_id: total.team_id,
            total_points: total.total_points,
        })
        .collect()
}
