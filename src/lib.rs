pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::AppConfig;
pub use error::{Result, ScoringError};
pub use models::*;
pub use utils::*;

use serde::{Deserialize, Serialize};
use tracing::info;
use utils::fantasy_scoring::PositionCurve;
use utils::lineup::{
    ensure_unique_lineups, league_standings, score_lineup, season_totals, LineupScore,
    StandingsEntry, TeamTotal, WeeklyLineup,
};

/// Everything a league page shows after a round of scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueReport {
    pub lineup_scores: Vec<LineupScore>,
    pub season_totals: Vec<TeamTotal>,
    pub standings: Vec<StandingsEntry>,
}

/// Score every lineup against the results feed and roll the scores up into
/// season totals and standings
pub fn build_league_report<C: PositionCurve>(
    lineups: &[WeeklyLineup],
    results: &[TournamentResult],
    curve: &C,
) -> Result<LeagueReport> {
    ensure_unique_lineups(lineups)?;

    let lineup_scores = lineups
        .iter()
        .map(|lineup| score_lineup(lineup, results, curve))
        .collect::<Result<Vec<_>>>()?;

    let season_totals = season_totals(&lineup_scores);
    let standings = league_standings(&season_totals);

    info!(
        lineups = lineup_scores.len(),
        teams = standings.len(),
        "Built league report"
    );

    Ok(LeagueReport {
        lineup_scores,
        season_totals,
        standings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::fantasy_scoring::LogarithmicCurve;

    fn lineup(team_id: u32, tournament_id: u32, odds: [f64; 3]) -> WeeklyLineup {
        let picks = (1..=3)
            .zip(odds)
            .map(|(id, decimal_odds)| LockedPick {
                player_id: id,
                player_name: format!("Player {}", id),
                decimal_odds,
            })
            .collect();
        WeeklyLineup::new(team_id, tournament_id, picks, LeagueScoringConfig::default()).unwrap()
    }

    fn finished(tournament_id: u32, player_id: u32, position: u32) -> TournamentResult {
        TournamentResult {
            tournament_id,
            player_id: Some(player_id),
            player_name: None,
            position: Some(position),
            made_cut: true,
        }
    }

    #[test]
    fn test_build_league_report() {
        // Same golfers, team 2 locked them at longer odds
        let lineups = vec![
            lineup(1, 10, [5.0, 8.0, 12.0]),
            lineup(2, 10, [10.0, 16.0, 24.0]),
            lineup(1, 11, [5.0, 8.0, 12.0]),
        ];
        let results = vec![
            finished(10, 1, 1),
            finished(10, 2, 7),
            finished(10, 3, 30),
            finished(11, 1, 2),
        ];

        let report = build_league_report(&lineups, &results, &LogarithmicCurve::default()).unwrap();
        assert_eq!(report.lineup_scores.len(), 3);
        assert_eq!(report.season_totals.len(), 2);
        assert_eq!(report.season_totals[0].lineups, 2);

        let week_one: Vec<f64> = report
            .lineup_scores
            .iter()
            .filter(|s| s.tournament_id == 10)
            .map(|s| s.total_points)
            .collect();
        assert!(week_one[1] > week_one[0]);

        assert_eq!(report.standings[0].position, 1);
        assert!(report.standings[0].total_points >= report.standings[1].total_points);
    }

    #[test]
    fn test_repeated_lineup_is_not_counted_twice() {
        let week = lineup(1, 10, [5.0, 8.0, 12.0]);
        let results = vec![finished(10, 1, 1), finished(10, 2, 7)];
        let curve = LogarithmicCurve::default();

        assert!(build_league_report(&[week.clone()], &results, &curve).is_ok());
        assert!(matches!(
            build_league_report(&[week.clone(), week], &results, &curve),
            Err(ScoringError::InvalidLineup(_))
        ));
    }
}
