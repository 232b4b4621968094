use crate::models::Finish;
use crate::utils::lineup::{LineupScore, StandingsEntry};
use crate::utils::odds::{decimal_to_american, format_american};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load any JSON document (lineups, results, bets) from disk
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;
    Ok(value)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Save a value as pretty JSON, creating parent directories as needed
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).context("Failed to serialize data")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Save per-pick lineup scores to CSV, one row per golfer
pub fn save_lineup_scores_to_csv(scores: &[LineupScore], filename: impl AsRef<Path>) -> Result<()> {
    create_parent_dir(filename.as_ref())?;
    let mut writer = csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    writer.write_record([
        "Team",
        "Tournament",
        "Player",
        "Finish",
        "Decimal Odds",
        "American Odds",
        "Position Points",
        "Bonus Points",
        "Odds Multiplier",
        "Points",
    ])?;

    for score in scores {
        for pick in &score.picks {
            let finish = match pick.finish {
                Some(Finish::Position(position)) => position.to_string(),
                Some(Finish::MissedCut) => "MC".to_string(),
                None => String::new(),
            };
            let american = decimal_to_american(pick.decimal_odds)
                .map(format_american)
                .unwrap_or_default();

            writer.write_record([
                score.team_id.to_string(),
                score.tournament_id.to_string(),
                pick.player_name.clone(),
                finish,
                format!("{:.2}", pick.decimal_odds),
                american,
                format!("{:.2}", pick.breakdown.position_points),
                format!("{:.2}", pick.breakdown.bonus_points),
                format!("{:.3}", pick.breakdown.odds_multiplier),
                format!("{:.2}", pick.breakdown.total),
            ])?;
        }
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Save league standings to CSV
pub fn save_standings_to_csv(standings: &[StandingsEntry], filename: impl AsRef<Path>) -> Result<()> {
    create_parent_dir(filename.as_ref())?;
    let mut writer = csv::Writer::from_path(filename.as_ref()).context("Failed to create CSV file")?;

    writer.write_record(["Position", "Team", "Points"])?;
    for entry in standings {
        writer.write_record([
            entry.position.to_string(),
            entry.team_id.to_string(),
            format!("{:.2}", entry.total_points),
        ])?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}
