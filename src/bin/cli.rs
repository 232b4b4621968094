use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use golf_fantasy::bet_stats::{betting_analytics, betting_stats};
use golf_fantasy::data::{load_json, save_json, save_lineup_scores_to_csv, save_standings_to_csv};
use golf_fantasy::fantasy_scoring::{scoring_examples, FantasyScoreCalculator, LogarithmicCurve};
use golf_fantasy::lineup::WeeklyLineup;
use golf_fantasy::odds::{
    american_to_decimal, decimal_to_american, format_american, implied_probability,
    parse_american,
};
use golf_fantasy::{
    build_league_report, AppConfig, Bet, LeagueScoringConfig, PlayerResult, TournamentResult,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "golf-fantasy", about = "Golf odds conversion, fantasy scoring and bet tracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert between American and decimal odds
    Convert {
        #[command(subcommand)]
        from: ConvertFrom,
    },
    /// Score a single player result
    Score(ScoreArgs),
    /// Project pre-tournament fantasy points from decimal win odds
    Project {
        /// One or more decimal win odds, e.g. 9.0 21.0 81.0
        #[arg(required = true)]
        odds: Vec<f64>,
    },
    /// Score weekly lineups and print season standings.
    /// Relative paths resolve under GOLF_DATA_DIR.
    Lineup {
        /// JSON file with an array of weekly lineups
        #[arg(long)]
        lineups: PathBuf,
        /// JSON file with an array of tournament results
        #[arg(long)]
        results: PathBuf,
        /// Write per-pick scores to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write standings to this CSV file
        #[arg(long)]
        standings_csv: Option<PathBuf>,
        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Summarize a betting ledger. Relative paths resolve under GOLF_DATA_DIR.
    Bets {
        /// JSON file with an array of bets
        #[arg(long)]
        file: PathBuf,
        /// Print chart breakdowns as JSON as well
        #[arg(long)]
        analytics: bool,
    },
    /// Show the canned scoring scenarios
    Examples,
}

#[derive(Subcommand)]
enum ConvertFrom {
    /// American odds such as +150, -110 or EVEN
    American {
        #[arg(allow_hyphen_values = true)]
        odds: String,
    },
    /// Decimal odds such as 2.5
    Decimal { odds: f64 },
}

#[derive(Args)]
struct ScoreArgs {
    /// Decimal odds locked in with the lineup
    #[arg(long)]
    odds: f64,
    /// Finishing position
    #[arg(long, conflicts_with = "missed_cut", required_unless_present = "missed_cut")]
    position: Option<u32>,
    /// The player missed the cut
    #[arg(long)]
    missed_cut: bool,
    #[arg(long)]
    win_points: Option<f64>,
    #[arg(long)]
    top5_bonus: Option<f64>,
    #[arg(long)]
    top10_bonus: Option<f64>,
    #[arg(long)]
    made_cut_bonus: Option<f64>,
    #[arg(long)]
    odds_multiplier: Option<f64>,
}

impl ScoreArgs {
    fn league(&self, defaults: &LeagueScoringConfig) -> LeagueScoringConfig {
        LeagueScoringConfig {
            win_points: self.win_points.unwrap_or(defaults.win_points),
            top5_bonus: self.top5_bonus.unwrap_or(defaults.top5_bonus),
            top10_bonus: self.top10_bonus.unwrap_or(defaults.top10_bonus),
            made_cut_bonus: self.made_cut_bonus.unwrap_or(defaults.made_cut_bonus),
            odds_multiplier: self.odds_multiplier.unwrap_or(defaults.odds_multiplier),
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let curve = LogarithmicCurve::with_field_size(config.field_size);

    match cli.command {
        Command::Convert { from } => convert(from)?,
        Command::Score(args) => {
            let league = args.league(&config.league);
            let calculator = FantasyScoreCalculator::with_curve(league, curve)?;
            let result = match args.position {
                Some(position) if !args.missed_cut => PlayerResult::finished(position, args.odds),
                _ => PlayerResult::missed_cut(args.odds),
            };
            let breakdown = calculator.score_breakdown(&result)?;

            println!("Position points: {:.2}", breakdown.position_points);
            println!("Bonus points:    {:.2}", breakdown.bonus_points);
            println!("Odds multiplier: {:.3}", breakdown.odds_multiplier);
            println!("Total:           {:.2}", breakdown.total);
        }
        Command::Project { odds } => {
            let calculator = FantasyScoreCalculator::with_curve(config.league.clone(), &curve)?;
            println!("PROJECTED POINTS\n");
            for decimal_odds in odds {
                println!("{}", calculator.projected_points(decimal_odds)?.format());
            }
        }
        Command::Lineup {
            lineups,
            results,
            csv,
            standings_csv,
            json,
        } => {
            let lineups: Vec<WeeklyLineup> = load_json(config.data_path(&lineups))?;
            let results: Vec<TournamentResult> = load_json(config.data_path(&results))?;
            info!(lineups = lineups.len(), results = results.len(), "Loaded lineup data");

            let report = build_league_report(&lineups, &results, &curve)
                .context("Failed to score lineups")?;

            println!("LINEUP SCORES\n");
            for (i, score) in report.lineup_scores.iter().enumerate() {
                println!("{}. {}", i + 1, score.format());
            }

            println!("\nSTANDINGS\n");
            if report.standings.is_empty() {
                println!("No teams scored.");
            }
            for entry in &report.standings {
                println!(
                    "{:>3}. Team {:<6} {:>10.2} pts",
                    entry.position, entry.team_id, entry.total_points
                );
            }

            if let Some(path) = csv.map(|path| config.data_path(path)) {
                save_lineup_scores_to_csv(&report.lineup_scores, &path)?;
                println!("\nSaved lineup scores to {}", path.display());
            }
            if let Some(path) = standings_csv.map(|path| config.data_path(path)) {
                save_standings_to_csv(&report.standings, &path)?;
                println!("Saved standings to {}", path.display());
            }
            if let Some(path) = json.map(|path| config.data_path(path)) {
                save_json(&report, &path)?;
                println!("Saved report to {}", path.display());
            }
        }
        Command::Bets { file, analytics } => {
            let bets: Vec<Bet> = load_json(config.data_path(&file))?;
            let stats = betting_stats(&bets)?;
            println!("{}", stats.format());

            if analytics {
                let analytics = betting_analytics(&bets)?;
                println!(
                    "\n{}",
                    serde_json::to_string_pretty(&analytics)
                        .context("Failed to serialize analytics")?
                );
            }
        }
        Command::Examples => {
            let calculator = FantasyScoreCalculator::with_curve(config.league.clone(), curve)?;
            println!("SCORING EXAMPLES\n");
            for (i, example) in scoring_examples(&calculator)?.iter().enumerate() {
                println!("{}. {}", i + 1, example.format());
                println!("   {}", example.description);
            }
        }
    }

    Ok(())
}

fn convert(from: ConvertFrom) -> Result<()> {
    match from {
        ConvertFrom::American { odds } => {
            let american = parse_american(&odds)?;
            let decimal = american_to_decimal(american)?;
            println!(
                "{} -> {:.4} (implied {:.1}%)",
                format_american(american),
                decimal,
                implied_probability(decimal)? * 100.0
            );
        }
        ConvertFrom::Decimal { odds } => {
            let american = decimal_to_american(odds)?;
            println!(
                "{:.4} -> {} (implied {:.1}%)",
                odds,
                format_american(american),
                implied_probability(odds)? * 100.0
            );
        }
    }
    Ok(())
}
