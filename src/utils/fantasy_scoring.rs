use crate::error::{Result, ScoringError};
use crate::models::{Finish, LeagueScoringConfig, PlayerResult, ScoreBreakdown};
use crate::utils::odds::{decimal_to_american, implied_probability};
use serde::Serialize;
use tracing::debug;

/// Standard PGA Tour field size
pub const DEFAULT_FIELD_SIZE: u32 = 156;

/// Maps a finishing position (1 = winner) to base fantasy points.
/// Points must never increase with rank.
pub trait PositionCurve: Send + Sync {
    fn points_for_position(&self, rank: u32) -> f64;
}

impl<C: PositionCurve + ?Sized> PositionCurve for &C {
    fn points_for_position(&self, rank: u32) -> f64 {
        (**self).points_for_position(rank)
    }
}

/// Logarithmic decay from `max_points` for the winner down to `min_points`
/// for the last player in the field:
///
/// `min + (max - min) × ln(1 + r × (e - 1))` with `r = (field - rank + 1) / field`
#[derive(Debug, Clone, PartialEq)]
pub struct LogarithmicCurve {
    field_size: u32,
    min_points: f64,
    max_points: f64,
}

impl Default for LogarithmicCurve {
    fn default() -> Self {
        Self {
            field_size: DEFAULT_FIELD_SIZE,
            min_points: 5.0,
            max_points: 200.0,
        }
    }
}

impl LogarithmicCurve {
    pub fn new(field_size: u32, min_points: f64, max_points: f64) -> Result<Self> {
        if field_size == 0 {
            return Err(ScoringError::InvalidScoringConfig(
                "field size must be at least 1".to_string(),
            ));
        }
        if !min_points.is_finite() || !max_points.is_finite() || min_points < 0.0 {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "position points must be finite and non-negative, got {}..{}",
                min_points, max_points
            )));
        }
        if min_points > max_points {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "last place ({}) cannot earn more than the winner ({})",
                min_points, max_points
            )));
        }

        Ok(Self {
            field_size,
            min_points,
            max_points,
        })
    }

    pub fn with_field_size(field_size: u32) -> Self {
        Self {
            field_size: field_size.max(1),
            ..Default::default()
        }
    }

    pub fn field_size(&self) -> u32 {
        self.field_size
    }
}

impl PositionCurve for LogarithmicCurve {
    fn points_for_position(&self, rank: u32) -> f64 {
        if rank == 0 {
            return 0.0;
        }

        let field = self.field_size as f64;
        let rank = rank.min(self.field_size) as f64;

        let position_ratio = (field - rank + 1.0) / field;
        let log_score = (1.0 + position_ratio * (std::f64::consts::E - 1.0)).ln();

        round_to(
            self.min_points + (self.max_points - self.min_points) * log_score,
            2,
        )
    }
}

/// Fixed points table: `table[0]` is the winner's points, positions past the
/// end of the table earn `floor`
#[derive(Debug, Clone, PartialEq)]
pub struct TieredCurve {
    table: Vec<f64>,
    floor: f64,
}

impl TieredCurve {
    pub fn new(table: Vec<f64>, floor: f64) -> Result<Self> {
        if table
            .iter()
            .chain(std::iter::once(&floor))
            .any(|points| !points.is_finite() || *points < 0.0)
        {
            return Err(ScoringError::InvalidScoringConfig(
                "tiered position points must be non-negative".to_string(),
            ));
        }
        if table.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(ScoringError::InvalidScoringConfig(
                "tiered position points must not increase with rank".to_string(),
            ));
        }

        Ok(Self { table, floor })
    }
}

impl PositionCurve for TieredCurve {
    fn points_for_position(&self, rank: u32) -> f64 {
        if rank == 0 {
            return 0.0;
        }
        self.table
            .get(rank as usize - 1)
            .copied()
            .unwrap_or(self.floor)
    }
}

/// Logarithmic odds multiplier anchored at decimal 3.0 (+200):
///
/// `clamp(1 + slope × ln(odds / pivot), min, max)`
///
/// Roughly: 6.0 (+500) ≈ 1.28x, 16.0 (+1500) ≈ 1.67x, 51.0 (+5000) ≈ 2.13x.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsCurve {
    pivot: f64,
    slope: f64,
    min_multiplier: f64,
    max_multiplier: f64,
}

impl Default for OddsCurve {
    fn default() -> Self {
        Self {
            pivot: 3.0,
            slope: 0.4,
            min_multiplier: 0.8,
            max_multiplier: 3.5,
        }
    }
}

impl OddsCurve {
    /// The multiplier must stay positive and grow with the odds, so the pivot,
    /// slope and floor are all positive and the floor sits at or below the cap
    pub fn new(pivot: f64, slope: f64, min_multiplier: f64, max_multiplier: f64) -> Result<Self> {
        let params = [
            ("pivot", pivot),
            ("slope", slope),
            ("min_multiplier", min_multiplier),
            ("max_multiplier", max_multiplier),
        ];
        for (name, value) in params {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScoringError::InvalidScoringConfig(format!(
                    "odds curve {} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if min_multiplier > max_multiplier {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "odds curve floor {} is above its cap {}",
                min_multiplier, max_multiplier
            )));
        }

        Ok(Self {
            pivot,
            slope,
            min_multiplier,
            max_multiplier,
        })
    }

    /// Multiplier before league weighting
    pub fn base_multiplier(&self, decimal_odds: f64) -> f64 {
        let raw = 1.0 + (decimal_odds / self.pivot).ln() * self.slope;
        raw.clamp(self.min_multiplier, self.max_multiplier)
    }

    /// League-weighted multiplier; the weight is applied as an exponent so the
    /// result stays positive and increasing in the odds for any weight > 0
    pub fn multiplier(&self, decimal_odds: f64, weight: f64) -> f64 {
        round_to(self.base_multiplier(decimal_odds).powf(weight), 3)
    }
}

/// Representative ranks used when projecting a golfer before the event
const PROJECTED_WIN_RANK: u32 = 1;
const PROJECTED_TOP5_RANK: u32 = 3;
const PROJECTED_TOP10_RANK: u32 = 8;
const PROJECTED_MADE_CUT_RANK: u32 = 45;

/// Pre-tournament expectation for a golfer at given win odds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub decimal_odds: f64,
    pub american_odds: i32,
    pub win_probability: f64,
    pub top5_probability: f64,
    pub top10_probability: f64,
    pub made_cut_probability: f64,
    pub missed_cut_probability: f64,
    pub projected_points: f64,
}

impl Projection {
    pub fn format(&self) -> String {
        format!(
            "{:>7} ({:.2}) | win {:>5.1}% | top 5 {:>5.1}% | top 10 {:>5.1}% | cut {:>5.1}% | MC {:>5.1}% | {:>7.1} pts",
            format!("{:+}", self.american_odds),
            self.decimal_odds,
            self.win_probability * 100.0,
            self.top5_probability * 100.0,
            self.top10_probability * 100.0,
            self.made_cut_probability * 100.0,
            self.missed_cut_probability * 100.0,
            self.projected_points
        )
    }
}

/// Scores individual player results for one league configuration.
///
/// A player's total is `(position points + bonus) × odds multiplier`.
/// Position points come from a pluggable [`PositionCurve`], exactly one bonus
/// tier applies, and the multiplier grows with the decimal odds locked in
/// with the lineup. Missing the cut scores zero regardless of odds.
#[derive(Debug, Clone)]
pub struct FantasyScoreCalculator<C: PositionCurve = LogarithmicCurve> {
    config: LeagueScoringConfig,
    curve: C,
    odds_curve: OddsCurve,
}

impl FantasyScoreCalculator<LogarithmicCurve> {
    pub fn new(config: LeagueScoringConfig) -> Result<Self> {
        Self::with_curve(config, LogarithmicCurve::default())
    }
}

impl<C: PositionCurve> FantasyScoreCalculator<C> {
    pub fn with_curve(config: LeagueScoringConfig, curve: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            curve,
            odds_curve: OddsCurve::default(),
        })
    }

    pub fn with_odds_curve(mut self, odds_curve: OddsCurve) -> Self {
        self.odds_curve = odds_curve;
        self
    }

    pub fn config(&self) -> &LeagueScoringConfig {
        &self.config
    }

    /// Bonus tier for a finish; tiers never stack
    pub fn bonus_points(&self, rank: u32) -> f64 {
        match rank {
            1 => self.config.win_points,
            2..=5 => self.config.top5_bonus,
            6..=10 => self.config.top10_bonus,
            _ => self.config.made_cut_bonus,
        }
    }

    pub fn odds_multiplier(&self, decimal_odds: f64) -> Result<f64> {
        implied_probability(decimal_odds)?;
        let multiplier = self
            .odds_curve
            .multiplier(decimal_odds, self.config.odds_multiplier);
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "odds weight {} gives an unusable multiplier {} at odds {}",
                self.config.odds_multiplier, multiplier, decimal_odds
            )));
        }
        Ok(multiplier)
    }

    /// Full breakdown of a player's score
    pub fn score_breakdown(&self, result: &PlayerResult) -> Result<ScoreBreakdown> {
        // Bad odds are rejected even when the player missed the cut
        let odds_multiplier = self.odds_multiplier(result.decimal_odds)?;

        let rank = match result.finish {
            Finish::MissedCut => return Ok(ScoreBreakdown::zero()),
            Finish::Position(0) => {
                return Err(ScoringError::MissingFinishPosition(
                    "finish position 0 is not a valid rank".to_string(),
                ))
            }
            Finish::Position(rank) => rank,
        };

        let position_points = self.curve.points_for_position(rank);
        if !position_points.is_finite() || position_points < 0.0 {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "position curve produced {} points for rank {}",
                position_points, rank
            )));
        }

        let bonus_points = self.bonus_points(rank);
        let total = round_to((position_points + bonus_points) * odds_multiplier, 2);
        if !total.is_finite() {
            return Err(ScoringError::InvalidScoringConfig(format!(
                "rank {} at odds {} overflows to {} points",
                rank, result.decimal_odds, total
            )));
        }

        debug!(
            rank,
            decimal_odds = result.decimal_odds,
            position_points,
            bonus_points,
            odds_multiplier,
            total,
            "Scored player result"
        );

        Ok(ScoreBreakdown {
            position_points,
            bonus_points,
            odds_multiplier,
            total,
        })
    }

    pub fn score(&self, result: &PlayerResult) -> Result<f64> {
        Ok(self.score_breakdown(result)?.total)
    }

    /// Expected points before the tournament. Win, top 5, top 10 and made-cut
    /// scenarios are weighted by capped probabilities taken from the win odds;
    /// whatever probability is left over is a missed cut worth nothing.
    pub fn projected_points(&self, decimal_odds: f64) -> Result<Projection> {
        let american_odds = decimal_to_american(decimal_odds)?;

        let win_probability = (1.0 / decimal_odds).min(0.15);
        let top5_probability = (3.0 / decimal_odds).min(0.25) * (1.0 - win_probability);
        let top10_probability =
            (6.0 / decimal_odds).min(0.35) * (1.0 - win_probability - top5_probability);
        let made_cut_probability = (20.0 / decimal_odds).min(0.75)
            * (1.0 - win_probability - top5_probability - top10_probability);
        let missed_cut_probability = 1.0
            - win_probability
            - top5_probability
            - top10_probability
            - made_cut_probability;

        let scenarios = [
            (PROJECTED_WIN_RANK, win_probability),
            (PROJECTED_TOP5_RANK, top5_probability),
            (PROJECTED_TOP10_RANK, top10_probability),
            (PROJECTED_MADE_CUT_RANK, made_cut_probability),
        ];
        let mut expected = 0.0;
        for (rank, probability) in scenarios {
            expected += self.score(&PlayerResult::finished(rank, decimal_odds))? * probability;
        }

        Ok(Projection {
            decimal_odds,
            american_odds,
            win_probability,
            top5_probability,
            top10_probability,
            made_cut_probability,
            missed_cut_probability,
            projected_points: round_to(expected, 1),
        })
    }
}

/// An illustrative scoring scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScoringExample {
    pub key: &'static str,
    pub description: &'static str,
    pub position: Option<u32>,
    pub made_cut: bool,
    pub decimal_odds: f64,
    pub american_odds: i32,
    pub breakdown: ScoreBreakdown,
}

impl ScoringExample {
    pub fn finish_label(&self) -> String {
        match self.position {
            Some(position) if self.made_cut => position.to_string(),
            _ => "MC".to_string(),
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{:<22} | {:>4} | {:>7} | pos {:>6.2} + bonus {:>6.2} x {:.3} = {:>7.2} pts",
            self.key,
            self.finish_label(),
            format!("{:+}", self.american_odds),
            self.breakdown.position_points,
            self.breakdown.bonus_points,
            self.breakdown.odds_multiplier,
            self.breakdown.total
        )
    }
}

/// Canned scenarios that show how odds and finish combine
pub fn scoring_examples<C: PositionCurve>(
    calculator: &FantasyScoreCalculator<C>,
) -> Result<Vec<ScoringExample>> {
    let scenarios: [(&'static str, Option<u32>, f64, &'static str); 8] = [
        ("favorite_wins", Some(1), 8.0, "Tournament winner who was a favorite"),
        ("longshot_wins", Some(1), 80.0, "Tournament winner who was a longshot"),
        ("longshot_top5", Some(3), 75.0, "Longshot with a top 5 finish"),
        ("favorite_top5", Some(4), 12.0, "Favorite with a top 5 finish"),
        ("mid_range_top10", Some(8), 35.0, "Mid-range player with a top 10"),
        ("longshot_made_cut", Some(35), 150.0, "Extreme longshot makes the cut"),
        ("favorite_poor_finish", Some(45), 6.0, "Favorite with a poor finish"),
        ("missed_cut", None, 25.0, "Missed cut scores zero regardless of odds"),
    ];

    scenarios
        .into_iter()
        .map(|(key, position, decimal_odds, description)| {
            let finish = position.map_or(Finish::MissedCut, Finish::Position);
            let breakdown =
                calculator.score_breakdown(&PlayerResult::new(finish, decimal_odds))?;
            Ok(ScoringExample {
                key,
                description,
                position,
                made_cut: position.is_some(),
                decimal_odds,
                american_odds: decimal_to_american(decimal_odds)?,
                breakdown,
            })
        })
        .collect()
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
