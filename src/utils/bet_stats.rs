use crate::error::{Result, ScoringError};
use crate::models::{Bet, BetStatus};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of bets shown in the recent form list
const RECENT_FORM_LEN: usize = 10;

impl Bet {
    /// Reject non-positive stakes and odds that cannot pay out
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ScoringError::InvalidBet {
                id: self.id,
                reason: format!("stake must be positive, got {}", self.amount),
            });
        }
        if let Some(odds) = self.odds {
            if !odds.is_finite() || odds <= 1.0 {
                return Err(ScoringError::InvalidBet {
                    id: self.id,
                    reason: format!("decimal odds must be greater than 1.0, got {}", odds),
                });
            }
        }
        if self.status == BetStatus::Won && self.odds.is_none() {
            return Err(ScoringError::InvalidBet {
                id: self.id,
                reason: "a won bet needs odds to settle its payout".to_string(),
            });
        }
        Ok(())
    }

    /// Total return if the bet wins (stake included)
    pub fn potential_payout(&self) -> Option<f64> {
        self.odds.map(|odds| self.amount * odds)
    }

    /// Amount paid back once settled (stake included): the payout when won,
    /// the stake when pushed
    pub fn returned(&self) -> f64 {
        match self.status {
            BetStatus::Won => self.potential_payout().unwrap_or(0.0),
            BetStatus::Pushed => self.amount,
            BetStatus::Lost | BetStatus::Pending => 0.0,
        }
    }

    /// Realized profit; nothing while pending
    pub fn profit(&self) -> f64 {
        if self.is_settled() {
            self.returned() - self.amount
        } else {
            0.0
        }
    }

    fn is_settled(&self) -> bool {
        self.status != BetStatus::Pending
    }
}

/// Summary of a betting ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingStats {
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    pub pending_bets: usize,
    pub pushed_bets: usize,
    pub win_percentage: f64,
    pub total_wagered: f64,
    pub total_winnings: f64,
    pub net_profit: f64,
    pub roi_percentage: f64,
}

impl BettingStats {
    pub fn format(&self) -> String {
        format!(
            "Bets: {} (W {} / L {} / P {} / Push {}) | Win: {:.1}% | Wagered: {:.2} | Returned: {:.2} | Net: {:+.2} | ROI: {:+.1}%",
            self.total_bets,
            self.won_bets,
            self.lost_bets,
            self.pending_bets,
            self.pushed_bets,
            self.win_percentage,
            self.total_wagered,
            self.total_winnings,
            self.net_profit,
            self.roi_percentage
        )
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Compute ledger statistics. Stakes still pending are not counted as
/// wagered, and pushed bets return their stake.
pub fn betting_stats(bets: &[Bet]) -> Result<BettingStats> {
    for bet in bets {
        bet.validate()?;
    }

    let count = |status: BetStatus| bets.iter().filter(|b| b.status == status).count();
    let won_bets = count(BetStatus::Won);
    let lost_bets = count(BetStatus::Lost);
    let pending_bets = count(BetStatus::Pending);
    let pushed_bets = count(BetStatus::Pushed);

    let total_wagered: f64 = bets
        .iter()
        .filter(|b| b.is_settled())
        .map(|b| b.amount)
        .sum();
    let total_winnings: f64 = bets.iter().map(Bet::returned).sum();
    let net_profit = total_winnings - total_wagered;

    Ok(BettingStats {
        total_bets: bets.len(),
        won_bets,
        lost_bets,
        pending_bets,
        pushed_bets,
        win_percentage: percentage(won_bets as f64, bets.len() as f64),
        total_wagered,
        total_winnings,
        net_profit,
        roi_percentage: percentage(net_profit, total_wagered),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: f64,
    pub cumulative_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    pub month: String, // YYYY-MM
    pub bets: usize,
    pub wins: usize,
    pub profit: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetTypePerformance {
    pub bet_type: String,
    pub count: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBet {
    pub bet_id: u32,
    pub bet_type: String,
    pub amount: f64,
    pub status: BetStatus,
    pub profit: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRatePoint {
    pub week_start: NaiveDate, // Monday
    pub bets: usize,
    pub win_rate: f64,
}

/// Chart-ready breakdowns of a betting ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingAnalytics {
    pub daily_profit: Vec<DailyProfit>,
    pub monthly_performance: Vec<MonthlyPerformance>,
    pub bet_type_performance: Vec<BetTypePerformance>,
    pub recent_form: Vec<RecentBet>,
    pub win_rate_trend: Vec<WinRatePoint>,
}

#[derive(Default)]
struct Tally {
    bets: usize,
    wins: usize,
    profit: f64,
}

impl Tally {
    fn add(&mut self, bet: &Bet) {
        self.bets += 1;
        if bet.status == BetStatus::Won {
            self.wins += 1;
        }
        self.profit += bet.profit();
    }

    fn win_rate(&self) -> f64 {
        percentage(self.wins as f64, self.bets as f64)
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Bucket a ledger by day, month, bet type and week
pub fn betting_analytics(bets: &[Bet]) -> Result<BettingAnalytics> {
    for bet in bets {
        bet.validate()?;
    }

    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut monthly: BTreeMap<String, Tally> = BTreeMap::new();
    let mut by_type: BTreeMap<String, Tally> = BTreeMap::new();
    let mut weekly: BTreeMap<NaiveDate, Tally> = BTreeMap::new();

    for bet in bets {
        let date = bet.placed_at.date_naive();
        *daily.entry(date).or_insert(0.0) += bet.profit();
        monthly
            .entry(bet.placed_at.format("%Y-%m").to_string())
            .or_default()
            .add(bet);
        by_type.entry(bet.bet_type.clone()).or_default().add(bet);
        weekly.entry(week_start(date)).or_default().add(bet);
    }

    let mut cumulative_profit = 0.0;
    let daily_profit = daily
        .into_iter()
        .map(|(date, profit)| {
            cumulative_profit += profit;
            DailyProfit {
                date,
                profit,
                cumulative_profit,
            }
        })
        .collect();

    let monthly_performance = monthly
        .into_iter()
        .map(|(month, tally)| MonthlyPerformance {
            month,
            bets: tally.bets,
            wins: tally.wins,
            profit: tally.profit,
            win_rate: tally.win_rate(),
        })
        .collect();

    let bet_type_performance = by_type
        .into_iter()
        .map(|(bet_type, tally)| BetTypePerformance {
            bet_type,
            count: tally.bets,
            wins: tally.wins,
            win_rate: tally.win_rate(),
            profit: tally.profit,
        })
        .collect();

    let mut recent: Vec<&Bet> = bets.iter().collect();
    recent.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
    let recent_form = recent
        .into_iter()
        .take(RECENT_FORM_LEN)
        .map(|bet| RecentBet {
            bet_id: bet.id,
            bet_type: bet.bet_type.clone(),
            amount: bet.amount,
            status: bet.status,
            profit: bet.profit(),
            date: bet.placed_at.date_naive(),
        })
        .collect();

    let win_rate_trend = weekly
        .into_iter()
        .map(|(week_start, tally)| WinRatePoint {
            week_start,
            bets: tally.bets,
            win_rate: tally.win_rate(),
        })
        .collect();

    Ok(BettingAnalytics {
        daily_profit,
        monthly_performance,
        bet_type_performance,
        recent_form,
        win_rate_trend,
    })
}
