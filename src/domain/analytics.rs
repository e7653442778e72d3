//! Performance analytics over closed trades.
//!
//! Breakeven trades (pnl == 0) count toward the total but belong to neither
//! the winning nor the losing bucket.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::error::DomainError;
use super::trade::TradeRecord;

/// Ratio of gross winning to gross losing P&L.
///
/// `Unbounded` is the "no losses recorded" sentinel; it is distinct from any
/// finite ratio, including zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitFactor {
    Ratio(Decimal),
    Unbounded,
}

impl ProfitFactor {
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The finite ratio, or `None` for the unbounded sentinel.
    #[must_use]
    pub const fn ratio(&self) -> Option<Decimal> {
        match self {
            Self::Ratio(r) => Some(*r),
            Self::Unbounded => None,
        }
    }

    /// Lossy conversion; `Unbounded` maps to `f64::INFINITY`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        match self {
            Self::Ratio(r) => r.to_f64().unwrap_or(0.0),
            Self::Unbounded => f64::INFINITY,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(r) => write!(f, "{:.2}", r),
            Self::Unbounded => f.write_str("∞"),
        }
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ratio(r) => Serialize::serialize(r, serializer),
            Self::Unbounded => serializer.serialize_str("inf"),
        }
    }
}

/// Aggregate statistics over a user's closed trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage of all closed trades that were winners.
    pub win_rate: Decimal,
    pub total_pnl: Decimal,
    /// Mean pnl of winners; zero when there are none.
    pub avg_win: Decimal,
    /// Mean pnl of losers (non-positive); zero when there are none.
    pub avg_loss: Decimal,
    pub profit_factor: ProfitFactor,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,
}

impl AnalyticsSummary {
    /// Aggregate realized P&L values. Returns `Ok(None)` for an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] when a sum leaves the decimal range.
    pub fn from_pnls(pnls: &[Decimal]) -> Result<Option<Self>, DomainError> {
        let (Some(best_trade), Some(worst_trade)) =
            (pnls.iter().copied().max(), pnls.iter().copied().min())
        else {
            return Ok(None);
        };

        let total_trades = pnls.len();
        let (mut winning_trades, mut losing_trades) = (0usize, 0usize);
        let (mut gross_win, mut gross_loss) = (Decimal::ZERO, Decimal::ZERO);
        for &pnl in pnls {
            if pnl > Decimal::ZERO {
                winning_trades += 1;
                gross_win = add(gross_win, pnl, "gross_win")?;
            } else if pnl < Decimal::ZERO {
                losing_trades += 1;
                gross_loss = add(gross_loss, pnl, "gross_loss")?;
            }
        }

        let avg_win = mean(gross_win, winning_trades);
        let avg_loss = mean(gross_loss, losing_trades);
        // avg * count == gross, so the ratio uses the exact sums.
        let profit_factor = if losing_trades > 0 && !avg_loss.is_zero() {
            ProfitFactor::Ratio(
                gross_win
                    .abs()
                    .checked_div(gross_loss.abs())
                    .ok_or(DomainError::Overflow {
                        field: "profit_factor",
                    })?,
            )
        } else {
            ProfitFactor::Unbounded
        };

        Ok(Some(Self {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate: percent(winning_trades, total_trades),
            total_pnl: add(gross_win, gross_loss, "total_pnl")?,
            avg_win,
            avg_loss,
            profit_factor,
            best_trade,
            worst_trade,
        }))
    }

    /// Aggregate the closed trades in `trades`; open trades are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`from_pnls`](Self::from_pnls).
    pub fn from_trades(trades: &[TradeRecord]) -> Result<Option<Self>, DomainError> {
        let pnls: Vec<Decimal> = trades.iter().filter_map(TradeRecord::pnl).collect();
        Self::from_pnls(&pnls)
    }

    /// Qualitative reading of these numbers.
    #[must_use]
    pub fn assess(&self) -> Assessment {
        let win_rate = if self.win_rate >= Decimal::from(60) {
            WinRateTier::Excellent
        } else if self.win_rate >= Decimal::from(50) {
            WinRateTier::Good
        } else {
            WinRateTier::NeedsSelection
        };

        let profit_factor = match self.profit_factor {
            ProfitFactor::Unbounded => ProfitFactorTier::Strong,
            ProfitFactor::Ratio(r) if r > Decimal::TWO => ProfitFactorTier::Strong,
            ProfitFactor::Ratio(r) if r > Decimal::ONE => ProfitFactorTier::Profitable,
            ProfitFactor::Ratio(_) => ProfitFactorTier::ReviewRisk,
        };

        let risk_reward = if self.avg_loss.abs() > self.avg_win {
            RiskReward::TightenStops
        } else {
            RiskReward::Favorable
        };

        Assessment {
            win_rate,
            profit_factor,
            risk_reward,
        }
    }
}

fn add(a: Decimal, b: Decimal, field: &'static str) -> Result<Decimal, DomainError> {
    a.checked_add(b).ok_or(DomainError::Overflow { field })
}

/// `part / whole` as a percentage; `whole` must be non-zero.
fn percent(part: usize, whole: usize) -> Decimal {
    Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRateTier {
    /// 60% or better.
    Excellent,
    /// 50% up to 60%.
    Good,
    NeedsSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitFactorTier {
    /// Above 2, or no losses at all.
    Strong,
    /// Above 1.
    Profitable,
    ReviewRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskReward {
    /// Average loss is larger than average win.
    TightenStops,
    Favorable,
}

/// Qualitative reading of an [`AnalyticsSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub win_rate: WinRateTier,
    pub profit_factor: ProfitFactorTier,
    pub risk_reward: RiskReward,
}

/// Overview of a user's recent journal, open and closed trades together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalSummary {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    /// Sum of realized P&L; `None` when nothing has been closed.
    pub realized_pnl: Option<Decimal>,
    /// Winners as a percentage of closed trades; `None` when nothing has been closed.
    pub win_rate: Option<Decimal>,
}

impl JournalSummary {
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] when the realized total leaves the
    /// decimal range.
    pub fn from_trades(trades: &[TradeRecord]) -> Result<Self, DomainError> {
        let pnls: Vec<Decimal> = trades.iter().filter_map(TradeRecord::pnl).collect();
        let open_trades = trades.iter().filter(|t| t.is_open()).count();
        let (realized_pnl, win_rate) = if pnls.is_empty() {
            (None, None)
        } else {
            let winners = pnls.iter().filter(|p| **p > Decimal::ZERO).count();
            let total = pnls
                .iter()
                .try_fold(Decimal::ZERO, |acc, &pnl| add(acc, pnl, "realized_pnl"))?;
            (Some(total), Some(percent(winners, pnls.len())))
        };

        Ok(Self {
            total_trades: trades.len(),
            open_trades,
            closed_trades: trades.len() - open_trades,
            realized_pnl,
            win_rate,
        })
    }
}
