//! The persisted trade record and its close transition.
//!
//! Exit data lives in a single optional [`TradeExit`] block, so the exit
//! fields are present together or not at all, and the status is derived
//! from that block instead of being stored next to it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::direction::{Direction, TradeStatus};
use super::error::DomainError;
use super::form::{ValidatedClose, ValidatedOpen};
use super::id::{OwnerId, Symbol, TradeId};
use super::pnl::{compute_live_pnl, compute_pnl, LivePnl, Pnl};

/// Exit data written when a trade is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeExit {
    pub exit_price: Decimal,
    pub exit_timestamp: DateTime<Utc>,
    pub exit_reason: String,
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
    /// Live quote observed at close. Never used in P&L arithmetic.
    pub market_price_at_exit: Option<Decimal>,
}

/// One logged trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    pub trade_id: TradeId,
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub symbol: Symbol,
    pub direction: Direction,
    pub entry_price: Decimal,
    pub quantity: u32,
    pub entry_timestamp: DateTime<Utc>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub reason: String,
    pub setup_type: Option<String>,
    pub risk_amount: Option<Decimal>,
    pub commission: Decimal,
    /// Live quote observed at entry. Never used in P&L arithmetic.
    pub market_price_at_entry: Option<Decimal>,
    pub exit: Option<TradeExit>,
    pub created_at: DateTime<Utc>,
}

impl TradeRecord {
    /// Build a new OPEN record from validated input.
    #[must_use]
    pub fn open(trade_id: TradeId, input: ValidatedOpen, now: DateTime<Utc>) -> Self {
        Self {
            trade_id,
            owner_id: input.owner_id,
            owner_name: input.owner_name,
            symbol: input.symbol,
            direction: input.direction,
            entry_price: input.entry_price,
            quantity: input.quantity,
            entry_timestamp: now,
            stop_loss: input.stop_loss,
            take_profit: input.take_profit,
            reason: input.reason,
            setup_type: input.setup_type,
            risk_amount: input.risk_amount,
            commission: Decimal::ZERO,
            market_price_at_entry: input.market_price_at_entry,
            exit: None,
            created_at: now,
        }
    }

    #[must_use]
    pub fn status(&self) -> TradeStatus {
        if self.exit.is_some() {
            TradeStatus::Closed
        } else {
            TradeStatus::Open
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    /// Realized P&L, present only once closed.
    #[must_use]
    pub fn pnl(&self) -> Option<Decimal> {
        self.exit.as_ref().map(|e| e.pnl)
    }

    /// Compute the close transition for this record without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] when the realized P&L is not
    /// representable.
    pub fn settle(
        &self,
        close: &ValidatedClose,
        now: DateTime<Utc>,
    ) -> Result<TradeClose, DomainError> {
        let Pnl { pnl, pnl_percent } = compute_pnl(
            self.direction,
            self.entry_price,
            close.exit_price,
            self.quantity,
            close.commission,
        )?;
        Ok(TradeClose {
            exit: TradeExit {
                exit_price: close.exit_price,
                exit_timestamp: now,
                exit_reason: close.exit_reason.clone(),
                pnl,
                pnl_percent,
                market_price_at_exit: close.market_price_at_exit,
            },
            commission: close.commission,
        })
    }

    /// Apply a close transition. Callers must check [`is_open`](Self::is_open).
    pub fn apply_close(&mut self, close: TradeClose) {
        self.commission = close.commission;
        self.exit = Some(close.exit);
    }

    /// Difference between the entry price and the quote seen at entry.
    ///
    /// `None` when no quote was recorded, the quote equals the entry price,
    /// the quote is not positive, or the percentage is not representable.
    #[must_use]
    pub fn entry_slippage(&self) -> Option<Slippage> {
        let market = self.market_price_at_entry?;
        if market == self.entry_price || market <= Decimal::ZERO {
            return None;
        }
        let diff = self.entry_price.checked_sub(market)?;
        Some(Slippage {
            market_price: market,
            diff,
            diff_percent: diff.checked_div(market)?.checked_mul(Decimal::ONE_HUNDRED)?,
        })
    }

    /// Unrealized position view at `current_price`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] when `current_price` is so far from
    /// the entry that the figures leave the decimal range.
    pub fn mark_to_market(&self, current_price: Decimal) -> Result<LivePosition, DomainError> {
        let price_change = within("price_change", current_price.checked_sub(self.entry_price))?;
        let price_change_percent = if self.entry_price > Decimal::ZERO {
            Some(within(
                "price_change_percent",
                price_change
                    .checked_div(self.entry_price)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
            )?)
        } else {
            None
        };
        let stop_distance = self
            .stop_loss
            .map(|stop| within("stop_distance", current_price.checked_sub(stop)).map(|d| d.abs()))
            .transpose()?;
        let target_distance = self
            .take_profit
            .map(|target| {
                within("target_distance", target.checked_sub(current_price)).map(|d| d.abs())
            })
            .transpose()?;

        Ok(LivePosition {
            current_price,
            pnl: compute_live_pnl(self.direction, self.entry_price, current_price, self.quantity)?,
            price_change,
            price_change_percent,
            stop_distance,
            target_distance,
        })
    }
}

fn within(field: &'static str, value: Option<Decimal>) -> Result<Decimal, DomainError> {
    value.ok_or(DomainError::Overflow { field })
}

/// Atomic close patch: exit block plus the commission charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeClose {
    pub exit: TradeExit,
    pub commission: Decimal,
}

/// Entry price deviation from the live quote at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slippage {
    pub market_price: Decimal,
    /// `entry_price - market_price`.
    pub diff: Decimal,
    pub diff_percent: Decimal,
}

/// Open position marked against a live price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LivePosition {
    pub current_price: Decimal,
    pub pnl: LivePnl,
    pub price_change: Decimal,
    pub price_change_percent: Option<Decimal>,
    pub stop_distance: Option<Decimal>,
    pub target_distance: Option<Decimal>,
}
