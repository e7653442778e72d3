//! Profit-and-loss arithmetic.
//!
//! Pure functions over decimals; no I/O. Realized P&L subtracts commission
//! and is persisted on close. Unrealized (live) P&L omits commission and is
//! computed on demand against a supplied market price.

use rust_decimal::Decimal;
use serde::Serialize;

use super::direction::Direction;
use super::error::DomainError;

/// Realized result of closing a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pnl {
    /// Profit or loss in account currency, net of commission.
    pub pnl: Decimal,
    /// `pnl` as a percentage of `entry_price * quantity`.
    pub pnl_percent: Decimal,
}

/// Unrealized P&L of an open position at a given price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LivePnl {
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
    /// `pnl / quantity`; absent when quantity is zero.
    pub per_share: Option<Decimal>,
}

/// Gross move of `exit` relative to `entry`, signed by direction.
fn gross(
    direction: Direction,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: u32,
) -> Result<Decimal, DomainError> {
    let diff = if direction.is_bullish() {
        exit_price.checked_sub(entry_price)
    } else {
        entry_price.checked_sub(exit_price)
    };
    diff.and_then(|d| d.checked_mul(Decimal::from(quantity)))
        .ok_or(DomainError::Overflow { field: "pnl" })
}

/// Percentage of `pnl` relative to the capital committed at entry.
///
/// Zero when the committed capital is not positive.
///
/// # Errors
///
/// Returns [`DomainError::Overflow`] when the ratio leaves the decimal range.
pub fn percent_of_investment(
    pnl: Decimal,
    entry_price: Decimal,
    quantity: u32,
) -> Result<Decimal, DomainError> {
    let investment = entry_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(DomainError::Overflow { field: "investment" })?;
    if investment <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    pnl.checked_div(investment)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(DomainError::Overflow {
            field: "pnl_percent",
        })
}

/// Compute realized P&L for a closed trade.
///
/// LONG/CALL: `(exit - entry) * qty - commission`.
/// SHORT/PUT: `(entry - exit) * qty - commission`.
///
/// # Errors
///
/// Returns [`DomainError::Overflow`] when the result is not representable.
pub fn compute_pnl(
    direction: Direction,
    entry_price: Decimal,
    exit_price: Decimal,
    quantity: u32,
    commission: Decimal,
) -> Result<Pnl, DomainError> {
    let pnl = gross(direction, entry_price, exit_price, quantity)?
        .checked_sub(commission)
        .ok_or(DomainError::Overflow { field: "pnl" })?;
    Ok(Pnl {
        pnl,
        pnl_percent: percent_of_investment(pnl, entry_price, quantity)?,
    })
}

/// Compute unrealized P&L against `current_price`. Commission is not applied.
///
/// # Errors
///
/// Returns [`DomainError::Overflow`] when the result is not representable.
pub fn compute_live_pnl(
    direction: Direction,
    entry_price: Decimal,
    current_price: Decimal,
    quantity: u32,
) -> Result<LivePnl, DomainError> {
    let pnl = gross(direction, entry_price, current_price, quantity)?;
    let per_share = (quantity > 0).then(|| pnl / Decimal::from(quantity));
    Ok(LivePnl {
        pnl,
        pnl_percent: percent_of_investment(pnl, entry_price, quantity)?,
        per_share,
    })
}
