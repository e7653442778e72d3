//! Performance reporting over a user's trades.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{AnalyticsSummary, JournalSummary, OwnerId};
use crate::error::Result;
use crate::port::{TradeQuery, TradeStore};

/// Read-only reporting service.
pub struct Analytics {
    store: Arc<dyn TradeStore>,
}

impl Analytics {
    pub const fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }

    /// Aggregate every CLOSED trade the owner has.
    ///
    /// Returns `Ok(None)` when there are no closed trades. Open trades
    /// contribute nothing.
    pub fn compute(&self, owner_id: &OwnerId) -> Result<Option<AnalyticsSummary>> {
        let closed = self.store.list_by_owner(owner_id, TradeQuery::closed())?;
        debug!(owner = %owner_id, closed = closed.len(), "Computing analytics");
        Ok(AnalyticsSummary::from_trades(&closed)?)
    }

    /// Open/closed counts and realized totals over the owner's most recent
    /// `limit` trades.
    pub fn journal_summary(&self, owner_id: &OwnerId, limit: usize) -> Result<JournalSummary> {
        let trades = self
            .store
            .list_by_owner(owner_id, TradeQuery::all().with_limit(limit))?;
        Ok(JournalSummary::from_trades(&trades)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::InMemoryTradeStore;
    use crate::application::TradeJournal;
    use crate::domain::ProfitFactor;
    use crate::port::Clock;
    use crate::testkit::domain::{close_form, open_form, FixedClock};
    use rust_decimal_macros::dec;

    fn setup() -> (TradeJournal, Analytics, Arc<FixedClock>) {
        let store: Arc<dyn TradeStore> = Arc::new(InMemoryTradeStore::new());
        let clock = Arc::new(FixedClock::at("2025-06-25T14:30:00Z"));
        let journal =
            TradeJournal::with_clock(Arc::clone(&store), Arc::clone(&clock) as Arc<dyn Clock>);
        (journal, Analytics::new(store), clock)
    }

    /// Open and close a LONG 150.50 x 100 trade at `exit`.
    fn round_trip(journal: &TradeJournal, clock: &FixedClock, owner: &str, exit: &str) {
        let opened = journal.open(&open_form(owner, "AAPL", "LONG")).unwrap();
        journal.close(&close_form(&opened.trade_id, owner, exit)).unwrap();
        clock.advance_secs(1);
    }

    #[test]
    fn no_closed_trades_yields_none() {
        let (journal, analytics, _) = setup();
        journal.open(&open_form("42", "AAPL", "LONG")).unwrap();

        assert!(analytics.compute(&OwnerId::from("42")).unwrap().is_none());
    }

    #[test]
    fn compute_ignores_open_trades_and_other_owners() {
        let (journal, analytics, clock) = setup();
        round_trip(&journal, &clock, "42", "151.50");
        round_trip(&journal, &clock, "42", "150.00");
        round_trip(&journal, &clock, "7", "100.00");
        journal.open(&open_form("42", "SPY", "CALL")).unwrap();

        let summary = analytics.compute(&OwnerId::from("42")).unwrap().unwrap();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.losing_trades, 1);
        assert_eq!(summary.win_rate, dec!(50));
        assert_eq!(summary.total_pnl, dec!(50.00));
        assert_eq!(summary.profit_factor, ProfitFactor::Ratio(dec!(2)));
    }

    #[test]
    fn journal_summary_counts_open_and_closed() {
        let (journal, analytics, clock) = setup();
        round_trip(&journal, &clock, "42", "151.50");
        journal.open(&open_form("42", "SPY", "CALL")).unwrap();

        let summary = analytics.journal_summary(&OwnerId::from("42"), 50).unwrap();
        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.open_trades, 1);
        assert_eq!(summary.closed_trades, 1);
        assert_eq!(summary.realized_pnl, Some(dec!(100.00)));
        assert_eq!(summary.win_rate, Some(dec!(100)));
    }
}
