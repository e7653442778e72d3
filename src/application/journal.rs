//! Trade lifecycle service.
//!
//! Opens and closes trades against a [`TradeStore`]. Validation happens
//! before any storage call, so a rejected form never leaves a partial row.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{
    CloseTradeForm, LivePosition, OpenTradeForm, OwnerId, TradeId, TradeRecord,
};
use crate::error::{Error, Result};
use crate::port::{Clock, SystemClock, TradeQuery, TradeStore};

/// Default page size for [`TradeJournal::history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Open/close lifecycle over an injected store and clock.
pub struct TradeJournal {
    store: Arc<dyn TradeStore>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl TradeJournal {
    /// Create a journal using wall-clock time.
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TradeStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Override the number of records [`history`](Self::history) returns.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Store handle, for services that read the same table.
    #[must_use]
    pub fn store(&self) -> Arc<dyn TradeStore> {
        Arc::clone(&self.store)
    }

    /// Validate the form, assign a trade id and insert an OPEN record.
    ///
    /// The id is derived from the symbol and the current second, so two opens
    /// of the same symbol within one second fail with
    /// [`Error::DuplicateKey`]. The existing row is left untouched.
    pub fn open(&self, form: &OpenTradeForm) -> Result<TradeRecord> {
        let input = form.validate()?;
        let now = self.clock.now();
        let trade_id = TradeId::generate(&input.symbol, now);
        let record = TradeRecord::open(trade_id, input, now);

        self.store.insert(&record)?;

        info!(
            trade_id = %record.trade_id,
            owner = %record.owner_id,
            symbol = %record.symbol,
            direction = %record.direction,
            entry_price = %record.entry_price,
            quantity = record.quantity,
            "Trade opened"
        );
        Ok(record)
    }

    /// Validate the form and close the caller's OPEN trade.
    ///
    /// A trade owned by someone else is reported as [`Error::NotFound`].
    /// When two closes race, exactly one succeeds and the other gets
    /// [`Error::AlreadyClosed`].
    pub fn close(&self, form: &CloseTradeForm) -> Result<TradeRecord> {
        let input = form.validate()?;
        let record = self.get_owned(&form.trade_id, &form.owner_id)?;
        if !record.is_open() {
            return Err(Error::AlreadyClosed {
                trade_id: record.trade_id,
            });
        }

        let patch = record.settle(&input, self.clock.now())?;
        let closed = self
            .store
            .close_if_open(&record.trade_id, &form.owner_id, &patch)?;

        info!(
            trade_id = %closed.trade_id,
            owner = %closed.owner_id,
            exit_price = %patch.exit.exit_price,
            pnl = %patch.exit.pnl,
            pnl_percent = %patch.exit.pnl_percent.round_dp(2),
            "Trade closed"
        );
        Ok(closed)
    }

    /// Fetch a trade by id regardless of owner.
    pub fn get(&self, trade_id: &TradeId) -> Result<Option<TradeRecord>> {
        self.store.get(trade_id)
    }

    /// Fetch a trade that belongs to `owner_id`.
    pub fn get_owned(&self, trade_id: &TradeId, owner_id: &OwnerId) -> Result<TradeRecord> {
        match self.store.get(trade_id)? {
            Some(record) if &record.owner_id == owner_id => Ok(record),
            Some(_) => {
                debug!(trade_id = %trade_id, owner = %owner_id, "Trade belongs to another owner");
                Err(Error::NotFound {
                    trade_id: trade_id.clone(),
                })
            }
            None => Err(Error::NotFound {
                trade_id: trade_id.clone(),
            }),
        }
    }

    /// List an owner's trades, newest first.
    pub fn list_by_owner(&self, owner_id: &OwnerId, query: TradeQuery) -> Result<Vec<TradeRecord>> {
        self.store.list_by_owner(owner_id, query)
    }

    /// The owner's most recent trades, capped at the configured history limit.
    pub fn history(&self, owner_id: &OwnerId) -> Result<Vec<TradeRecord>> {
        self.store
            .list_by_owner(owner_id, TradeQuery::all().with_limit(self.history_limit))
    }

    /// Every OPEN trade the owner has, newest first.
    pub fn open_trades(&self, owner_id: &OwnerId) -> Result<Vec<TradeRecord>> {
        self.store.list_by_owner(owner_id, TradeQuery::open())
    }

    /// Mark the caller's OPEN trade against `current_price`.
    ///
    /// Nothing is written.
    pub fn mark_to_market(
        &self,
        trade_id: &TradeId,
        owner_id: &OwnerId,
        current_price: Decimal,
    ) -> Result<(TradeRecord, LivePosition)> {
        let record = self.get_owned(trade_id, owner_id)?;
        if !record.is_open() {
            return Err(Error::AlreadyClosed {
                trade_id: record.trade_id,
            });
        }
        let position = record.mark_to_market(current_price)?;
        Ok((record, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::InMemoryTradeStore;
    use crate::domain::{DomainError, TradeStatus};
    use crate::error::ErrorKind;
    use crate::testkit::domain::{close_form, open_form, FixedClock};
    use rust_decimal_macros::dec;

    fn journal() -> (TradeJournal, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at("2025-06-25T14:30:22Z"));
        let journal = TradeJournal::with_clock(
            Arc::new(InMemoryTradeStore::new()),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        (journal, clock)
    }

    #[test]
    fn open_assigns_symbol_timestamp_id() {
        let (journal, _) = journal();
        let record = journal.open(&open_form("42", "aapl", "LONG")).unwrap();

        assert_eq!(record.trade_id.as_str(), "AAPL_20250625_143022");
        assert_eq!(record.status(), TradeStatus::Open);
        assert_eq!(journal.get(&record.trade_id).unwrap(), Some(record));
    }

    #[test]
    fn invalid_open_writes_nothing() {
        let (journal, _) = journal();
        let mut form = open_form("42", "AAPL", "LONG");
        form.quantity = "0".into();

        let err = journal.open(&form).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(journal.history(&OwnerId::from("42")).unwrap().is_empty());
    }

    #[test]
    fn market_token_is_rejected_by_the_core() {
        let (journal, _) = journal();
        let mut form = open_form("42", "AAPL", "LONG");
        form.entry_price = "MARKET".into();

        let err = journal.open(&form).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(DomainError::UnresolvedMarketPrice { .. })
        ));
    }

    #[test]
    fn same_symbol_in_same_second_is_a_duplicate() {
        let (journal, _) = journal();
        let first = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();

        let err = journal.open(&open_form("7", "AAPL", "SHORT")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);

        let kept = journal.get(&first.trade_id).unwrap().unwrap();
        assert_eq!(kept.owner_id, OwnerId::from("42"));
    }

    #[test]
    fn close_computes_pnl_and_rejects_second_close() {
        let (journal, clock) = journal();
        let opened = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();
        clock.advance_secs(1800);

        let closed = journal
            .close(&close_form(&opened.trade_id, "42", "155.75").with_commission("2.50"))
            .unwrap();
        let exit = closed.exit.as_ref().unwrap();
        assert_eq!(exit.pnl, dec!(522.50));
        assert_eq!(exit.pnl_percent.round_dp(2), dec!(3.47));
        assert_eq!(exit.exit_timestamp, clock.now());

        let err = journal
            .close(&close_form(&opened.trade_id, "42", "160"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyClosed);
        assert_eq!(
            journal.get(&opened.trade_id).unwrap().unwrap().exit,
            closed.exit
        );
    }

    #[test]
    fn close_by_another_owner_is_not_found() {
        let (journal, _) = journal();
        let opened = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();

        let err = journal
            .close(&close_form(&opened.trade_id, "99", "155"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(journal.get(&opened.trade_id).unwrap().unwrap().is_open());
    }

    #[test]
    fn close_unknown_trade_is_not_found() {
        let (journal, _) = journal();
        let err = journal
            .close(&close_form(&TradeId::from("NOPE_20250101_000000"), "42", "1"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_close_leaves_trade_open() {
        let (journal, _) = journal();
        let opened = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();

        let err = journal
            .close(&close_form(&opened.trade_id, "42", "-1"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(journal.get(&opened.trade_id).unwrap().unwrap().is_open());
    }

    #[test]
    fn open_trades_and_history_are_scoped_to_owner() {
        let (journal, clock) = journal();
        let a = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();
        clock.advance_secs(1);
        let b = journal.open(&open_form("42", "TSLA", "PUT")).unwrap();
        clock.advance_secs(1);
        journal.open(&open_form("7", "SPY", "CALL")).unwrap();
        journal.close(&close_form(&a.trade_id, "42", "151")).unwrap();

        let owner = OwnerId::from("42");
        let open: Vec<_> = journal
            .open_trades(&owner)
            .unwrap()
            .into_iter()
            .map(|t| t.trade_id)
            .collect();
        assert_eq!(open, vec![b.trade_id.clone()]);

        let history: Vec<_> = journal
            .history(&owner)
            .unwrap()
            .into_iter()
            .map(|t| t.trade_id)
            .collect();
        assert_eq!(history, vec![b.trade_id, a.trade_id]);
    }

    #[test]
    fn history_respects_limit() {
        let (journal, clock) = journal();
        let journal = journal.with_history_limit(2);
        for _ in 0..3 {
            journal.open(&open_form("42", "SPY", "LONG")).unwrap();
            clock.advance_secs(1);
        }
        assert_eq!(journal.history(&OwnerId::from("42")).unwrap().len(), 2);
    }

    #[test]
    fn mark_to_market_requires_open_owned_trade() {
        let (journal, _) = journal();
        let opened = journal.open(&open_form("42", "AAPL", "SHORT")).unwrap();
        let owner = OwnerId::from("42");

        let (_, live) = journal
            .mark_to_market(&opened.trade_id, &owner, dec!(148.50))
            .unwrap();
        assert_eq!(live.pnl.pnl, dec!(200.00));

        let err = journal
            .mark_to_market(&opened.trade_id, &OwnerId::from("7"), dec!(148.50))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        journal.close(&close_form(&opened.trade_id, "42", "149")).unwrap();
        let err = journal
            .mark_to_market(&opened.trade_id, &owner, dec!(148.50))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyClosed);
    }

    #[test]
    fn extreme_prices_are_rejected_before_any_arithmetic() {
        let (journal, _) = journal();
        let mut tiny = open_form("42", "AAPL", "LONG");
        tiny.entry_price = "0.0000000000000000000000000001".into();
        tiny.quantity = "1".into();
        let err = journal.open(&tiny).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(DomainError::OutOfRange { field: "entry_price", .. })
        ));

        let mut huge = open_form("42", "AAPL", "SHORT");
        huge.entry_price = "79228162514264337593543950".into();
        huge.quantity = "100000".into();
        let err = journal.open(&huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let opened = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();
        let err = journal
            .close(&close_form(&opened.trade_id, "42", "10000000000000"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(DomainError::OutOfRange { field: "exit_price", .. })
        ));
        assert!(journal.get(&opened.trade_id).unwrap().unwrap().is_open());
    }

    #[test]
    fn extreme_bounds_still_settle() {
        let (journal, _) = journal();
        let mut form = open_form("42", "AAPL", "LONG");
        form.entry_price = "0.00000001".into();
        form.quantity = u32::MAX.to_string();
        let opened = journal.open(&form).unwrap();

        let closed = journal
            .close(
                &close_form(&opened.trade_id, "42", "1000000000000")
                    .with_commission("1000000000000"),
            )
            .unwrap();
        assert!(closed.pnl().unwrap() > Decimal::ZERO);
    }

    #[test]
    fn unrepresentable_live_price_is_a_validation_error() {
        let (journal, _) = journal();
        let opened = journal.open(&open_form("42", "AAPL", "LONG")).unwrap();

        let err = journal
            .mark_to_market(&opened.trade_id, &OwnerId::from("42"), Decimal::MAX)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(DomainError::Overflow { .. })));
    }
}
