//! Persistence port for trade records.

use crate::domain::{OwnerId, TradeClose, TradeId, TradeRecord, TradeStatus};
use crate::error::Result;

/// Filter for listing a user's trades. Results are always newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeQuery {
    /// Only trades in this status; `None` for all.
    pub status: Option<TradeStatus>,
    /// Maximum number of records; `None` for no limit.
    pub limit: Option<usize>,
}

impl TradeQuery {
    /// Every trade the owner has, newest first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: None,
            limit: None,
        }
    }

    /// The owner's OPEN trades, newest first.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            status: Some(TradeStatus::Open),
            limit: None,
        }
    }

    /// The owner's CLOSED trades, newest first.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            status: Some(TradeStatus::Closed),
            limit: None,
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Durable table of trade records keyed by trade id.
///
/// Implementations provide two guarantees the lifecycle relies on: a
/// uniqueness constraint on the trade id, and single-row atomicity for
/// [`close_if_open`](Self::close_if_open).
pub trait TradeStore: Send + Sync {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`](crate::error::Error::DuplicateKey) if the trade
    /// id is taken; existing rows are never overwritten.
    fn insert(&self, record: &TradeRecord) -> Result<()>;

    /// Atomically apply `close` to the trade keyed by `(trade_id, owner_id)`
    /// if it is still OPEN, returning the updated record.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`](crate::error::Error::NotFound) when no row matches
    /// the id and owner together, [`Error::AlreadyClosed`](crate::error::Error::AlreadyClosed)
    /// when the row exists but is no longer OPEN.
    fn close_if_open(
        &self,
        trade_id: &TradeId,
        owner_id: &OwnerId,
        close: &TradeClose,
    ) -> Result<TradeRecord>;

    /// Fetch a record by id regardless of owner.
    fn get(&self, trade_id: &TradeId) -> Result<Option<TradeRecord>>;

    /// List an owner's trades, newest first by creation time.
    fn list_by_owner(&self, owner_id: &OwnerId, query: TradeQuery) -> Result<Vec<TradeRecord>>;
}
