//! In-memory trade store.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::{OwnerId, TradeClose, TradeId, TradeRecord, TradeStatus};
use crate::error::{Error, Result};
use crate::port::{TradeQuery, TradeStore};

/// [`TradeStore`] backed by a mutex-guarded map.
///
/// Insertion order stands in for the SQLite row id when two records share a
/// `created_at`.
#[derive(Default)]
pub struct InMemoryTradeStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    trades: HashMap<TradeId, (u64, TradeRecord)>,
    next_seq: u64,
}

impl InMemoryTradeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TradeStore for InMemoryTradeStore {
    fn insert(&self, record: &TradeRecord) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.trades.contains_key(&record.trade_id) {
            return Err(Error::DuplicateKey {
                trade_id: record.trade_id.clone(),
            });
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .trades
            .insert(record.trade_id.clone(), (seq, record.clone()));
        Ok(())
    }

    fn close_if_open(
        &self,
        trade_id: &TradeId,
        owner_id: &OwnerId,
        close: &TradeClose,
    ) -> Result<TradeRecord> {
        let mut inner = self.inner.lock();
        let record = match inner.trades.get_mut(trade_id) {
            Some((_, record)) if &record.owner_id == owner_id => record,
            _ => {
                return Err(Error::NotFound {
                    trade_id: trade_id.clone(),
                })
            }
        };
        if !record.is_open() {
            return Err(Error::AlreadyClosed {
                trade_id: trade_id.clone(),
            });
        }
        record.apply_close(close.clone());
        Ok(record.clone())
    }

    fn get(&self, trade_id: &TradeId) -> Result<Option<TradeRecord>> {
        Ok(self
            .inner
            .lock()
            .trades
            .get(trade_id)
            .map(|(_, record)| record.clone()))
    }

    fn list_by_owner(&self, owner_id: &OwnerId, query: TradeQuery) -> Result<Vec<TradeRecord>> {
        let inner = self.inner.lock();
        let mut rows: Vec<&(u64, TradeRecord)> = inner
            .trades
            .values()
            .filter(|(_, r)| &r.owner_id == owner_id)
            .filter(|(_, r)| match query.status {
                Some(TradeStatus::Open) => r.is_open(),
                Some(TradeStatus::Closed) => !r.is_open(),
                None => true,
            })
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }
}
