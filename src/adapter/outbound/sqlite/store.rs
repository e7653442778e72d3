//! SQLite trade store implementation.
//!
//! Provides persistent storage for trade records using SQLite and Diesel ORM.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::{open_database, DbPool};
use crate::adapter::outbound::sqlite::database::model::{CloseTradeRow, NewTradeRow, TradeRow};
use crate::adapter::outbound::sqlite::database::schema::trades;
use crate::domain::{
    Direction, OwnerId, Symbol, TradeClose, TradeExit, TradeId, TradeRecord, TradeStatus,
};
use crate::error::{Error, Result};
use crate::port::{TradeQuery, TradeStore};

/// SQLite-backed trade store.
///
/// The `trade_id` column carries a UNIQUE constraint and closes run as a
/// single conditional UPDATE, which gives the two guarantees
/// [`TradeStore`] asks for.
pub struct SqliteTradeStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteTradeStore {
    /// Create a store over a pool whose migrations have already run.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and migrate it.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(database_url: &str) -> Result<Self> {
        Ok(Self::new(open_database(database_url)?))
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Persistence(e.to_string()))
    }

    fn to_row(record: &TradeRecord) -> NewTradeRow {
        NewTradeRow {
            trade_id: record.trade_id.to_string(),
            owner_id: record.owner_id.to_string(),
            owner_name: record.owner_name.clone(),
            symbol: record.symbol.to_string(),
            direction: record.direction.as_str().to_string(),
            entry_price: record.entry_price.to_string(),
            quantity: i64::from(record.quantity),
            entry_timestamp: timestamp_text(record.entry_timestamp),
            stop_loss: record.stop_loss.map(|d| d.to_string()),
            take_profit: record.take_profit.map(|d| d.to_string()),
            reason: record.reason.clone(),
            setup_type: record.setup_type.clone(),
            risk_amount: record.risk_amount.map(|d| d.to_string()),
            commission: record.commission.to_string(),
            market_price_at_entry: record.market_price_at_entry.map(|d| d.to_string()),
            status: record.status().as_str().to_string(),
            created_at: timestamp_text(record.created_at),
        }
    }

    fn to_close_row(close: &TradeClose) -> CloseTradeRow {
        let exit = &close.exit;
        CloseTradeRow {
            status: TradeStatus::Closed.as_str().to_string(),
            commission: close.commission.to_string(),
            exit_price: Some(exit.exit_price.to_string()),
            exit_timestamp: Some(timestamp_text(exit.exit_timestamp)),
            exit_reason: Some(exit.exit_reason.clone()),
            pnl: Some(exit.pnl.to_string()),
            pnl_percent: Some(exit.pnl_percent.to_string()),
            market_price_at_exit: exit.market_price_at_exit.map(|d| d.to_string()),
        }
    }

    fn from_row(row: TradeRow) -> Result<TradeRecord> {
        let status = TradeStatus::from_str(&row.status)
            .map_err(|e| corrupt(&row.trade_id, "status", e))?;
        let exit = match (
            status,
            row.exit_price,
            row.exit_timestamp,
            row.exit_reason,
            row.pnl,
            row.pnl_percent,
        ) {
            (TradeStatus::Open, None, None, None, None, None) => None,
            (
                TradeStatus::Closed,
                Some(exit_price),
                Some(exit_timestamp),
                Some(exit_reason),
                Some(pnl),
                Some(pnl_percent),
            ) => Some(TradeExit {
                exit_price: decimal(&row.trade_id, "exit_price", &exit_price)?,
                exit_timestamp: timestamp(&row.trade_id, "exit_timestamp", &exit_timestamp)?,
                exit_reason,
                pnl: decimal(&row.trade_id, "pnl", &pnl)?,
                pnl_percent: decimal(&row.trade_id, "pnl_percent", &pnl_percent)?,
                market_price_at_exit: optional_decimal(
                    &row.trade_id,
                    "market_price_at_exit",
                    row.market_price_at_exit.as_deref(),
                )?,
            }),
            (status, ..) => {
                return Err(corrupt(
                    &row.trade_id,
                    "exit columns",
                    format!("inconsistent with status {status}"),
                ))
            }
        };

        let tid = row.trade_id.as_str();
        Ok(TradeRecord {
            owner_id: OwnerId::from(row.owner_id),
            owner_name: row.owner_name,
            symbol: Symbol::parse(&row.symbol).map_err(|e| corrupt(tid, "symbol", e))?,
            direction: Direction::from_str(&row.direction)
                .map_err(|e| corrupt(tid, "direction", e))?,
            entry_price: decimal(tid, "entry_price", &row.entry_price)?,
            quantity: u32::try_from(row.quantity).map_err(|e| corrupt(tid, "quantity", e))?,
            entry_timestamp: timestamp(tid, "entry_timestamp", &row.entry_timestamp)?,
            stop_loss: optional_decimal(tid, "stop_loss", row.stop_loss.as_deref())?,
            take_profit: optional_decimal(tid, "take_profit", row.take_profit.as_deref())?,
            reason: row.reason,
            setup_type: row.setup_type,
            risk_amount: optional_decimal(tid, "risk_amount", row.risk_amount.as_deref())?,
            commission: decimal(tid, "commission", &row.commission)?,
            market_price_at_entry: optional_decimal(
                tid,
                "market_price_at_entry",
                row.market_price_at_entry.as_deref(),
            )?,
            exit,
            created_at: timestamp(tid, "created_at", &row.created_at)?,
            trade_id: TradeId::from(row.trade_id),
        })
    }
}

/// Fixed-width UTC text, so lexical order matches chronological order.
fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn corrupt(trade_id: &str, column: &str, detail: impl std::fmt::Display) -> Error {
    warn!(trade_id, column, %detail, "Unreadable trade row");
    Error::Persistence(format!("trade {trade_id}: bad {column}: {detail}"))
}

fn decimal(trade_id: &str, column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| corrupt(trade_id, column, e))
}

fn optional_decimal(trade_id: &str, column: &str, raw: Option<&str>) -> Result<Option<Decimal>> {
    raw.map(|r| decimal(trade_id, column, r)).transpose()
}

fn timestamp(trade_id: &str, column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(trade_id, column, e))
}

impl TradeStore for SqliteTradeStore {
    fn insert(&self, record: &TradeRecord) -> Result<()> {
        let row = Self::to_row(record);
        let mut conn = self.conn()?;

        match diesel::insert_into(trades::table)
            .values(&row)
            .execute(&mut conn)
        {
            Ok(_) => {
                debug!(trade_id = %record.trade_id, "Trade row inserted");
                Ok(())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::DuplicateKey {
                    trade_id: record.trade_id.clone(),
                })
            }
            Err(e) => Err(Error::Persistence(e.to_string())),
        }
    }

    fn close_if_open(
        &self,
        trade_id: &TradeId,
        owner_id: &OwnerId,
        close: &TradeClose,
    ) -> Result<TradeRecord> {
        let patch = Self::to_close_row(close);
        let mut conn = self.conn()?;

        let (updated, row) = conn
            .immediate_transaction::<_, DieselError, _>(|conn| {
                let updated = diesel::update(
                    trades::table
                        .filter(trades::trade_id.eq(trade_id.as_str()))
                        .filter(trades::owner_id.eq(owner_id.as_str()))
                        .filter(trades::status.eq(TradeStatus::Open.as_str())),
                )
                .set(&patch)
                .execute(conn)?;

                let row = trades::table
                    .filter(trades::trade_id.eq(trade_id.as_str()))
                    .select(TradeRow::as_select())
                    .first(conn)
                    .optional()?;
                Ok((updated, row))
            })
            .map_err(|e| Error::Persistence(e.to_string()))?;

        match row {
            Some(row) if updated == 1 => Self::from_row(row),
            Some(row) if row.owner_id == owner_id.as_str() => Err(Error::AlreadyClosed {
                trade_id: trade_id.clone(),
            }),
            _ => Err(Error::NotFound {
                trade_id: trade_id.clone(),
            }),
        }
    }

    fn get(&self, trade_id: &TradeId) -> Result<Option<TradeRecord>> {
        let mut conn = self.conn()?;

        let row: Option<TradeRow> = trades::table
            .filter(trades::trade_id.eq(trade_id.as_str()))
            .select(TradeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Persistence(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    fn list_by_owner(&self, owner_id: &OwnerId, query: TradeQuery) -> Result<Vec<TradeRecord>> {
        let mut conn = self.conn()?;

        let mut select = trades::table
            .filter(trades::owner_id.eq(owner_id.as_str()))
            .select(TradeRow::as_select())
            .order((trades::created_at.desc(), trades::id.desc()))
            .into_boxed();
        if let Some(status) = query.status {
            select = select.filter(trades::status.eq(status.as_str()));
        }
        if let Some(limit) = query.limit {
            select = select.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<TradeRow> = select
            .load(&mut conn)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{close_patch, open_record, open_record_at, FIXED_NOW};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn store() -> SqliteTradeStore {
        SqliteTradeStore::open(":memory:").unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(FIXED_NOW)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn insert_then_get_round_trips_every_field() {
        let store = store();
        let mut record = open_record("42", "AAPL");
        record.stop_loss = Some(dec!(145.25));
        record.take_profit = None;
        record.setup_type = Some("Breakout".into());
        record.risk_amount = Some(dec!(525.00));
        record.market_price_at_entry = Some(dec!(150.4999));

        store.insert(&record).unwrap();

        assert_eq!(store.get(&record.trade_id).unwrap(), Some(record));
    }

    #[test]
    fn get_unknown_is_none() {
        assert!(store().get(&TradeId::from("NOPE_1")).unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_keeps_original_row() {
        let store = store();
        let original = open_record("42", "AAPL");
        store.insert(&original).unwrap();

        let mut clash = original.clone();
        clash.owner_id = OwnerId::from("7");
        clash.entry_price = dec!(1);
        let err = store.insert(&clash).unwrap_err();

        assert!(matches!(err, Error::DuplicateKey { .. }));
        assert_eq!(store.get(&original.trade_id).unwrap(), Some(original));
    }

    #[test]
    fn close_if_open_writes_exit_block() {
        let store = store();
        let record = open_record("42", "AAPL");
        store.insert(&record).unwrap();
        let mut patch = close_patch(&record, "155.75");
        patch.commission = dec!(2.50);
        patch.exit.market_price_at_exit = Some(dec!(155.80));

        let closed = store
            .close_if_open(&record.trade_id, &record.owner_id, &patch)
            .unwrap();

        assert_eq!(closed.status(), TradeStatus::Closed);
        assert_eq!(closed.exit.as_ref(), Some(&patch.exit));
        assert_eq!(closed.commission, dec!(2.50));
        assert_eq!(store.get(&record.trade_id).unwrap(), Some(closed));
    }

    #[test]
    fn close_if_open_reports_not_found_and_already_closed() {
        let store = store();
        let record = open_record("42", "AAPL");
        store.insert(&record).unwrap();
        let patch = close_patch(&record, "150");

        let missing = store.close_if_open(&TradeId::from("X_1"), &record.owner_id, &patch);
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        let foreign = store.close_if_open(&record.trade_id, &OwnerId::from("7"), &patch);
        assert!(matches!(foreign, Err(Error::NotFound { .. })));

        store
            .close_if_open(&record.trade_id, &record.owner_id, &patch)
            .unwrap();
        let again = store.close_if_open(&record.trade_id, &record.owner_id, &patch);
        assert!(matches!(again, Err(Error::AlreadyClosed { .. })));
    }

    #[test]
    fn concurrent_closes_have_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("race.db").to_string_lossy().to_string();
        let store = std::sync::Arc::new(SqliteTradeStore::open(&url).unwrap());
        let record = open_record("42", "AAPL");
        store.insert(&record).unwrap();

        let handles: Vec<_> = ["151", "152", "153", "154"]
            .into_iter()
            .map(|exit| {
                let store = std::sync::Arc::clone(&store);
                let record = record.clone();
                std::thread::spawn(move || {
                    let patch = close_patch(&record, exit);
                    store.close_if_open(&record.trade_id, &record.owner_id, &patch)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, Error::AlreadyClosed { .. })));
    }

    #[test]
    fn list_by_owner_filters_orders_and_limits() {
        let store = store();
        let base = fixed_now();
        let a = open_record_at("42", "AAPL", "LONG", base);
        let b = open_record_at("42", "TSLA", "PUT", base + Duration::seconds(10));
        let c = open_record_at("42", "SPY", "CALL", base + Duration::seconds(10));
        let other = open_record_at("7", "QQQ", "SHORT", base + Duration::seconds(20));
        for r in [&a, &b, &c, &other] {
            store.insert(r).unwrap();
        }
        store
            .close_if_open(&a.trade_id, &a.owner_id, &close_patch(&a, "151"))
            .unwrap();

        let owner = OwnerId::from("42");
        let symbols = |query| -> Vec<String> {
            store
                .list_by_owner(&owner, query)
                .unwrap()
                .into_iter()
                .map(|r| r.symbol.to_string())
                .collect()
        };

        assert_eq!(symbols(TradeQuery::all()), vec!["SPY", "TSLA", "AAPL"]);
        assert_eq!(symbols(TradeQuery::open()), vec!["SPY", "TSLA"]);
        assert_eq!(symbols(TradeQuery::closed()), vec!["AAPL"]);
        assert_eq!(symbols(TradeQuery::all().with_limit(1)), vec!["SPY"]);
    }

    #[test]
    fn inconsistent_row_is_a_persistence_error() {
        let store = store();
        let record = open_record("42", "AAPL");
        store.insert(&record).unwrap();

        let mut conn = store.conn().unwrap();
        diesel::update(trades::table)
            .set(trades::status.eq("CLOSED"))
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        let err = store.get(&record.trade_id).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
