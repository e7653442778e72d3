//! Handlers for the trade lifecycle commands.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{CloseArgs, ListArgs, OpenArgs};
use super::context::Context;
use super::output;
use crate::domain::{CloseTradeForm, OpenTradeForm, TradeId, TradeRecord, TradeStatus};
use crate::error::Result;
use crate::port::TradeQuery;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Serialize a record with its derived status.
fn trade_json(record: &TradeRecord) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    value["status"] = json!(record.status());
    value["entry_slippage"] = serde_json::to_value(record.entry_slippage())?;
    Ok(value)
}

fn print_trade(record: &TradeRecord) {
    output::section(&format!("Trade {}", record.trade_id));
    output::field("Symbol", &record.symbol);
    output::field("Direction", record.direction);
    output::field("Quantity", record.quantity);
    output::field("Entry", format!("${}", record.entry_price));
    if let Some(stop) = record.stop_loss {
        output::field("Stop loss", format!("${stop}"));
    }
    if let Some(target) = record.take_profit {
        output::field("Take profit", format!("${target}"));
    }
    if let Some(setup) = &record.setup_type {
        output::field("Setup", setup);
    }
    if let Some(risk) = record.risk_amount {
        output::field("Risk", format!("${risk}"));
    }
    output::field("Reason", &record.reason);
    output::field("Opened", record.entry_timestamp.format(TIME_FORMAT));
    output::field("Owner", &record.owner_name);

    match &record.exit {
        None => output::field("Status", output::highlight(TradeStatus::Open)),
        Some(exit) => {
            output::field("Status", output::muted(TradeStatus::Closed));
            output::field("Exit", format!("${}", exit.exit_price));
            output::field("Exit reason", &exit.exit_reason);
            output::field("Closed", exit.exit_timestamp.format(TIME_FORMAT));
            output::field("Commission", format!("${:.2}", record.commission));
            output::field(
                "P&L",
                format!(
                    "{} ({})",
                    output::money(exit.pnl),
                    output::percent(exit.pnl_percent)
                ),
            );
        }
    }

    if let Some(slippage) = record.entry_slippage() {
        output::note(&format!(
            "market was ${} at entry ({:+.2}, {:+.2}%)",
            slippage.market_price, slippage.diff, slippage.diff_percent
        ));
    }
}

/// Execute `open`.
pub async fn execute_open(ctx: &Context, args: OpenArgs) -> Result<()> {
    let mut form = OpenTradeForm::new(
        ctx.owner.clone(),
        ctx.owner_name.clone(),
        args.symbol,
        args.direction,
        args.price,
        args.quantity,
        args.reason,
    );
    form.stop_loss = args.stop;
    form.take_profit = args.target;
    form.setup_type = args.setup;
    form.risk_amount = args.risk;

    let form = ctx.prices.prepare_open(form).await?;
    let record = ctx.journal.open(&form)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "trade.open",
            "trade": trade_json(&record)?,
        }));
        return Ok(());
    }

    output::success(&format!("Opened {}", output::highlight(&record.trade_id)));
    print_trade(&record);
    Ok(())
}

/// Execute `close`.
pub async fn execute_close(ctx: &Context, args: CloseArgs) -> Result<()> {
    let trade_id = TradeId::from(args.trade_id);
    let existing = ctx.journal.get_owned(&trade_id, &ctx.owner)?;

    let mut form = CloseTradeForm::new(trade_id, ctx.owner.clone(), args.price, args.reason);
    form.commission = args.commission;
    let form = ctx.prices.prepare_close(&existing.symbol, form).await?;
    let record = ctx.journal.close(&form)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "trade.close",
            "trade": trade_json(&record)?,
        }));
        return Ok(());
    }

    output::success(&format!("Closed {}", output::highlight(&record.trade_id)));
    print_trade(&record);
    Ok(())
}

/// Execute `show`.
pub fn execute_show(ctx: &Context, trade_id: &str) -> Result<()> {
    let record = ctx
        .journal
        .get_owned(&TradeId::from(trade_id), &ctx.owner)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "trade.show",
            "trade": trade_json(&record)?,
        }));
        return Ok(());
    }

    print_trade(&record);
    Ok(())
}

#[derive(Tabled)]
struct TradeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Exit")]
    exit: String,
    #[tabled(rename = "P&L")]
    pnl: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&TradeRecord> for TradeRow {
    fn from(record: &TradeRecord) -> Self {
        let (exit, pnl) = match &record.exit {
            Some(exit) => (
                format!("{}", exit.exit_price),
                format!("{:.2}", exit.pnl),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            id: record.trade_id.to_string(),
            direction: record.direction.to_string(),
            quantity: record.quantity,
            entry: record.entry_price.to_string(),
            exit,
            pnl,
            status: record.status().to_string(),
        }
    }
}

/// Execute `list`.
pub fn execute_list(ctx: &Context, args: &ListArgs) -> Result<()> {
    let limit = ctx.config.journal.effective_limit(args.limit);
    let query = if args.open {
        TradeQuery::open()
    } else {
        TradeQuery::all().with_limit(limit)
    };
    let trades = ctx.journal.list_by_owner(&ctx.owner, query)?;

    if output::is_json() {
        let trades = trades
            .iter()
            .map(trade_json)
            .collect::<Result<Vec<_>>>()?;
        output::json_output(json!({
            "command": if args.open { "trade.list_open" } else { "trade.list" },
            "count": trades.len(),
            "trades": trades,
        }));
        return Ok(());
    }

    if trades.is_empty() {
        output::note(if args.open {
            "No open trades."
        } else {
            "No trades logged yet."
        });
        return Ok(());
    }

    let title = if args.open { "Open trades" } else { "Trades" };
    output::section(&format!("{title} ({})", trades.len()));
    let rows: Vec<TradeRow> = trades.iter().map(TradeRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

/// Execute `live-pnl`.
pub async fn execute_live_pnl(ctx: &Context, trade_id: &str) -> Result<()> {
    let trade_id = TradeId::from(trade_id);
    let (record, live) = ctx
        .prices
        .live_position(&ctx.journal, &trade_id, &ctx.owner)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "trade.live_pnl",
            "trade": trade_json(&record)?,
            "live": live,
        }));
        return Ok(());
    }

    output::section(&format!("Live P&L {}", record.trade_id));
    output::field("Symbol", &record.symbol);
    output::field("Direction", record.direction);
    output::field("Entry", format!("${}", record.entry_price));
    output::field("Current", format!("${}", live.current_price));
    let change = match live.price_change_percent {
        Some(pct) => format!("{:+.2} ({})", live.price_change, output::percent(pct)),
        None => format!("{:+.2}", live.price_change),
    };
    output::field("Change", change);
    output::field(
        "P&L",
        format!(
            "{} ({})",
            output::money(live.pnl.pnl),
            output::percent(live.pnl.pnl_percent)
        ),
    );
    if let Some(per_share) = live.pnl.per_share {
        output::field("Per share", output::money(per_share));
    }
    if let Some(distance) = live.stop_distance {
        output::field("To stop", format!("${distance:.2}"));
    }
    if let Some(distance) = live.target_distance {
        output::field("To target", format!("${distance:.2}"));
    }
    Ok(())
}
