//! Handlers for `stats` and `summary`.

use serde_json::json;

use super::context::Context;
use super::output;
use crate::domain::analytics::{ProfitFactorTier, RiskReward, WinRateTier};
use crate::domain::{AnalyticsSummary, Assessment};
use crate::error::Result;

fn assessment_lines(assessment: &Assessment) -> [&'static str; 3] {
    [
        match assessment.win_rate {
            WinRateTier::Excellent => "Excellent win rate",
            WinRateTier::Good => "Good win rate",
            WinRateTier::NeedsSelection => "Win rate below 50%: review trade selection",
        },
        match assessment.profit_factor {
            ProfitFactorTier::Strong => "Strong profit factor",
            ProfitFactorTier::Profitable => "Profitable system",
            ProfitFactorTier::ReviewRisk => "Profit factor at or below 1: review risk management",
        },
        match assessment.risk_reward {
            RiskReward::TightenStops => "Average loss exceeds average win: consider tighter stops",
            RiskReward::Favorable => "Risk/reward is favorable",
        },
    ]
}

fn print_summary(summary: &AnalyticsSummary) {
    output::section("Performance");
    output::field("Trades", summary.total_trades);
    output::field(
        "Won / lost",
        format!("{} / {}", summary.winning_trades, summary.losing_trades),
    );
    output::field("Win rate", format!("{:.1}%", summary.win_rate));
    output::field("Total P&L", output::money(summary.total_pnl));
    output::field("Avg win", output::money(summary.avg_win));
    output::field("Avg loss", output::money(summary.avg_loss));
    output::field("Profit factor", summary.profit_factor);
    output::field("Best trade", output::money(summary.best_trade));
    output::field("Worst trade", output::money(summary.worst_trade));

    output::section("Assessment");
    for line in assessment_lines(&summary.assess()) {
        output::note(line);
    }
}

/// Execute `stats`.
pub fn execute_stats(ctx: &Context) -> Result<()> {
    let summary = ctx.analytics.compute(&ctx.owner)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "stats",
            "summary": summary,
            "assessment": summary.as_ref().map(AnalyticsSummary::assess),
        }));
        return Ok(());
    }

    match summary {
        Some(summary) => print_summary(&summary),
        None => {
            output::note("No closed trades yet.");
            output::hint("close a trade with `tradelog close <trade_id> <price> -r <reason>`");
        }
    }
    Ok(())
}

/// Execute `summary`.
pub fn execute_summary(ctx: &Context) -> Result<()> {
    let summary = ctx
        .analytics
        .journal_summary(&ctx.owner, ctx.config.journal.history_limit)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "summary",
            "summary": summary,
        }));
        return Ok(());
    }

    output::section("Journal");
    output::field("Trades", summary.total_trades);
    output::field("Open", summary.open_trades);
    output::field("Closed", summary.closed_trades);
    if let Some(pnl) = summary.realized_pnl {
        output::field("Realized P&L", output::money(pnl));
    }
    if let Some(rate) = summary.win_rate {
        output::field("Win rate", format!("{rate:.1}%"));
    }
    Ok(())
}
