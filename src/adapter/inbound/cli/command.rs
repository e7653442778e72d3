//! Command-line interface definitions.
//!
//! Defines the CLI structure for the tradelog application using `clap`.
//! Every trade command acts on behalf of one journal owner, selected with
//! `--owner`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Trade journal with P&L tracking and performance analytics
#[derive(Parser, Debug)]
#[command(name = "tradelog")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file [default: ~/.tradelog/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Journal owner id
    #[arg(long, global = true, default_value = "local")]
    pub owner: String,

    /// Display name recorded on new trades (defaults to the owner id)
    #[arg(long, global = true)]
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the tradelog CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a new OPEN trade
    Open(OpenArgs),

    /// Close one of your OPEN trades
    Close(CloseArgs),

    /// Show a single trade
    Show(TradeIdArg),

    /// List your trades, newest first
    List(ListArgs),

    /// Performance analytics over your closed trades
    Stats,

    /// Overview of your recent journal
    Summary,

    /// Unrealized P&L of an OPEN trade at the live price
    LivePnl(TradeIdArg),

    /// Current price for one or more symbols
    Price(PriceArgs),

    /// Best bid and offer for a symbol
    Quote(QuoteArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `tradelog config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file for correctness.
    Validate,
}

/// Arguments for the `open` subcommand.
///
/// Prices and quantities are taken as text and validated by the journal, so
/// `MARKET` is accepted wherever a price is expected.
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,
    /// LONG, SHORT, CALL or PUT
    pub direction: String,
    /// Entry price, or MARKET for the live price
    pub price: String,
    /// Shares or contracts
    pub quantity: String,
    /// Why the trade was taken
    #[arg(short, long)]
    pub reason: String,
    /// Stop-loss price
    #[arg(long)]
    pub stop: Option<String>,
    /// Take-profit price
    #[arg(long)]
    pub target: Option<String>,
    /// Setup label, e.g. "Breakout"
    #[arg(long)]
    pub setup: Option<String>,
    /// Amount at risk
    #[arg(long)]
    pub risk: Option<String>,
}

/// Arguments for the `close` subcommand.
#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Trade id, e.g. AAPL_20250625_143022
    pub trade_id: String,
    /// Exit price, or MARKET for the live price
    pub price: String,
    /// Why the trade was closed
    #[arg(short, long)]
    pub reason: String,
    /// Commission charged (defaults to 0)
    #[arg(long)]
    pub commission: Option<String>,
}

/// Shared argument struct for commands that take a single trade id.
#[derive(Args, Debug)]
pub struct TradeIdArg {
    /// Trade id, e.g. AAPL_20250625_143022
    pub trade_id: String,
}

/// Arguments for the `list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only OPEN trades
    #[arg(long)]
    pub open: bool,
    /// Maximum number of trades (defaults to the configured history limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the `price` subcommand.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Ticker symbols
    #[arg(required = true)]
    pub symbols: Vec<String>,
}

/// Arguments for the `quote` subcommand.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Ticker symbol
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_open_with_options() {
        let cli = Cli::try_parse_from([
            "tradelog", "--owner", "42", "open", "AAPL", "long", "150.50", "100", "-r",
            "Breakout", "--stop", "145",
        ])
        .unwrap();

        assert_eq!(cli.owner, "42");
        match cli.command {
            Commands::Open(args) => {
                assert_eq!(args.symbol, "AAPL");
                assert_eq!(args.direction, "long");
                assert_eq!(args.stop.as_deref(), Some("145"));
                assert!(args.target.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["tradelog", "list", "--open", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::List(ListArgs { open: true, .. })));
    }

    #[test]
    fn price_requires_a_symbol() {
        assert!(Cli::try_parse_from(["tradelog", "price"]).is_err());
    }
}
