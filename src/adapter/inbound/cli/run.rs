use tracing::warn;

use super::command::{Cli, Commands, ConfigCommand};
use super::context::{load_config, Context};
use super::output::OutputConfig;
use super::{config, market, output, stats, trade};
use crate::error::Result;

/// Run one parsed command line.
///
/// Loads configuration, initializes logging and hands off to the handler.
/// Errors are returned to the caller for reporting.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let (config, config_path) = load_config(cli.config.as_deref())?;
    config.init_logging();

    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Show => config::execute_show(&config, &config_path),
            ConfigCommand::Validate => config::execute_validate(&config, &config_path),
        };
    }

    let ctx = Context::build(config, cli.db.as_deref(), &cli.owner, cli.name.as_deref())?;
    let result = match cli.command {
        Commands::Open(args) => trade::execute_open(&ctx, args).await,
        Commands::Close(args) => trade::execute_close(&ctx, args).await,
        Commands::Show(args) => trade::execute_show(&ctx, &args.trade_id),
        Commands::List(args) => trade::execute_list(&ctx, &args),
        Commands::Stats => stats::execute_stats(&ctx),
        Commands::Summary => stats::execute_summary(&ctx),
        Commands::LivePnl(args) => trade::execute_live_pnl(&ctx, &args.trade_id).await,
        Commands::Price(args) => market::execute_price(&ctx, &args.symbols).await,
        Commands::Quote(args) => market::execute_quote(&ctx, &args.symbol).await,
        Commands::Config(_) => Ok(()),
    };

    if let Err(e) = &result {
        warn!(owner = %ctx.owner, kind = ?e.kind(), error = %e, "Command failed");
    }
    result
}
