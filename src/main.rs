use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use inlet::app::AppContext;
use inlet::cli::{commands, Cli, Commands};
use inlet::daemon::{Daemon, DaemonConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.db)?;

    match cli.command {
        Commands::Add {
            url,
            discover,
            name,
            category,
            kind,
        } => {
            commands::add_source(&ctx, &url, discover, name, category, kind).await?;
        }
        Commands::Enable { id } => {
            commands::set_enabled(&ctx, &id, true)?;
        }
        Commands::Disable { id } => {
            commands::set_enabled(&ctx, &id, false)?;
        }
        Commands::List {
            items,
            view,
            status,
            source,
            category,
            min_score,
            order,
            limit,
            offset,
        } => {
            if items {
                commands::list_items(
                    &ctx, view, status, source, category, min_score, order, limit, offset,
                )?;
            } else {
                commands::list_sources(&ctx)?;
            }
        }
        Commands::Refresh => {
            commands::refresh(&ctx).await?;
        }
        Commands::Sync => {
            commands::sync(&ctx).await?;
        }
        Commands::Read { url } => {
            commands::mark_read(&ctx, &url)?;
        }
        Commands::Triage { url, bucket } => {
            commands::triage(&ctx, &url, &bucket)?;
        }
        Commands::Clip { url } => {
            commands::clip(&ctx, &url)?;
        }
        Commands::Dismiss { url } => {
            commands::dismiss(&ctx, &url)?;
        }
        Commands::Idea { url, note } => {
            commands::idea(&ctx, &url, note)?;
        }
        Commands::Summarize { url } => {
            commands::summarize(&ctx, &url).await?;
        }
        Commands::Daemon {
            interval,
            no_initial_update,
        } => {
            let secs = DaemonConfig::parse_interval(&interval)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            let config = DaemonConfig {
                update_interval_secs: secs,
                update_on_start: !no_initial_update,
            };
            Daemon::new(Arc::new(ctx), config).run().await?;
        }
    }

    Ok(())
}
