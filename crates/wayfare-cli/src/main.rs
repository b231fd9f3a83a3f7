//! Wayfare CLI Application
//!
//! Command-line interface and MCP server for the wayfare search engine.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use wayfare_core::{
    BrowserDriver, EngineConfig, ExecutionPlanBuilder, ScriptedDriver, WebDriverClient,
};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        webdriver_url,
        headed,
        dry_run,
        settle_ms,
        max_concurrent_runs,
        command,
    } = Args::parse();

    let driver: Arc<dyn BrowserDriver> = if dry_run {
        info!("Dry run: using the scripted browser driver");
        Arc::new(ScriptedDriver::new())
    } else {
        let client = WebDriverClient::new(webdriver_url)
            .context("Failed to create WebDriver client")?;
        Arc::new(client.with_headless(!headed))
    };

    let mut config = EngineConfig::default().with_max_concurrent_runs(max_concurrent_runs);
    if let Some(ms) = settle_ms {
        config = config.with_settle_delay(Duration::from_millis(ms));
    }

    let plan = ExecutionPlanBuilder::new()
        .with_database_path(database_file)
        .with_driver(driver)
        .with_config(config)
        .build()
        .await
        .context("Failed to initialize execution plan")?;

    info!("Wayfare started");

    let cli = Cli::new(plan, TerminalRenderer::new(!no_color));
    let result = match command {
        Some(Search(args)) => cli.search(args).await,
        Some(Status(args)) => cli.status(args.id).await,
        Some(Results(args)) => cli.results(args.id).await,
        Some(Runs(args)) => cli.runs(args.status).await,
        Some(Catalog) | None => cli.catalog(),
        Some(Serve) => {
            info!("Starting Wayfare MCP server");
            return cli.serve().await;
        }
    };
    cli.shutdown().await?;
    result
}
