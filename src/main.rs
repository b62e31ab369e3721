use anyhow::Context;
use clap::Parser;
use coverwise::cli::*;
use coverwise::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    // Initialize logging
    let level = cli.verbose.then_some("debug");
    coverwise::logging::init_logging_with_config(&config.logging, level)
        .context("failed to initialize logging")?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Recommend {
            age,
            state,
            coverage,
            plan_type,
            tolerance,
            top,
            json,
        } => {
            handle_recommend_command(
                &config,
                RecommendArgs {
                    age,
                    state,
                    coverage,
                    plan_type,
                    tolerance,
                    top,
                    json,
                },
            )
            .await
        }
        Commands::Ask { query } => handle_ask_command(&config, &query).await,
        Commands::Search { query, top_k, json } => {
            handle_search_command(&config, &query, top_k, json).await
        }
        Commands::Index { batch_size } => handle_index_command(&config, batch_size).await,
        Commands::Info => handle_info_command(&config).await,
        Commands::Config => handle_config_command(&config).await,
    }?;

    Ok(())
}
