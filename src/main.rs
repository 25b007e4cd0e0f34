use clap::Parser;
use docbot::cli::handle_ask_command;
use docbot::cli::handle_chat_command;
use docbot::cli::handle_config_command;
use docbot::cli::handle_ingest_command;
use docbot::cli::handle_init_command;
use docbot::cli::handle_reset_command;
use docbot::cli::handle_serve_command;
use docbot::cli::Cli;
use docbot::cli::Commands;
use docbot::config::AppConfig;
use docbot::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?;
    if config.logging.backtrace && std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    // Initialize logging
    if cli.verbose {
        docbot::logging::init_logging_with_level("debug")?;
    } else {
        docbot::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    match cli.command_or_default() {
        Commands::Chat => handle_chat_command(&config).await?,
        Commands::Ask { question, sources } => {
            handle_ask_command(&config, &question.join(" "), *sources).await?;
        }
        Commands::Ingest {
            path,
            chunk_size,
            chunk_overlap,
        } => handle_ingest_command(&config, path.clone(), *chunk_size, *chunk_overlap).await?,
        Commands::Serve { host, port, cors } => {
            handle_serve_command(&config, host.clone(), *port, *cors).await?;
        }
        Commands::Init { force } => handle_init_command(&config, *force).await?,
        Commands::Reset { force, all } => handle_reset_command(&config, *force, *all).await?,
        Commands::Config => handle_config_command(&config).await?,
    }

    Ok(())
}
