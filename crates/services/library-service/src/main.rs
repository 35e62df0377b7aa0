//! Library Service - command-line entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_service_lib::{build_facade, config::LibraryConfig, ping, run_demo, run_migrations, MigrateAction};

/// Users and the books they own
#[derive(Parser, Debug)]
#[command(name = "library-service")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateCommand,
    },
    /// Check database connectivity
    Ping,
    /// Run every user-with-books workflow once on the configured backend
    Demo,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum MigrateCommand {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

impl From<MigrateCommand> for MigrateAction {
    fn from(cmd: MigrateCommand) -> Self {
        match cmd {
            MigrateCommand::Up => MigrateAction::Up,
            MigrateCommand::Down => MigrateAction::Down,
            MigrateCommand::Status => MigrateAction::Status,
            MigrateCommand::Fresh => MigrateAction::Fresh,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = LibraryConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Migrate { action } => run_migrations(&config, action.into()).await,
        Commands::Ping => ping(&config).await,
        Commands::Demo => demo(&config).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("{}: {}", e.code(), e.user_message());
        std::process::exit(1);
    }
}

async fn demo(config: &LibraryConfig) -> common::AppResult<()> {
    let facade = build_facade(config).await?;
    for response in run_demo(facade.as_ref()).await? {
        let json = serde_json::to_string(&response)
            .map_err(|e| common::AppError::internal(e.to_string()))?;
        println!("{}", json);
    }
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
