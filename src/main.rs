use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crucible::config::{ServerConfig, ServerConfigOverrides};
use crucible::server::{create_router, AppState};
use crucible::store::SqlRegistry;

#[derive(Parser)]
#[command(name = "crucible")]
#[command(about = "A content-addressed artifact registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the registry server
    Serve {
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database and archive storage
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("crucible=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig::load_with_overrides(
                config.as_deref(),
                ServerConfigOverrides {
                    host,
                    port,
                    data_dir,
                },
            )?;

            fs::create_dir_all(&config.data_dir)?;
            fs::create_dir_all(config.archive_root())?;

            let conn = Connection::open(config.db_path())?;
            conn.pragma_update(None, "journal_mode", "WAL")?;

            let registry = SqlRegistry::new(conn, config.archive_root())
                .map_err(|e| anyhow::anyhow!("failed to initialize registry: {e}"))?;

            let state = Arc::new(AppState {
                registry: Arc::new(registry),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting registry server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
