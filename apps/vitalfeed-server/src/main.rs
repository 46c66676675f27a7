use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use runtime::{AppConfig, CliArgs};

mod adapters;
mod wiring;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// VitalFeed Server - veterinary practice administration backend
#[derive(Parser)]
#[command(name = "vitalfeed-server")]
#[command(about = "VitalFeed Server - veterinary practice administration backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("VitalFeed Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args).await,
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database dir {}", dir.display()))?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push_str("?mode=rwc");
    if let Some(q) = query {
        out.push('&');
        out.push_str(q);
    }
    Ok(out)
}

/// Resolve the effective database URL: `--mock` forces in-memory SQLite and
/// relative sqlite paths land under `server.home_dir`.
fn database_url(config: &AppConfig, args: &CliArgs) -> Result<String> {
    if args.mock {
        return Ok("sqlite::memory:".to_string());
    }
    let db = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database not configured"))?;

    let url = db.url.trim();
    if url.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    let scheme = url::Url::parse(url)
        .map(|u| u.scheme().to_string())
        .map_err(|e| anyhow!("Invalid database DSN '{url}': {e}"))?;
    match scheme.as_str() {
        "sqlite" | "sqlite3" => absolutize_sqlite_dsn(url, Path::new(&config.server.home_dir)),
        "postgres" | "postgresql" => Ok(url.to_string()),
        other => Err(anyhow!("Unsupported database type: {other}")),
    }
}

async fn connect(config: &AppConfig, args: &CliArgs) -> Result<Arc<DatabaseConnection>> {
    let url = database_url(config, args)?;
    tracing::info!("Connecting to database");

    let mut opts = ConnectOptions::new(url);
    let max_conns = config
        .database
        .as_ref()
        .and_then(|db| db.max_conns)
        .unwrap_or(10);
    opts.max_connections(max_conns)
        .connect_timeout(Duration::from_secs(10));

    let conn = Database::connect(opts)
        .await
        .context("Database connection failed")?;
    Ok(Arc::new(conn))
}

async fn migrate(conn: &DatabaseConnection) -> Result<()> {
    accounts::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("accounts migrations failed")?;
    subscriptions::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("subscriptions migrations failed")?;
    directory::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("directory migrations failed")?;
    catalog::infra::storage::migrations::Migrator::up(conn, None)
        .await
        .context("catalog migrations failed")?;
    Ok(())
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let conn = connect(&config, &args).await?;
    migrate(&conn).await?;

    let app = wiring::build(&config, conn).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("VitalFeed Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    println!("{}", config.to_yaml()?);
    let conn = connect(&config, &args).await?;
    conn.ping().await.context("Database ping failed")?;
    println!("Configuration OK, database reachable");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    } else {
        tracing::info!("Shutdown signal received");
    }
}
