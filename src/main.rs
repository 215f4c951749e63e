//! Ringfront - HTTP CRUD facade over a Cassandra/ScyllaDB cluster
//!
//! Serves a single user table over HTTP and reports the cluster
//! topology the driver has discovered.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ringfront::api::HttpServer;
use ringfront::config::RingfrontConfig;
use ringfront::error::Result;
use ringfront::store::{ensure_schema, ClusterConnection, UserRepository};

/// Ringfront - HTTP CRUD facade over a Cassandra/ScyllaDB cluster
#[derive(Parser)]
#[command(name = "ringfront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ringfront.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ringfront service
    Start,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "ringfront.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,

    /// Show service configuration
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Start => run_start(cli.config).await,
        Commands::Init { output } => run_init(output),
        Commands::Validate => run_validate(cli.config),
        Commands::Info => run_info(cli.config),
    }
}

/// Initialize logging
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the ringfront service
///
/// Startup is strictly ordered: configuration, cluster session, schema
/// bootstrap, statement preparation, and only then the HTTP listener.
/// Any failure before the listener binds aborts the process; the
/// session is dropped (and closed) on every exit path.
async fn run_start(config_path: PathBuf) -> Result<()> {
    tracing::info!("Starting ringfront...");

    let config = match RingfrontConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load configuration from {:?}: {}", config_path, e);
            tracing::error!("Please check that the config file exists and is valid TOML");
            return Err(e);
        }
    };
    tracing::info!(
        "Loaded configuration: keyspace={} table={}",
        config.store.keyspace,
        config.store.table
    );

    // Open the process-wide session
    tracing::info!("Connecting to cluster at {:?}...", config.store.contact_points);
    let cluster = match ClusterConnection::open(&config.store).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to reach any contact point: {}", e);
            tracing::error!("Please check that the cluster is running and reachable");
            return Err(e);
        }
    };

    // Bootstrap schema before accepting any traffic
    if let Err(e) = ensure_schema(cluster.session(), &config.store).await {
        tracing::error!("Schema bootstrap failed: {}", e);
        return Err(e);
    }

    // Prepare the repository statements against the bootstrapped schema
    let repo = UserRepository::prepare(&cluster, &config.store).await?;
    tracing::info!("Repository statements prepared");

    let http_server = HttpServer::new(config.api.clone(), repo, cluster);

    tokio::select! {
        result = http_server.start() => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
    }

    tracing::info!("Ringfront shutdown complete");
    Ok(())
}

/// Initialize configuration file
fn run_init(output: PathBuf) -> Result<()> {
    let config_content = r#"# Ringfront Configuration
# Generated configuration file

[store]
contact_points = ["127.0.0.1:9042"]
keyspace = "user_directory"
table = "users"
replication_factor = 1
connect_timeout_secs = 10

[api]
enabled = true
bind_address = "0.0.0.0:5000"
cors_enabled = true

[logging]
level = "info"
format = "pretty"
"#;

    std::fs::write(&output, config_content)?;
    println!("Configuration file created: {}", output.display());
    println!("\nEdit the file to point at your cluster's contact points.");
    println!("Then start with: ringfront start --config {}", output.display());

    Ok(())
}

/// Validate configuration
fn run_validate(config_path: PathBuf) -> Result<()> {
    match RingfrontConfig::from_file(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  Contact Points: {:?}", config.store.contact_points);
            println!("  Keyspace:       {}", config.store.keyspace);
            println!("  Table:          {}", config.store.table);
            println!("  API Address:    {}", config.api.bind_address);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            Err(e)
        }
    }
}

/// Show service configuration
fn run_info(config_path: PathBuf) -> Result<()> {
    let config = RingfrontConfig::from_file(&config_path)?;

    println!("Ringfront Service Information");
    println!("=============================");
    println!();
    println!("Store Configuration:");
    println!("  Contact Points:  {:?}", config.store.contact_points);
    println!("  Keyspace:        {}", config.store.keyspace);
    println!("  Table:           {}", config.store.table);
    println!("  Replication:     {}", config.store.replication_factor);
    println!("  Connect Timeout: {} s", config.store.connect_timeout_secs);
    println!();
    println!("API Configuration:");
    println!("  Enabled:         {}", config.api.enabled);
    println!("  Bind Address:    {}", config.api.bind_address);
    println!("  CORS:            {}", config.api.cors_enabled);

    Ok(())
}
