//! evote daemon: entry point for running an evote node and its tooling.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use evote_crypto::{TokenClaims, TokenSigner};
use evote_node::{init_logging, Fixtures, NodeConfig, VotingNode};
use evote_store::{AuditStore, MetaStore, VoterStore};
use evote_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use evote_types::{Role, Timestamp};
use evote_utils::format_duration;

#[derive(Parser)]
#[command(name = "evote-daemon", about = "evote voting core daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "EVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "EVOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP server binds to.
    #[arg(long, env = "EVOTE_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// HTTP server port.
    #[arg(long, env = "EVOTE_RPC_PORT")]
    rpc_port: Option<u16>,

    /// HMAC secret for bearer tokens.
    #[arg(long, env = "EVOTE_TOKEN_SECRET", hide_env_values = true)]
    token_secret: Option<String>,

    /// Expose the Prometheus `/metrics` route.
    #[arg(long, env = "EVOTE_ENABLE_METRICS")]
    metrics: bool,

    /// Disable the admin live feed.
    #[arg(long, env = "EVOTE_DISABLE_ADMIN_FEED")]
    disable_admin_feed: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "EVOTE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "EVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Node control.
    #[command(name = "node")]
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },
    /// Load voters, parties, elections and candidates from a JSON file.
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    /// Mint a bearer token.
    IssueToken {
        /// Voter id for VOTER, account id otherwise.
        #[arg(long)]
        sub: u64,
        /// SUPER_ADMIN, STAFF or VOTER.
        #[arg(long, default_value = "VOTER")]
        role: Role,
        /// Comma-joined permission list of one assigned role; repeat per role.
        #[arg(long = "permissions")]
        permissions: Vec<String>,
        /// Lifetime in seconds (defaults to the configured token_ttl_secs).
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
    /// Verify the data directory and print a storage summary.
    Check,
}

#[derive(clap::Subcommand)]
enum NodeAction {
    /// Run the node.
    Run,
}

/// File (or defaults) first, then any flag or `EVOTE_*` variable that was set.
fn load_config(cli: &Cli) -> anyhow::Result<(NodeConfig, String)> {
    let (mut config, source) = match &cli.config {
        Some(path) => (
            NodeConfig::from_toml_file(path)?,
            format!("file {}", path.display()),
        ),
        None => (NodeConfig::default(), "defaults".to_string()),
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(addr) = &cli.listen_addr {
        config.listen_addr = addr.clone();
    }
    if let Some(port) = cli.rpc_port {
        config.rpc_port = port;
    }
    if let Some(secret) = &cli.token_secret {
        config.token_secret = Some(secret.clone());
    }
    if cli.metrics {
        config.enable_metrics = true;
    }
    if cli.disable_admin_feed {
        config.enable_admin_feed = false;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok((config, source))
}

fn open_store(config: &NodeConfig) -> anyhow::Result<LmdbEnvironment> {
    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening {}", config.data_dir.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = load_config(&cli)?;

    if let Command::IssueToken { .. } = cli.command {
        evote_utils::init_tracing("warn");
    } else {
        init_logging(config.log_format()?, &config.log_level)?;
        tracing::info!(source = %source, "configuration loaded");
    }

    match cli.command {
        Command::Node { action } => match action {
            NodeAction::Run => {
                tracing::info!(
                    data_dir = %config.data_dir.display(),
                    listen = %config.rpc_socket_addr()?,
                    metrics = config.enable_metrics,
                    admin_feed = config.enable_admin_feed,
                    "starting evote node"
                );
                let started = Instant::now();
                let mut node = VotingNode::open(config)?;
                node.run().await?;

                tracing::info!("shutdown signal received, stopping node");
                node.stop().await?;

                tracing::info!(
                    uptime = %format_duration(started.elapsed()),
                    "evote daemon exited cleanly"
                );
            }
        },
        Command::Import { file } => {
            let fixtures = Fixtures::from_file(&file)?;
            let store = open_store(&config)?;
            let summary = fixtures.apply(&store, Timestamp::now())?;
            store.put_meta("last_import", file.display().to_string().as_bytes())?;
            println!(
                "imported {} voters, {} parties, {} elections, {} candidates",
                summary.voters, summary.parties, summary.elections, summary.candidates
            );
        }
        Command::IssueToken {
            sub,
            role,
            permissions,
            ttl_secs,
        } => {
            let secret = config.require_token_secret()?;
            let ttl = ttl_secs.unwrap_or(config.token_ttl_secs);
            let claims = TokenClaims {
                sub,
                role,
                roles: permissions,
                exp: Timestamp::now().plus_secs(ttl).as_secs(),
            };
            let token = TokenSigner::new(secret).issue(&claims)?;
            eprintln!(
                "token for {role} {sub}, valid for {}",
                format_duration(Duration::from_secs(ttl))
            );
            println!("{token}");
        }
        Command::Check => {
            let store = open_store(&config)?;
            let report = check_integrity(store.env())?;
            println!("databases checked: {}", report.databases_checked);
            println!("total entries:     {}", report.total_entries);
            println!(
                "schema version:    {}",
                store
                    .schema_version()?
                    .map_or_else(|| "none".to_string(), |v| v.to_string())
            );
            println!("voters:            {}", store.voter_count()?);
            println!("audit entries:     {}", store.audit_count()?);
            if !report.is_healthy() {
                for error in &report.errors {
                    eprintln!("error: {error}");
                }
                anyhow::bail!("integrity check failed");
            }
            println!("ok");
        }
    }

    Ok(())
}
