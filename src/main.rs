use std::time::Duration;

use anyhow::Result;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use loglens::config::Config;
use loglens::cw;
use loglens::picker::{FzfPicker, MultiSelect};
use loglens::store;
use loglens::sync;

#[derive(Parser)]
#[command(name = "loglens", version, about = "CloudWatch Logs helper")]
struct Cli {
    /// Zoom in on json keys, e.g. --zoom level,tenant,message
    #[arg(long, global = true)]
    zoom: Option<String>,

    /// AWS profile to use
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Verbose output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all log groups into the groups file
    Ls,
    /// Pick groups from the groups file and add them to the subscriptions
    Sub,
    /// Pick subscribed groups and sync their streams to disk
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = Config::new(cli.profile, cli.zoom);

    match cli.command {
        Commands::Ls => {
            let client = create_cw_client(cfg.profile.as_deref()).await;
            let groups = cw::list_log_groups(&client).await?;
            store::write_lines(&cfg.groups_path, &groups)?;
            info!(
                "written {} groups to {}",
                groups.len(),
                cfg.groups_path.display()
            );
        }
        Commands::Sub => {
            let groups = store::read_lines(&cfg.groups_path)?;
            let selected = FzfPicker.pick(&groups)?;
            let merged = store::add_subscriptions(&cfg.subs_path, &selected)?;
            info!(
                "{} subscriptions in {}",
                merged.len(),
                cfg.subs_path.display()
            );
        }
        Commands::Sync => {
            let subs = store::read_lines(&cfg.subs_path)?;
            let selected = FzfPicker.pick(&subs)?;
            let client = create_cw_client(cfg.profile.as_deref()).await;
            sync::sync_all(&client, &cfg, &selected).await;
        }
    }

    Ok(())
}

async fn create_cw_client(profile: Option<&str>) -> aws_sdk_cloudwatchlogs::Client {
    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(10))
        .operation_timeout(Duration::from_secs(30))
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(timeout_config);
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    let aws_cfg = loader.load().await;
    aws_sdk_cloudwatchlogs::Client::new(&aws_cfg)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
