pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod mapper;
pub mod models;
pub mod services;
pub mod store;
pub mod taxonomy;

use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    let config = Config::load()?;
    config.validate()?;
    init_logging(&config);

    match command {
        Commands::Season { year, season } => cli::cmd_season(&config, year, season).await,
        Commands::Current => cli::cmd_current(&config).await,
        Commands::History { from } => cli::cmd_history(&config, from).await,
        Commands::Manifest => cli::cmd_manifest(&config).await,
        Commands::Init => Ok(()),
    }
}
