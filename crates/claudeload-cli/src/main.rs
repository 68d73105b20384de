//! claudeload - host executable with startup plugins
//!
//! Every launch loads the plugins next to the executable before running the
//! requested command.

mod fetch_command;
mod plugin_commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use claudeload_core::{load_plugins, paths, ExtensionRegistry, FetchSlot, HostEnv};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "claudeload",
    version,
    about = "Loads startup plugins and routes requests through a hookable fetch"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "error")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request through the process-wide fetch and print the body.
    Fetch(fetch_command::FetchArgs),
    /// Plugin management.
    Plugin {
        #[command(subcommand)]
        action: plugin_commands::PluginAction,
    },
    /// Print version.
    Version,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "claudeload starting");

    let exe_dir = paths::exe_dir();
    let env = match &exe_dir {
        Ok(dir) => {
            let env = HostEnv::new(dir, FetchSlot::global().clone());
            load_plugins(&paths::plugin_dir(dir), &ExtensionRegistry::builtin(), &env);
            Some(env)
        }
        Err(e) => {
            warn!("Not loading plugins: {:#}", e);
            None
        }
    };

    let result = match cli.command {
        Commands::Fetch(args) => fetch_command::run(FetchSlot::global(), args).await,
        Commands::Plugin { action } => {
            let dir = paths::plugin_dir(exe_dir.as_ref().map_err(|e| anyhow::anyhow!("{e:#}"))?);
            plugin_commands::handle(action, &dir)
        }
        Commands::Version => {
            println!("claudeload {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    // Let background extension work (response logging) finish before exit
    if let Some(env) = env {
        env.drain().await;
    }

    result
}
