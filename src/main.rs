use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;

use dispatch_optimizer::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use dispatch_optimizer::adapter::inbound::cli::{config, serve, solve};
use dispatch_optimizer::adapter::inbound::wire::Worker;
use dispatch_optimizer::infrastructure::bootstrap::build_service;
use dispatch_optimizer::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => {
            let config = Config::load_or_default(args.config.as_deref())
                .context("failed to load config")?;
            config.init_logging();
            info!("dispatch-optimizer starting");

            let worker = Worker::new(build_service(&config));
            tokio::select! {
                result = serve::execute(worker, args.listen.as_deref(), config.worker.max_frame_bytes) => {
                    result?;
                }
                _ = signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
            }
            info!("dispatch-optimizer stopped");
        }
        Commands::Solve(args) => {
            let config = Config::load_or_default(args.config.as_deref())
                .context("failed to load config")?;
            config.init_logging();
            let service = build_service(&config);
            solve::execute(&service, &args.path, args.scenarios)
                .with_context(|| format!("failed to solve {}", args.path.display()))?;
        }
        Commands::Config(ConfigCommand::Show(arg)) => config::execute_show(arg.path.as_deref())?,
        Commands::Config(ConfigCommand::Validate(arg)) => {
            config::execute_validate(arg.path.as_deref())?;
        }
    }
    Ok(())
}
