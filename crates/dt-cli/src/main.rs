//! dentech - dental practice console CLI
//!
//! Every invocation restores the persisted session first, runs one command
//! and prints its result as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Sign in with a demo account (mock backend)
//! dentech login admin@example.com admin
//!
//! # Who is signed in?
//! dentech whoami --pretty
//!
//! # Would the current session be allowed onto /admin/users?
//! dentech check /admin/users
//! ```

use dt_cli::{Cli, CliError, CliResult, execute, logger};
use dt_config::{CONFIG_DIR_ENV, Config};
use dt_session::{Navigator, SessionStore};

use std::process::ExitCode;

use clap::Parser;
use log::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(ref dir) = cli.config_dir {
        // SAFETY: no other threads exist yet; the runtime is built below.
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, dir);
        }
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pretty = cli.pretty;
    match runtime.block_on(run(cli)) {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error [{}]: {}", e.error_code(), user_facing(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<serde_json::Value> {
    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    config.log_summary();

    let store = SessionStore::from_config(&config)?;
    let navigator = Navigator::from_routes(&config.routes);
    store.restore().await;

    execute(&store, &navigator, cli.command).await
}

/// Session failures print their UI-safe message; everything else in full.
fn user_facing(e: &CliError) -> String {
    match e {
        CliError::Session { source, .. } => source.user_message().to_string(),
        other => other.to_string(),
    }
}
