//! Main Entrypoint for the IEP & Mechatronics Helper
//!
//! This binary is responsible for:
//! 1. Parsing the command line and loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Building the responder for the selected mode.
//! 4. Running the interactive session until the user quits.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use iep_helper_core::{Mode, prompts::Prompts, tools::ContextPolicy};
use iep_helper_service::{config::Config, repl::Repl, state::HelperState};
use std::io::{self, IsTerminal};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "iep-helper",
    version,
    about = "IEP & mechatronics classroom helper"
)]
struct CliArgs {
    /// Answer from canned topics (offline) or a completion service (online)
    #[arg(long, value_enum, default_value = "offline")]
    mode: RunMode,
    /// How recent messages are condensed for the slide outline
    /// [default: truncated offline, role-tagged online]
    #[arg(long, value_enum)]
    context_policy: Option<ContextArg>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RunMode {
    Offline,
    Online,
}

impl From<RunMode> for Mode {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Offline => Mode::Offline,
            RunMode::Online => Mode::Online,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ContextArg {
    Truncated,
    RoleTagged,
}

impl From<ContextArg> for ContextPolicy {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Truncated => ContextPolicy::Truncated,
            ContextArg::RoleTagged => ContextPolicy::RoleTagged,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // --- 1. Load Configuration ---
    let config = Config::from_env(args.mode.into()).context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();
    info!(mode = ?config.mode, "Configuration loaded. Initializing helper...");

    // --- 3. Initialize Shared Services ---
    let prompts = Prompts::load(&config.prompts_path)?;
    let context_policy = args
        .context_policy
        .map(ContextPolicy::from)
        .unwrap_or_else(|| ContextPolicy::for_mode(config.mode));
    let state = HelperState::new(&config, prompts, context_policy)
        .context("Failed to initialize responder")?;

    // --- 4. Run the Session ---
    let stdout = io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut repl =
        Repl::new(state, io::stdin().lock(), stdout.lock()).with_clear_screen(clear_screen);
    repl.run().await?;

    info!("Helper has shut down.");
    Ok(())
}
