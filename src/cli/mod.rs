//! Command-line interface.

pub mod completions;
pub mod option;
pub mod output;
pub mod reset;
pub mod setup;
pub mod status;
pub mod update;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Paths;
use crate::core::constants;

/// Cubby - development secrets, resolved once and cached for your shell.
#[derive(Parser)]
#[command(
    name = "cubby",
    about = "Resolve development secrets into a shell cache and sync them to Codespaces",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the secrets file
    #[arg(long, global = true, env = "CUBBY_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Path to the generated cache script
    #[arg(long, global = true, env = "CUBBY_CACHE", value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Timeout for each GitHub call, in seconds
    #[arg(
        long,
        global = true,
        env = "CUBBY_TIMEOUT",
        value_name = "SECS",
        default_value_t = constants::REMOTE_TIMEOUT_SECS
    )]
    pub timeout: u64,

    /// Repository to publish for (owner/name) instead of the git origin
    #[arg(long, global = true, env = "CUBBY_REPOSITORY", value_name = "REPO")]
    pub repository: Option<String>,
}

impl GlobalArgs {
    /// Resolve store and cache paths against the current directory.
    pub fn paths(&self) -> crate::error::Result<Paths> {
        Paths::resolve(self.store.clone(), self.cache.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve secrets into the cache if the secrets file changed
    Update {
        /// Print nothing when the cache is already up to date
        #[arg(short, long)]
        quiet: bool,
    },

    /// Delete the cache and resolve every secret again
    Reset,

    /// Create the secrets file and register the shell hook
    Setup,

    /// Show paths, freshness and which secrets are cached
    Status,

    /// Read or write options in the secrets file
    #[command(name = "option")]
    Options {
        #[command(subcommand)]
        action: OptionAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Option subcommands.
#[derive(Subcommand)]
pub enum OptionAction {
    /// Print an option value (dotted keys reach nested options)
    Get {
        /// Option key, e.g. useGitHubUserSecrets
        key: String,
    },

    /// Set an option value; JSON literals are stored as JSON
    Set {
        /// Option key, e.g. useGitHubUserSecrets
        key: String,
        /// New value, e.g. true
        value: String,
    },
}

/// Execute a command.
pub fn execute(command: Command, global: &GlobalArgs) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Update { quiet } => update::execute(global, quiet),
        Reset => reset::execute(global),
        Setup => setup::execute(global),
        Status => status::execute(global),
        Options { action } => match action {
            OptionAction::Get { key } => option::get(global, &key),
            OptionAction::Set { key, value } => option::set(global, &key, &value),
        },
        Completions { shell } => completions::execute(shell),
    }
}
