//! Cubby - development secrets, resolved once and cached for your shell.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cubby::cli::output;
use cubby::cli::{execute, Cli};
use cubby::error::{ConfigError, Error, RemoteError};

fn main() {
    let cli = Cli::parse();
    output::init();

    let filter = EnvFilter::try_from_env("CUBBY_LOG").unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("cubby=debug")
        } else {
            EnvFilter::new("cubby=warn")
        }
    });

    // Logs go to stderr; stdout is reserved for command output.
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("CUBBY_LOG_FORMAT").is_ok_and(|v| v == "json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli.command, &cli.global) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::NotFound(_)) => Some("run: cubby setup"),
        Error::Config(ConfigError::DuplicateSecret(_)) => {
            Some("each environmentVariable may appear only once")
        }
        Error::Remote(RemoteError::GhNotFound) => {
            Some("install the GitHub CLI from https://cli.github.com")
        }
        Error::Remote(RemoteError::Repository(_)) => {
            Some("add an origin remote or set CUBBY_REPOSITORY=owner/name")
        }
        Error::Remote(RemoteError::Auth(_)) => {
            Some("run: gh auth login --scopes codespace:secrets")
        }
        _ => None,
    }
}
