//! Update command.
//!
//! Runs the pipeline when the secrets file is newer than the cache.

use crate::cli::output;
use crate::cli::GlobalArgs;
use crate::core::config::Paths;
use crate::core::domain::SyncOutcome;
use crate::core::engine::{Engine, UpdateOutcome};
use crate::core::prompt::TerminalPrompter;
use crate::core::provider::ScriptProvider;
use crate::error::Result;

/// Refresh the cache if it is stale.
pub fn execute(global: &GlobalArgs, quiet: bool) -> Result<()> {
    let paths = global.paths()?;
    let provider = ScriptProvider::new(&paths.workdir);
    let mut prompter = TerminalPrompter;

    let mut engine = Engine::new(paths.clone(), &provider, &mut prompter)
        .with_repository(global.repository.clone())
        .with_timeout(global.timeout());

    let outcome = engine.update()?;
    report(&paths, outcome, quiet)
}

/// Print what a pipeline run did.
///
/// Returns the sync phase error, if any, so the process exits non-zero after
/// everything else has been reported.
pub fn report(paths: &Paths, outcome: UpdateOutcome, quiet: bool) -> Result<()> {
    let report = match outcome {
        UpdateOutcome::RemoteEnvironment => {
            if !quiet {
                output::dimmed("running in Codespaces, secrets come from the environment");
            }
            return Ok(());
        }
        UpdateOutcome::UpToDate => {
            if !quiet {
                output::dimmed("secrets are up to date");
            }
            return Ok(());
        }
        UpdateOutcome::Updated(report) => report,
    };

    for failure in &report.resolution.failures {
        output::warn(&failure.to_string());
    }
    if report.resolution.empty_count() > 0 {
        output::warn(&format!(
            "{} resolved to an empty value",
            output::plural(report.resolution.empty_count(), "secret")
        ));
    }

    output::success(&format!(
        "cached {} in {}",
        output::plural(report.cache.len(), "secret"),
        output::path(paths.cache.display())
    ));
    if !report.resolution.failures.is_empty() {
        output::hint(&format!(
            "fix the failing providers, then run: {}",
            output::cmd("cubby reset")
        ));
    }

    match report.sync {
        None => Ok(()),
        Some(Err(e)) => Err(e.into()),
        Some(Ok(sync)) => {
            for entry in &sync.entries {
                match &entry.outcome {
                    SyncOutcome::Published { added: true, .. } => {
                        output::list_item(&format!(
                            "{} now visible to {}",
                            output::key(&entry.name),
                            sync.repository
                        ));
                    }
                    SyncOutcome::Published { .. } => {}
                    SyncOutcome::Skipped(e) => output::warn(&e.to_string()),
                }
            }
            output::success(&format!(
                "published {} to Codespaces for {}",
                output::plural(sync.published(), "secret"),
                sync.repository
            ));
            Ok(())
        }
    }
}
