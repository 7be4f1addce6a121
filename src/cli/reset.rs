//! Reset command.

use crate::cli::{update, GlobalArgs};
use crate::core::engine::Engine;
use crate::core::prompt::TerminalPrompter;
use crate::core::provider::ScriptProvider;
use crate::error::Result;

/// Delete the cache and resolve every secret again.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let paths = global.paths()?;
    let provider = ScriptProvider::new(&paths.workdir);
    let mut prompter = TerminalPrompter;

    let mut engine = Engine::new(paths.clone(), &provider, &mut prompter)
        .with_repository(global.repository.clone())
        .with_timeout(global.timeout());

    let outcome = engine.reset()?;
    update::report(&paths, outcome, false)
}
