//! Setup command.
//!
//! Creates the default secrets file and registers a hook in `~/.bashrc` and
//! `~/.zshrc` that runs `cubby update` and sources the cache at shell start.
//! Running it again replaces the project's hook block in place.

use std::path::{Path, PathBuf};

use crate::cli::{output, GlobalArgs};
use crate::core::cache::quote;
use crate::core::config::{self, Paths};
use crate::core::constants;
use crate::core::store::DescriptorStore;
use crate::error::{ConfigError, Result};

/// Create the secrets file and install shell hooks.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let paths = global.paths()?;

    if DescriptorStore::create_default(&paths.store)? {
        output::success(&format!("created {}", output::path(paths.store.display())));
    } else {
        output::dimmed(&format!("{} already exists", paths.store.display()));
    }

    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    let project = config::project_id(&paths.workdir);
    let block = render_hook(&project, &paths);

    for rc in rc_files(&home) {
        let existing = match std::fs::read_to_string(&rc) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let updated = install_hook(&existing, &project, &block);
        if updated == existing {
            output::dimmed(&format!("hook already present in {}", rc.display()));
        } else {
            std::fs::write(&rc, updated)?;
            output::success(&format!("registered hook in {}", output::path(rc.display())));
        }
    }

    output::hint(&format!(
        "declare secrets in {}, then open a new shell or run: {}",
        paths.store.display(),
        output::cmd("cubby update")
    ));
    Ok(())
}

/// Existing rc files, or `~/.bashrc` when there are none.
fn rc_files(home: &Path) -> Vec<PathBuf> {
    let existing: Vec<PathBuf> = constants::SHELL_RC_FILES
        .iter()
        .map(|f| home.join(f))
        .filter(|p| p.exists())
        .collect();

    if existing.is_empty() {
        vec![home.join(constants::SHELL_RC_FILES[0])]
    } else {
        existing
    }
}

fn markers(project: &str) -> (String, String) {
    (
        format!("{} {} >>>", constants::HOOK_BEGIN, project),
        format!("{} {} <<<", constants::HOOK_END, project),
    )
}

/// Shell snippet that refreshes and sources the cache for one project.
pub fn render_hook(project: &str, paths: &Paths) -> String {
    let (begin, end) = markers(project);
    let store = quote(&paths.store.to_string_lossy());
    let cache = quote(&paths.cache.to_string_lossy());
    let workdir = quote(&paths.workdir.to_string_lossy());

    format!(
        "{begin}\n\
         if command -v cubby >/dev/null 2>&1; then\n\
         \x20 (cd {workdir} && cubby --store {store} --cache {cache} update --quiet)\n\
         fi\n\
         if [ -f {cache} ]; then . {cache}; fi\n\
         {end}\n"
    )
}

/// Insert or replace the project's hook block in rc file contents.
pub fn install_hook(existing: &str, project: &str, block: &str) -> String {
    let (begin, end) = markers(project);

    let lines: Vec<&str> = existing.lines().collect();
    let start = lines.iter().position(|l| l.trim_end() == begin);
    let stop = start.and_then(|s| {
        lines[s..]
            .iter()
            .position(|l| l.trim_end() == end)
            .map(|offset| s + offset)
    });

    match (start, stop) {
        (Some(start), Some(stop)) => {
            let mut out = String::new();
            for line in &lines[..start] {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(block);
            for line in &lines[stop + 1..] {
                out.push_str(line);
                out.push('\n');
            }
            out
        }
        _ => {
            let mut out = existing.to_string();
            if !out.is_empty() {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push('\n');
            }
            out.push_str(block);
            out
        }
    }
}
