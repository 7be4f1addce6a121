//! Status overview command.

use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::cli::{output, GlobalArgs};
use crate::core::cache::LocalCache;
use crate::core::engine::in_remote_environment;
use crate::core::freshness::{self, Freshness};
use crate::core::store::DescriptorStore;
use crate::core::{config, fs};
use crate::error::Result;

/// Show paths, freshness, and which secrets are cached.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let paths = global.paths()?;

    output::section("Cubby Status");
    output::kv("project", config::project_id(&paths.workdir));
    output::kv("store", output::path(paths.store.display()));
    output::kv("cache", output::path(paths.cache.display()));

    if in_remote_environment() {
        output::kv("environment", "codespaces (cache disabled)");
    }

    if !paths.store.exists() {
        output::kv("secrets", "no secrets file");
        println!();
        output::hint("run: cubby setup");
        return Ok(());
    }

    let state = freshness::check(&paths.store, &paths.cache)?;
    let cache_time = fs::modified(&paths.cache)?
        .map(format_time)
        .unwrap_or_else(|| "never".to_string());
    output::kv("freshness", state.as_str());
    output::kv("updated", cache_time);

    let store = DescriptorStore::load(&paths.store)?;
    let cache = LocalCache::load(&paths.cache)?.unwrap_or_default();

    output::kv(
        "remote",
        if store.use_remote_store() {
            "Codespaces user secrets"
        } else {
            "off"
        },
    );

    output::section("Secrets");
    if store.is_empty() {
        output::dimmed("no secrets declared");
    }
    for descriptor in store.descriptors() {
        let marker = match cache.get(&descriptor.name) {
            Some(_) => console::style("✓").green(),
            None => console::style("✗").red(),
        };
        let source = if descriptor.provider.is_empty() {
            "prompt".to_string()
        } else {
            descriptor.provider.clone()
        };
        println!(
            "  {} {}  {}",
            marker,
            output::key(&descriptor.name),
            console::style(source).dim()
        );
    }

    let missing = store
        .descriptors()
        .iter()
        .filter(|d| cache.get(&d.name).is_none())
        .count();
    if state != Freshness::Fresh || missing > 0 {
        println!();
        if missing > 0 && state == Freshness::Fresh {
            output::hint("run: cubby reset");
        } else {
            output::hint("run: cubby update");
        }
    }

    Ok(())
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
