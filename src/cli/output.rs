//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR, disabled when not a terminal):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, commands, names, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info
//!
//! Errors go to stderr; everything else goes to stdout.

use std::fmt::Display;

use console::style;

const RULE_WIDTH: usize = 56;

/// Apply NO_COLOR before anything is printed.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ cache updated`
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print an error message to stderr (red).
///
/// Example: `✗ secrets file not found`
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().for_stderr(), msg);
}

/// Print a warning message (yellow).
///
/// Example: `⚠ API_KEY: provider failed`
pub fn warn(msg: &str) {
    println!("{} {}", style("⚠").yellow(), msg);
}

/// Print a hint message (cyan).
///
/// Example: `→ run: cubby setup`
pub fn hint(msg: &str) {
    println!("{} {}", style("→").cyan(), style(msg).cyan());
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", style(title).bold());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  store  .devcontainer/secrets.json`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", style(label).dim(), style(value).bold());
}

/// Print a list item with bullet.
///
/// Example: `  • DATABASE_URL`
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a horizontal rule separator.
pub fn rule() {
    println!("{}", style("─".repeat(RULE_WIDTH)).dim());
}

/// Format a path in cyan for inline use.
pub fn path(p: impl Display) -> String {
    style(p).cyan().to_string()
}

/// Format a command in green for inline use.
pub fn cmd(c: &str) -> String {
    style(c).green().to_string()
}

/// Format a secret name in cyan for inline use.
pub fn key(k: &str) -> String {
    style(k).cyan().to_string()
}

/// Print a dimmed/secondary message.
///
/// Example: `no secrets declared`
pub fn dimmed(msg: &str) {
    println!("{}", style(msg).dim());
}

/// Print a section header with a separator line.
///
/// ```text
/// Secrets
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}

/// `1 secret`, `2 secrets`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
