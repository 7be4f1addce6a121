//! Local cache script.
//!
//! The cache is a POSIX shell fragment sourced at shell start:
//!
//! ```sh
//! # Generated by cubby. Do not edit; run `cubby reset` to re-resolve.
//! if [ "${CODESPACES:-}" != "true" ]; then
//!
//! # Token for the package registry
//! export REGISTRY_TOKEN
//! REGISTRY_TOKEN='s3cr3t'
//! fi
//! ```
//!
//! The guard turns the whole file into a no-op inside Codespaces, where the
//! same variables arrive from the remote store and must not be shadowed.
//! [`LocalCache::render`] and [`LocalCache::parse`] are the only way the file
//! is produced or read.

use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::domain::Resolution;
use crate::core::fs;
use crate::error::Result;

/// One cached variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub description: String,
    pub value: Zeroizing<String>,
}

/// Typed contents of the cache script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalCache {
    entries: Vec<CacheEntry>,
}

impl LocalCache {
    pub fn new(entries: Vec<CacheEntry>) -> Self {
        Self { entries }
    }

    /// Build the cache for a resolver pass.
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let entries = resolution
            .values
            .iter()
            .map(|v| CacheEntry {
                name: v.descriptor.name.clone(),
                description: v.descriptor.description.clone(),
                value: v.value.clone(),
            })
            .collect();
        Self { entries }
    }

    /// Load the cache at `path`, or `None` if there is none.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let cache = Self::parse(&contents);
                debug!(path = %path.display(), entries = cache.len(), "cache loaded");
                Ok(Some(cache))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the cache file wholesale.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), entries = self.len(), "writing cache");
        let rendered = Zeroizing::new(self.render());
        fs::write_atomic(path, rendered.as_bytes(), 0o600)
    }

    /// Delete the cache file. Returns whether one existed.
    pub fn remove(path: impl AsRef<Path>) -> Result<bool> {
        match std::fs::remove_file(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the shell script.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(constants::CACHE_HEADER);
        out.push('\n');
        out.push_str(&format!(
            "if [ \"${{{}:-}}\" != \"true\" ]; then\n",
            constants::REMOTE_ENV_FLAG
        ));

        for entry in &self.entries {
            out.push('\n');
            if entry.description.is_empty() {
                out.push_str("#\n");
            }
            for line in entry.description.lines() {
                out.push_str(format!("# {}", line).trim_end());
                out.push('\n');
            }
            out.push_str(&format!("export {}\n", entry.name));
            out.push_str(&format!("{}={}\n", entry.name, quote(&entry.value)));
        }

        out.push_str("fi\n");
        out
    }

    /// Parse a cache script.
    ///
    /// Accepts single-quoted, double-quoted and bare values and strips the
    /// quoting. Lines that are not assignments are ignored, so a hand-edited
    /// or older cache still yields whatever assignments it contains.
    pub fn parse(contents: &str) -> Self {
        let mut entries: Vec<CacheEntry> = Vec::new();
        let mut comment: Vec<String> = Vec::new();
        let mut rest = contents;

        while !rest.is_empty() {
            let body = rest.trim_start_matches([' ', '\t']);

            if let Some(text) = body.strip_prefix('#') {
                let (line, tail) = split_line(text);
                comment.push(line.strip_prefix(' ').unwrap_or(line).trim_end().to_string());
                rest = tail;
                continue;
            }

            let assignment = body.strip_prefix("export ").unwrap_or(body);
            if let Some((name, value_src)) = split_assignment(assignment) {
                let (value, remaining) = parse_word(value_src);
                let description = comment.join("\n");
                comment.clear();

                let entry = CacheEntry {
                    name: name.to_string(),
                    description,
                    value: Zeroizing::new(value),
                };
                match entries.iter_mut().find(|e| e.name == entry.name) {
                    Some(existing) => *existing = entry,
                    None => entries.push(entry),
                }
                rest = split_line(remaining).1;
                continue;
            }

            let (line, tail) = split_line(body);
            // `export NAME` sits between the description and the assignment.
            if !line.trim().starts_with("export ") {
                comment.clear();
            }
            rest = tail;
        }

        Self { entries }
    }
}

/// Single-quote a value for POSIX shells.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

/// Split `NAME=rest` where NAME is a valid variable name.
fn split_assignment(s: &str) -> Option<(&str, &str)> {
    let eq = s.find('=')?;
    let name = &s[..eq];
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| (name, &s[eq + 1..]))
}

/// Parse one shell word, returning its unquoted value and the remaining input.
fn parse_word(input: &str) -> (String, &str) {
    let mut out = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        match c {
            '\'' => {
                chars.next();
                for (_, ch) in chars.by_ref() {
                    if ch == '\'' {
                        break;
                    }
                    out.push(ch);
                }
            }
            '"' => {
                chars.next();
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '"' => break,
                        '\\' => match chars.peek() {
                            Some(&(_, next @ ('\\' | '"' | '$' | '`'))) => {
                                out.push(next);
                                chars.next();
                            }
                            Some(&(_, '\n')) => {
                                chars.next();
                            }
                            _ => out.push('\\'),
                        },
                        _ => out.push(ch),
                    }
                }
            }
            '\\' => {
                chars.next();
                if let Some((_, next)) = chars.next() {
                    if next != '\n' {
                        out.push(next);
                    }
                }
            }
            c if c.is_whitespace() || c == ';' => return (out, &input[i..]),
            c => {
                out.push(c);
                chars.next();
            }
        }
    }

    (out, "")
}
