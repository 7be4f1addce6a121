//! Repository scope of a remote secret.

use std::collections::BTreeSet;
use std::fmt;

/// Set of repositories (`owner/name`) a remote secret is visible to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteScope(BTreeSet<String>);

impl RemoteScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of this scope and `repo`.
    ///
    /// Never removes entries; returns whether `repo` was newly added.
    pub fn merge(&mut self, repo: &str) -> bool {
        self.0.insert(repo.to_string())
    }

    pub fn contains(&self, repo: &str) -> bool {
        self.0.contains(repo)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RemoteScope {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RemoteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// Answer from the remote store when asking for a secret's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeLookup {
    /// The secret has never been published.
    NotFound,
    /// The secret exists with this scope.
    Found(RemoteScope),
}

impl ScopeLookup {
    /// The current scope, treating "not found" as empty.
    pub fn into_scope(self) -> RemoteScope {
        match self {
            Self::NotFound => RemoteScope::new(),
            Self::Found(scope) => scope,
        }
    }
}
