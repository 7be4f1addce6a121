//! Results of resolving a descriptor set.

use zeroize::Zeroizing;

use crate::core::domain::SecretDescriptor;
use crate::error::ResolveError;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Provider,
    Prompt,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Provider => "provider",
            Self::Prompt => "prompt",
        }
    }
}

/// Value returned by a provider for one descriptor.
#[derive(Debug)]
pub struct ProviderResult {
    pub name: String,
    pub value: Zeroizing<String>,
}

/// A descriptor paired with its concrete value.
#[derive(Debug, Clone)]
pub struct ResolvedSecret {
    pub descriptor: SecretDescriptor,
    pub value: Zeroizing<String>,
    pub source: Source,
}

impl ResolvedSecret {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// Outcome of one resolver pass.
///
/// `values` covers every descriptor that did not fail, in declaration order.
#[derive(Debug, Default)]
pub struct Resolution {
    pub values: Vec<ResolvedSecret>,
    pub failures: Vec<ResolveError>,
}

impl Resolution {
    /// Look up a resolved value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name() == name)
            .map(ResolvedSecret::value)
    }

    /// Number of values that resolved to the empty string.
    pub fn empty_count(&self) -> usize {
        self.values.iter().filter(|v| v.value().is_empty()).count()
    }
}
