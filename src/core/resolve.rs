//! Value resolver.
//!
//! Precedence per descriptor, in declaration order:
//!
//! 1. a value already present in the previous cache
//! 2. the declared provider
//! 3. an interactive prompt
//!
//! Failures are recorded per descriptor and never stop the pass.

use tracing::{debug, warn};

use crate::core::cache::LocalCache;
use crate::core::domain::{Resolution, ResolvedSecret, SecretDescriptor, Source};
use crate::core::prompt::Prompter;
use crate::core::provider::ValueProvider;
use crate::error::ResolveError;

/// Resolve every descriptor.
pub fn resolve_all(
    descriptors: &[SecretDescriptor],
    previous: Option<&LocalCache>,
    provider: &dyn ValueProvider,
    prompter: &mut dyn Prompter,
) -> Resolution {
    let mut resolution = Resolution::default();

    for descriptor in descriptors {
        match resolve_one(descriptor, previous, provider, prompter) {
            Ok(secret) => {
                if secret.value().is_empty() {
                    warn!(name = %secret.name(), "secret resolved to an empty value");
                }
                debug!(name = %secret.name(), source = secret.source.as_str(), "resolved");
                resolution.values.push(secret);
            }
            Err(e) => {
                warn!(name = %descriptor.name, error = %e, "failed to resolve secret");
                resolution.failures.push(e);
            }
        }
    }

    resolution
}

fn resolve_one(
    descriptor: &SecretDescriptor,
    previous: Option<&LocalCache>,
    provider: &dyn ValueProvider,
    prompter: &mut dyn Prompter,
) -> Result<ResolvedSecret, ResolveError> {
    if let Some(value) = previous.and_then(|cache| cache.get(&descriptor.name)) {
        return Ok(ResolvedSecret {
            descriptor: descriptor.clone(),
            value: value.to_string().into(),
            source: Source::Cache,
        });
    }

    let (value, source) = if descriptor.provider.trim().is_empty() {
        (prompter.ask(descriptor)?, Source::Prompt)
    } else {
        let result = provider.resolve(descriptor)?;
        if result.name != descriptor.name {
            return Err(ResolveError::ProviderFailed {
                name: descriptor.name.clone(),
                reason: format!("provider returned a value for {}", result.name),
            });
        }
        (result.value, Source::Provider)
    };

    Ok(ResolvedSecret {
        descriptor: descriptor.clone(),
        value,
        source,
    })
}
