//! Domain types.

mod descriptor;
mod resolution;
mod scope;
mod sync;

pub use descriptor::SecretDescriptor;
pub use resolution::{ProviderResult, Resolution, ResolvedSecret, Source};
pub use scope::{RemoteScope, ScopeLookup};
pub use sync::{SyncEntry, SyncOutcome, SyncReport};
