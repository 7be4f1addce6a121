//! Cubby - keeps development secrets in a local shell cache and, optionally,
//! in GitHub Codespaces user secrets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── update        # Run the pipeline
//! │   ├── reset         # Drop the cache and re-resolve
//! │   ├── setup         # Default store and shell hooks
//! │   ├── status        # Paths, freshness, cached names
//! │   ├── option        # Read/write store options
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── store         # Descriptor store (secrets.json)
//!     ├── resolve       # Cache, provider, prompt precedence
//!     ├── provider      # Provider scripts
//!     ├── prompt        # Interactive prompts
//!     ├── cache         # Shell cache codec and writer
//!     ├── freshness     # mtime gate
//!     ├── remote/       # Remote store trait and gh backend
//!     ├── sync          # Scope merge and publish
//!     └── engine        # update / reset pipeline
//! ```

pub mod cli;
pub mod core;
pub mod error;
