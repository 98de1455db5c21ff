//! Local registry of cluster manager servers and connection profiles
//!
//! Entries are kept in `registry.toml` under the user's config directory.
//! Credentials are never written to it.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_registry_toml, parse_registry_toml_str, to_toml};
pub use schema::{ConnectionProfile, Protocol, RegistryFile, ServerEntry};
pub use store::RegistryStore;
