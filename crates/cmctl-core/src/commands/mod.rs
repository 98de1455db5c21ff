//! High-level commands for cmctl operations.
//!
//! This module provides the API the command line frontend calls into.

pub mod registry;
pub mod resolve;

pub use registry::{
    CreateProfileOptions, CreateServerOptions, ProfileListing, RegistryCommand, RegistryReport,
    ServerListing,
};
pub use resolve::ResolveCommand;
