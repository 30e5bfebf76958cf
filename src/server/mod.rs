//! Server module for building the HTTP application
//!
//! This module provides a `ServerBuilder` that wires the stores into the
//! company and invoice routes, adds health routes, and serves the result
//! with graceful shutdown.

pub mod builder;
pub mod entity_registry;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use router::build_router;
