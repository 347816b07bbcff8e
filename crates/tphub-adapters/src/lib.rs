//! Infrastructure adapters for Template Hub.
//!
//! This crate implements the ports defined in `tphub-core::application::ports`.
//! It contains all network I/O and the demo backend.

pub mod error;
pub mod memory;
pub mod postgrest;
pub mod sample_catalog;

// Re-export commonly used adapters
pub use error::AdapterError;
pub use memory::InMemoryDataService;
pub use postgrest::PostgrestClient;
