//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `tphub-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DataService`: the Remote Data Service query surface
//!   - `MediaElement`: the preview video player
//!   - `LinkOpener`: opens external links in a new browsing context
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{DataService, Filter, LinkOpener, MediaElement, Order, Query, RemoteError};

#[cfg(test)]
pub use output::{MockDataService, MockLinkOpener, MockMediaElement};
