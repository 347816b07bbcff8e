//! Command handlers, one module per subcommand.

use std::sync::Arc;

use tracing::{debug, info};

use tphub_adapters::{InMemoryDataService, PostgrestClient};
use tphub_core::application::{DataService, TemplateRepository};

use crate::{config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod publish;
pub mod show;
pub mod slug;

/// Which backend a command is talking to.
pub struct Backend {
    pub service: Arc<dyn DataService>,
    /// `true` for the built-in demo catalog; writes are not persisted.
    pub demo: bool,
}

/// Build the data service from configuration.
///
/// A configured `remote.url` selects the PostgREST client; otherwise the
/// in-memory sample catalog backs every command.
pub fn backend(config: &AppConfig) -> CliResult<Backend> {
    match config.remote_url() {
        Some(url) => {
            let api_key = config.remote.api_key.clone().unwrap_or_default();
            let client = PostgrestClient::new(url, api_key, config.request_timeout())?;
            debug!(url, "Using remote data service");
            Ok(Backend {
                service: Arc::new(client),
                demo: false,
            })
        }
        None => {
            info!("No remote.url configured, using the demo catalog");
            Ok(Backend {
                service: Arc::new(InMemoryDataService::with_sample_catalog()),
                demo: true,
            })
        }
    }
}

/// Repository over `backend`, reading from the configured relation.
pub fn repository(backend: &Backend, config: &AppConfig) -> TemplateRepository {
    TemplateRepository::new(Arc::clone(&backend.service)).with_source(config.listing.source)
}
