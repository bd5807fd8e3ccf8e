pub mod config;
pub mod laws;
pub mod search;
pub mod version;

use log::debug;

use crate::api::KoshaClient;
use crate::cli::args::FetchArgs;
use crate::cli::OutputFormat;
use crate::config::{Config, API_KEY_ENV};
use crate::error::{KoshaError, Result};

/// Flags shared by every search command
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}

/// Build a fetch client from the config file, the environment and command-line overrides
pub(crate) fn build_client(fetch: &FetchArgs) -> Result<KoshaClient> {
    let config = Config::load()?;
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok());
    if api_key.is_none() {
        return Err(KoshaError::NoApiKey);
    }

    let mut client_config = config.client_config(api_key);
    if let Some(page_size) = fetch.page_size {
        client_config.page_size = page_size;
    }
    if let Some(timeout) = fetch.timeout {
        client_config.timeout = timeout;
    }

    debug!(
        "endpoint={} numOfRows={} timeout={}s",
        client_config.endpoint, client_config.page_size, client_config.timeout
    );

    KoshaClient::new(client_config)
}
