use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::Result;

/// Create an HTTP client with the given request timeout
pub fn create_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .tcp_nodelay(true)
        .user_agent(user_agent)
        .use_rustls_tls()
        .build()?;

    Ok(client)
}
