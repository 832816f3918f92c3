//! Shared reqwest client construction.

use std::time::Duration;

use reqwest::Client;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("biolex/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client. `timeout` of `None` means requests may wait forever.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT).gzip(true).brotli(true);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
