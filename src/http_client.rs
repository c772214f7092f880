use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::DEFAULT_TIMEOUT_SECS;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Builds the shared client with the configured timeout. Call once at startup,
/// before any request; later calls return the client already built.
pub fn init_http_client(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(timeout_secs))
}

/// Shared blocking client. Falls back to the default timeout when
/// `init_http_client` was never called.
pub fn http_client() -> Result<&'static Client> {
    init_http_client(DEFAULT_TIMEOUT_SECS)
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("matchup_terminal/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build http client")
}
