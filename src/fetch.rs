//! Fetches the remote diary source document. The pipeline re-fetches on
//! every run; nothing is cached between invocations.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("nikki/", env!("CARGO_PKG_VERSION"));

pub fn client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Downloads the diary source as text. Any non-success status is an
/// error; retry policy, if any, belongs to the caller's environment.
pub async fn fetch_source(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("Fetching diary source `{}`", url))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("Fetching diary source `{}`", url))?;
    response
        .text()
        .await
        .with_context(|| format!("Reading diary source `{}`", url))
}
