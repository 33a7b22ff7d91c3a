//! Shared blocking HTTP plumbing.
//!
//! Tile downloads and the feed fetch go through a single lazily-built client,
//! so TLS and connection-pool setup happen once per process and every request
//! carries a User-Agent that public tile servers accept.

use crate::Result;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("seismap/0.1 (+https://github.com/example/seismap)")
        .build()
        .expect("failed to build reqwest blocking client")
});

/// GET the URL and return its body. Any non-2xx status counts as a failed
/// request, not an empty body.
pub(crate) fn get_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = CLIENT.get(url).send()?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}
