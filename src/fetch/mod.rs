mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use tracing::debug;

use crate::error::FetchError;

/// Performs a single GET for `url` and returns the body bytes.
///
/// One shot: no retries, transport-default timeouts. Any non-success
/// status is a terminal [`FetchError::Status`] for this session's load.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, FetchError> {
    let parsed = url.parse().map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = resp.bytes().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;

    debug!(bytes = body.len(), "Dataset bytes received");
    Ok(body.to_vec())
}
