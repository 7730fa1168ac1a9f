//! HTTP fetcher.

use crate::SourceError;

/// Fetches a document with a `GET` request.
///
/// Timeouts are those of the supplied client. Dropping the returned
/// future aborts the request.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the response status is
/// not a success.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    log::debug!("GET {url}");
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    Ok(resp.text().await?)
}
