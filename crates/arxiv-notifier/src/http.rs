//! Response status mapping shared by the arXiv and webhook clients.

use crate::error::{ClientError, ClientResult};

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER: u64 = 60;

/// Pass successful responses through, turn everything else into a [`ClientError`].
pub async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 | 503 if response.headers().contains_key("Retry-After") => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER);

            Err(ClientError::rate_limited(retry_after))
        }
        429 => Err(ClientError::rate_limited(DEFAULT_RETRY_AFTER)),
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}
