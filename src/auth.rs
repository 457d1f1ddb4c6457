use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::errors::UpstreamError;

/// Checks a session token issued by the external identity provider.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
  /// `Ok(true)` for a live session, `Ok(false)` when the provider rejects it.
  async fn verify(&self, token: &str) -> Result<bool, UpstreamError>;
}

#[derive(Clone)]
pub struct HttpSessionVerifier {
  verify_url: Url,
  http_client: Client,
}

impl HttpSessionVerifier {
  pub fn new(verify_url: Url, timeout: Duration) -> Result<HttpSessionVerifier, reqwest::Error> {
    let http_client = Client::builder().timeout(timeout).build()?;
    Ok(Self { verify_url, http_client })
  }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
  async fn verify(&self, token: &str) -> Result<bool, UpstreamError> {
    let resp = self
      .http_client
      .get(self.verify_url.clone())
      .bearer_auth(token)
      .send()
      .await?;
    let status = resp.status();
    if status.is_success() {
      Ok(true)
    } else if status.is_client_error() {
      debug!("session rejected with {}", status);
      Ok(false)
    } else {
      Err(UpstreamError::Status(status.as_u16()))
    }
  }
}

/// Shared-secret check for backend-only writes.
pub fn api_key_matches(provided: Option<&str>, expected: &str) -> bool {
  match provided {
    Some(key) => !expected.is_empty() && key == expected,
    None => false,
  }
}
