use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures while turning a transaction hash into a decoded deployment.
#[derive(Debug, Error)]
pub enum ExtractionError {
  #[error("transaction receipt not found for {0}")]
  ReceiptNotFound(String),
  #[error("deployment event not found in transaction logs")]
  EventNotFound,
  #[error("failed to decode deployment event: {0}")]
  Decode(String),
  #[error("rpc error {code}: {message}")]
  Rpc { code: i64, message: String },
  #[error("rpc transport failed: {0}")]
  Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),
  #[error("query failed: {0}")]
  Query(#[from] diesel::result::Error),
  #[error("blocking task failed: {0}")]
  Blocking(#[from] actix_web::error::BlockingError),
}

/// Failures talking to third-party HTTP services (prices, balances, sessions).
#[derive(Debug, Error)]
pub enum UpstreamError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("unexpected status {0}")]
  Status(u16),
  #[error("malformed response: {0}")]
  Malformed(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Unauthorized(String),
  #[error("{0}")]
  BadRequest(String),
  #[error("Failed to extract deployment data from transaction")]
  Extraction(#[from] ExtractionError),
  #[error("Duplicate deployment")]
  Duplicate,
  #[error("{0}")]
  NotFound(String),
  #[error("Database error")]
  Storage(#[from] StoreError),
  #[error("Upstream service unavailable")]
  Upstream(#[from] UpstreamError),
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) | ApiError::Extraction(_) => StatusCode::BAD_REQUEST,
      ApiError::Duplicate => StatusCode::CONFLICT,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // the external contract is collapsed, keep the real cause in the logs
    match self {
      ApiError::Extraction(e) => warn!("deployment extraction failed: {}", e),
      ApiError::Storage(e) => error!("storage failure: {}", e),
      ApiError::Upstream(e) => warn!("upstream failure: {}", e),
      _ => (),
    }
    HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
  }
}
