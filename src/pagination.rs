use serde::Deserialize;
use std::cmp::{max, min};

pub const DEFAULT_PER_PAGE: i64 = 100;
pub const MAXIMUM_PER_PAGE: i64 = 1000;

/// Raw query values. Anything that is not an integer falls back to the
/// default instead of failing the request.
#[derive(Deserialize, Debug, Default)]
pub struct PaginationInfo {
  pub page: Option<String>,
  pub limit: Option<String>,
}

fn parse_number(raw: &Option<String>) -> Option<i64> {
  raw.as_ref().and_then(|v| v.trim().parse::<i64>().ok())
}

/// A clamped, 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page: i64,
  per_page: i64,
}

impl PageRequest {
  pub fn new(page: Option<i64>, per_page: Option<i64>) -> PageRequest {
    let r = PageRequest {
      page: 1,
      per_page: DEFAULT_PER_PAGE,
    };
    let r = match page {
      Some(p) => PageRequest { page: max(p, 1), ..r },
      None => r,
    };
    match per_page {
      Some(p) if p > 0 => PageRequest { per_page: min(MAXIMUM_PER_PAGE, p), ..r },
      _ => r,
    }
  }

  pub fn page(&self) -> i64 {
    self.page
  }

  pub fn limit(&self) -> i64 {
    self.per_page
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1).saturating_mul(self.per_page)
  }
}

impl From<&PaginationInfo> for PageRequest {
  fn from(info: &PaginationInfo) -> Self {
    PageRequest::new(parse_number(&info.page), parse_number(&info.limit))
  }
}
