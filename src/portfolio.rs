use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;

use crate::errors::UpstreamError;
use crate::responses::{BalancesResponse, TokenBalance};

const BALANCES_API_KEY_HEADER: &str = "X-Sim-Api-Key";

#[async_trait]
pub trait BalanceClient: Send + Sync {
  async fn fetch_balances(&self, wallet_address: &str, chain_id: u64) -> Result<BalancesResponse, UpstreamError>;
}

#[derive(Clone)]
pub struct SimBalancesClient {
  base_url: Url,
  api_key: String,
  http_client: Client,
}

impl SimBalancesClient {
  pub fn new(base_url: Url, api_key: String, timeout: Duration) -> Result<SimBalancesClient, reqwest::Error> {
    let http_client = Client::builder().timeout(timeout).build()?;
    Ok(Self { base_url, api_key, http_client })
  }
}

#[async_trait]
impl BalanceClient for SimBalancesClient {
  async fn fetch_balances(&self, wallet_address: &str, chain_id: u64) -> Result<BalancesResponse, UpstreamError> {
    let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), wallet_address);
    trace!("fetch balances {}", url);
    let resp = self
      .http_client
      .get(url)
      .query(&[("chain_ids", chain_id.to_string())])
      .header(BALANCES_API_KEY_HEADER, &self.api_key)
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(UpstreamError::Status(resp.status().as_u16()));
    }
    Ok(resp.json().await?)
  }
}

#[derive(Debug, Serialize)]
pub struct PortfolioSummary {
  pub wallet_address: String,
  pub balances: Vec<TokenBalance>,
  /// USD held in non-investable tokens, 2 decimals.
  pub liquidity_available: String,
  /// USD held in builder coins, 2 decimals.
  pub value: String,
  pub builder_coins_held: usize,
}

/// Splits the fund wallet into spendable liquidity and builder coin holdings.
/// `non_investable` must be lower-case.
pub fn summarize(response: BalancesResponse, non_investable: &[String]) -> PortfolioSummary {
  let mut liquidity = 0f64;
  let mut value = 0f64;
  let mut held = 0;
  for balance in response.balances.iter() {
    let usd = balance.value_usd.unwrap_or(0.0);
    if non_investable.contains(&balance.address.to_lowercase()) {
      liquidity += usd;
    } else {
      value += usd;
      held += 1;
    }
  }
  PortfolioSummary {
    wallet_address: response.wallet_address,
    balances: response.balances,
    liquidity_available: format!("{:.2}", liquidity),
    value: format!("{:.2}", value),
    builder_coins_held: held,
  }
}
