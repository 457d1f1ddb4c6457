use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::UpstreamError;
use crate::models::TokenDeployment;
use crate::responses::{DexScreenerPair, DexScreenerPairResponse};

/// Live market fields merged into a stored deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
  pub value_usd: Option<String>,
  pub value_in_base_token: Option<String>,
  pub volume_usd_24h: Option<f64>,
  pub volume_usd_6h: Option<f64>,
  pub volume_usd_1h: Option<f64>,
  pub volume_usd_5m: Option<f64>,
  pub price_change_percentage_24h: Option<f64>,
  pub fdv: Option<f64>,
  pub market_cap: Option<f64>,
  pub dexscreener_url: Option<String>,
}

impl From<DexScreenerPair> for MarketData {
  fn from(pair: DexScreenerPair) -> Self {
    let volume = pair.volume.as_ref();
    MarketData {
      value_usd: pair.price_usd,
      value_in_base_token: pair.price_native,
      volume_usd_24h: volume.and_then(|v| v.h24),
      volume_usd_6h: volume.and_then(|v| v.h6),
      volume_usd_1h: volume.and_then(|v| v.h1),
      volume_usd_5m: volume.and_then(|v| v.m5),
      price_change_percentage_24h: pair.price_change.as_ref().and_then(|c| c.h24),
      fdv: pair.fdv,
      market_cap: pair.market_cap,
      dexscreener_url: pair.url,
    }
  }
}

/// A stored deployment with best-effort market data.
#[derive(Debug, Clone, Serialize)]
pub struct TokenDetails {
  #[serde(flatten)]
  pub deployment: TokenDeployment,
  #[serde(flatten)]
  pub market: Option<MarketData>,
}

#[async_trait]
pub trait PriceClient: Send + Sync {
  async fn fetch_pair(&self, pool_id: &str) -> Result<MarketData, UpstreamError>;
}

#[derive(Clone)]
pub struct DexScreenerClient {
  base_url: Url,
  http_client: Client,
}

impl DexScreenerClient {
  pub fn new(base_url: Url, timeout: Duration) -> Result<DexScreenerClient, reqwest::Error> {
    let http_client = Client::builder().timeout(timeout).build()?;
    Ok(Self { base_url, http_client })
  }
}

#[async_trait]
impl PriceClient for DexScreenerClient {
  async fn fetch_pair(&self, pool_id: &str) -> Result<MarketData, UpstreamError> {
    let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), pool_id);
    trace!("fetch pair {}", url);
    let resp = self.http_client.get(url).header(ACCEPT, "*/*").send().await?;
    if !resp.status().is_success() {
      return Err(UpstreamError::Status(resp.status().as_u16()));
    }
    let body: DexScreenerPairResponse = resp.json().await?;
    body
      .pair
      .map(MarketData::from)
      .ok_or_else(|| UpstreamError::Malformed(format!("no pair for pool {}", pool_id)))
  }
}

/// Merges live price data into a deployment. A failed price lookup is logged
/// and leaves the market fields out; it never fails the read.
pub async fn enrich(deployment: TokenDeployment, prices: &dyn PriceClient) -> TokenDetails {
  let market = match prices.fetch_pair(&deployment.pool_id).await {
    Ok(market) => Some(market),
    Err(e) => {
      warn!("price lookup for {} failed: {}", deployment.token_address, e);
      None
    }
  };
  TokenDetails { deployment, market }
}
