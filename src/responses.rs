use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize)]
pub struct DexScreenerPairResponse {
  #[serde(default)]
  pub pair: Option<DexScreenerPair>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexScreenerPair {
  pub url: Option<String>,
  pub price_usd: Option<String>,
  pub price_native: Option<String>,
  pub volume: Option<DexScreenerWindows>,
  pub price_change: Option<DexScreenerWindows>,
  pub fdv: Option<f64>,
  pub market_cap: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DexScreenerWindows {
  pub m5: Option<f64>,
  pub h1: Option<f64>,
  pub h6: Option<f64>,
  pub h24: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalancesResponse {
  pub wallet_address: String,
  pub balances: Vec<TokenBalance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
  pub address: String,
  #[serde(default)]
  pub value_usd: Option<f64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}
