use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{fund_strategies, token_deployments};

/// A stored token deployment, returned verbatim by the read endpoints.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = token_deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TokenDeployment {
  pub id: Uuid,
  pub token_address: String,
  pub admin_address: String,
  pub token_name: String,
  pub token_symbol: String,
  pub deployer_address: String,
  pub pool_id: String,
  pub paired_token: String,
  pub locker: String,
  pub mev_module: String,
  pub pool_hook: String,
  pub starting_tick: BigDecimal,
  pub token_metadata: String,
  pub token_image: String,
  pub token_context: String,
  pub extensions_supply: BigDecimal,
  pub extensions: Vec<String>,
  pub network: String,
  pub deployment_block_number: i64,
  pub deployment_tx_hash: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = token_deployments)]
pub struct NewTokenDeployment {
  pub token_address: String,
  pub admin_address: String,
  pub token_name: String,
  pub token_symbol: String,
  pub deployer_address: String,
  pub pool_id: String,
  pub paired_token: String,
  pub locker: String,
  pub mev_module: String,
  pub pool_hook: String,
  pub starting_tick: BigDecimal,
  pub token_metadata: String,
  pub token_image: String,
  pub token_context: String,
  pub extensions_supply: BigDecimal,
  pub extensions: Vec<String>,
  pub network: String,
  pub deployment_block_number: i64,
  pub deployment_tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = fund_strategies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FundStrategy {
  pub id: Uuid,
  pub strategy: Value,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = fund_strategies)]
pub struct NewFundStrategy {
  pub strategy: Value,
}

/// One entry of an allocation set produced by the fund manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundAllocation {
  #[serde(alias = "tokenAddress")]
  pub token_address: String,
  #[serde(alias = "allocationPercentage")]
  pub allocation_percentage: f64,
  #[serde(alias = "builderScore", default)]
  pub builder_score: Option<f64>,
  #[serde(alias = "deployerAddress", default)]
  pub deployer_address: Option<String>,
}
