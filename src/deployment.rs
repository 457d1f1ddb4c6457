//! Turns a deployment transaction into a persistence-ready record.
//!
//! receipt -> first `TokenCreated` log -> typed event -> lower-cased row.
//! Every request re-fetches and re-decodes; nothing here is cached.

use alloy_primitives::{Address, Log, B256};
use alloy_sol_types::{sol, SolEvent};
use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::constants::{Network, DEPLOYMENT_EVENT_TOPIC};
use crate::errors::ExtractionError;
use crate::models::NewTokenDeployment;
use crate::rpc::{ChainClient, TxLog};
use crate::utils;

sol! {
  #[derive(Debug, PartialEq)]
  event TokenCreated(
    address msgSender,
    address indexed tokenAddress,
    address indexed tokenAdmin,
    string tokenImage,
    string tokenName,
    string tokenSymbol,
    string tokenMetadata,
    string tokenContext,
    int24 startingTick,
    address poolHook,
    bytes32 poolId,
    address pairedToken,
    address locker,
    address mevModule,
    uint256 extensionsSupply,
    address[] extensions
  );
}

/// A decoded `TokenCreated` event together with the block it landed in.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentEvent {
  pub deployer_address: Address,
  pub token_address: Address,
  pub token_admin_address: Address,
  pub paired_token_address: Address,
  pub pool_id: B256,
  pub locker_address: Address,
  pub mev_module_address: Address,
  pub pool_hook_address: Address,
  pub token_name: String,
  pub token_symbol: String,
  pub token_metadata: String,
  pub token_image: String,
  pub token_context: String,
  pub starting_tick: BigDecimal,
  pub extensions_supply: BigDecimal,
  pub extensions: Vec<Address>,
  /// Always fits in an `i64`, checked at decode time.
  pub block_number: u64,
}

/// Returns the first log, in receipt order, whose topic0 is the deployment
/// event. Later matches in the same transaction are ignored.
pub fn locate_deployment_log(logs: &[TxLog]) -> Result<&TxLog, ExtractionError> {
  for log in logs {
    if log.topics.first() == Some(&DEPLOYMENT_EVENT_TOPIC) {
      return Ok(log);
    }
  }
  Err(ExtractionError::EventNotFound)
}

pub fn decode_deployment_event(log: &TxLog, block_number: u64) -> Result<DeploymentEvent, ExtractionError> {
  if block_number > i64::MAX as u64 {
    return Err(ExtractionError::Decode(format!("block number {} out of range", block_number)));
  }

  let raw = Log::new_unchecked(log.address, log.topics.clone(), log.data.clone());
  let event = TokenCreated::decode_log(&raw)
    .map_err(|e| ExtractionError::Decode(e.to_string()))?
    .data;

  let starting_tick = BigDecimal::from_str(&event.startingTick.to_string())
    .map_err(|e| ExtractionError::Decode(format!("starting tick: {}", e)))?;
  let extensions_supply = BigDecimal::from_str(&event.extensionsSupply.to_string())
    .map_err(|e| ExtractionError::Decode(format!("extensions supply: {}", e)))?;

  Ok(DeploymentEvent {
    deployer_address: event.msgSender,
    token_address: event.tokenAddress,
    token_admin_address: event.tokenAdmin,
    paired_token_address: event.pairedToken,
    pool_id: event.poolId,
    locker_address: event.locker,
    mev_module_address: event.mevModule,
    pool_hook_address: event.poolHook,
    token_name: event.tokenName,
    token_symbol: event.tokenSymbol,
    token_metadata: event.tokenMetadata,
    token_image: event.tokenImage,
    token_context: event.tokenContext,
    starting_tick,
    extensions_supply,
    extensions: event.extensions,
    block_number,
  })
}

impl DeploymentEvent {
  /// Maps the event into a row. Address-typed fields become lower-case hex,
  /// everything else is carried over untouched.
  pub fn into_record(self, network: Network, deployment_tx_hash: &str) -> NewTokenDeployment {
    NewTokenDeployment {
      token_address: utils::lower_hex(self.token_address.as_slice()),
      admin_address: utils::lower_hex(self.token_admin_address.as_slice()),
      token_name: self.token_name,
      token_symbol: self.token_symbol,
      deployer_address: utils::lower_hex(self.deployer_address.as_slice()),
      pool_id: utils::lower_hex(self.pool_id.as_slice()),
      paired_token: utils::lower_hex(self.paired_token_address.as_slice()),
      locker: utils::lower_hex(self.locker_address.as_slice()),
      mev_module: utils::lower_hex(self.mev_module_address.as_slice()),
      pool_hook: utils::lower_hex(self.pool_hook_address.as_slice()),
      starting_tick: self.starting_tick,
      token_metadata: self.token_metadata,
      token_image: self.token_image,
      token_context: self.token_context,
      extensions_supply: self.extensions_supply,
      extensions: self.extensions.iter().map(|e| utils::lower_hex(e.as_slice())).collect(),
      network: network.to_string(),
      deployment_block_number: self.block_number as i64,
      deployment_tx_hash: deployment_tx_hash.to_owned(),
    }
  }
}

/// Fetches the receipt for `tx_hash` and decodes its deployment event.
pub async fn extract_deployment(chain: &dyn ChainClient, tx_hash: &str) -> Result<DeploymentEvent, ExtractionError> {
  let receipt = chain.get_transaction_receipt(tx_hash).await?;
  let block_number = receipt.block_number.to::<u64>();
  trace!("receipt {} in block {} with {} logs", tx_hash, block_number, receipt.logs.len());

  let log = locate_deployment_log(&receipt.logs)?;
  let event = decode_deployment_event(log, block_number)?;
  debug!("decoded deployment of {} from {}", event.token_address, tx_hash);
  Ok(event)
}
