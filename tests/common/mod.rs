#![allow(dead_code)]

use alloy_primitives::aliases::I24;
use alloy_primitives::{address, b256, Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use builders_fund_api::api::{AppState, ServiceSettings};
use builders_fund_api::auth::SessionVerifier;
use builders_fund_api::constants::Network;
use builders_fund_api::deployment::{self, TokenCreated};
use builders_fund_api::errors::{ExtractionError, StoreError, UpstreamError};
use builders_fund_api::models::{FundStrategy, NewTokenDeployment, TokenDeployment};
use builders_fund_api::pagination::PageRequest;
use builders_fund_api::portfolio::BalanceClient;
use builders_fund_api::price::{MarketData, PriceClient};
use builders_fund_api::responses::BalancesResponse;
use builders_fund_api::rpc::{ChainClient, TxLog, TxReceipt};
use builders_fund_api::store::{DeploymentStore, FundStore, InsertOutcome};

pub const SESSION_COOKIE: &str = "privy-token";
pub const GOOD_SESSION: &str = "good-session";
pub const BACKEND_KEY: &str = "backend-secret";
pub const FUND_MANAGER: &str = "0x4200000000000000000000000000000000000042";
pub const USDC: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";

/// Tx hash `n` as lower-case 0x hex.
pub fn tx_hash(n: u64) -> String {
  format!("0x{:064x}", n)
}

pub fn token_address(n: u64) -> String {
  format!("0x{:040x}", n)
}

pub fn sample_event(token: Address, name: &str, symbol: &str) -> TokenCreated {
  TokenCreated {
    msgSender: address!("5B38Da6a701c568545dCfcB03FcB875f56beddC4"),
    tokenAddress: token,
    tokenAdmin: address!("Ab8483F64d9C6d1EcF9b849Ae677dD3315835cb2"),
    tokenImage: "ipfs://QmBuilder".to_owned(),
    tokenName: name.to_owned(),
    tokenSymbol: symbol.to_owned(),
    tokenMetadata: "{}".to_owned(),
    tokenContext: "{\"interface\":\"builders\"}".to_owned(),
    startingTick: I24::try_from(-230400).unwrap(),
    poolHook: address!("DD5EeaFf7BD481AD55Db083062b13a3cdf0A68CC"),
    poolId: b256!("AB5801A7D398351B8BE11C439E05C5B3259AEC9B0000000000000000000000FF"),
    pairedToken: address!("4200000000000000000000000000000000000006"),
    locker: address!("29d17C1A8D851d7d4cA97FAe97AcAdb398D9cCE0"),
    mevModule: address!("E143f9872A33c955F23cF442BB4B1EFB3A7402A2"),
    extensionsSupply: U256::from(0u64),
    extensions: vec![],
  }
}

pub fn deployment_log(event: &TokenCreated) -> TxLog {
  let encoded = event.encode_log_data();
  TxLog {
    address: address!("E85A59c628F7d27878ACeB4bf3b35733630083a9"),
    topics: encoded.topics().to_vec(),
    data: encoded.data.clone(),
    log_index: Some(U64::from(1u64)),
  }
}

pub fn transfer_log() -> TxLog {
  TxLog {
    address: address!("4200000000000000000000000000000000000006"),
    topics: vec![b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")],
    data: Bytes::new(),
    log_index: Some(U64::from(0u64)),
  }
}

/// A ready-to-store row for token `n`, as the extraction pipeline builds it.
pub fn record(n: u64, block_number: u64, name: &str, symbol: &str) -> NewTokenDeployment {
  let token = Address::from_str(&token_address(n)).unwrap();
  let log = deployment_log(&sample_event(token, name, symbol));
  deployment::decode_deployment_event(&log, block_number)
    .unwrap()
    .into_record(Network::Base, &tx_hash(n))
}

/// Chain with a fixed set of receipts keyed by lower-case tx hash.
#[derive(Default)]
pub struct FakeChain {
  receipts: Mutex<HashMap<String, TxReceipt>>,
  pub calls: Mutex<u64>,
}

impl FakeChain {
  pub fn with_receipt(&self, hash: &str, block_number: u64, logs: Vec<TxLog>) {
    let receipt = TxReceipt {
      transaction_hash: B256::from_str(hash).unwrap(),
      block_number: U64::from(block_number),
      status: Some(U64::from(1u64)),
      logs,
    };
    self.receipts.lock().unwrap().insert(hash.to_owned(), receipt);
  }
}

#[async_trait]
impl ChainClient for FakeChain {
  async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<TxReceipt, ExtractionError> {
    *self.calls.lock().unwrap() += 1;
    self
      .receipts
      .lock()
      .unwrap()
      .get(tx_hash)
      .cloned()
      .ok_or_else(|| ExtractionError::ReceiptNotFound(tx_hash.to_owned()))
  }
}

/// In-memory replacement for the Postgres store, with the same ordering and
/// duplicate rules.
#[derive(Default)]
pub struct MemoryStore {
  pub deployments: Mutex<Vec<TokenDeployment>>,
  pub strategies: Mutex<Vec<FundStrategy>>,
  failing_inserts: Mutex<u32>,
}

impl MemoryStore {
  /// Makes the next `n` deployment inserts fail like a lost connection.
  pub fn fail_next_inserts(&self, n: u32) {
    *self.failing_inserts.lock().unwrap() = n;
  }

  pub fn deployment_count(&self) -> usize {
    self.deployments.lock().unwrap().len()
  }

  pub fn seed(&self, record: NewTokenDeployment) {
    let mut rows = self.deployments.lock().unwrap();
    let id = Uuid::from_u128(rows.len() as u128 + 1);
    rows.push(stored(id, record));
  }
}

fn stored(id: Uuid, r: NewTokenDeployment) -> TokenDeployment {
  TokenDeployment {
    id,
    token_address: r.token_address,
    admin_address: r.admin_address,
    token_name: r.token_name,
    token_symbol: r.token_symbol,
    deployer_address: r.deployer_address,
    pool_id: r.pool_id,
    paired_token: r.paired_token,
    locker: r.locker,
    mev_module: r.mev_module,
    pool_hook: r.pool_hook,
    starting_tick: r.starting_tick,
    token_metadata: r.token_metadata,
    token_image: r.token_image,
    token_context: r.token_context,
    extensions_supply: r.extensions_supply,
    extensions: r.extensions,
    network: r.network,
    deployment_block_number: r.deployment_block_number,
    deployment_tx_hash: r.deployment_tx_hash,
    created_at: Utc::now(),
  }
}

#[async_trait]
impl DeploymentStore for MemoryStore {
  async fn insert_deployment(&self, record: NewTokenDeployment) -> Result<InsertOutcome, StoreError> {
    {
      let mut failing = self.failing_inserts.lock().unwrap();
      if *failing > 0 {
        *failing -= 1;
        return Err(StoreError::from(diesel::result::Error::BrokenTransactionManager));
      }
    }
    let mut rows = self.deployments.lock().unwrap();
    if rows.iter().any(|d| d.deployment_tx_hash == record.deployment_tx_hash) {
      return Ok(InsertOutcome::Duplicate);
    }
    let id = Uuid::from_u128(rows.len() as u128 + 1);
    rows.push(stored(id, record));
    Ok(InsertOutcome::Inserted)
  }

  async fn find_by_tx_hash(&self, tx_hash: &str) -> Result<Option<TokenDeployment>, StoreError> {
    let rows = self.deployments.lock().unwrap();
    Ok(rows.iter().find(|d| d.deployment_tx_hash == tx_hash).cloned())
  }

  async fn find_by_token_address(&self, token_address: &str) -> Result<Option<TokenDeployment>, StoreError> {
    let rows = self.deployments.lock().unwrap();
    Ok(rows.iter().find(|d| d.token_address == token_address).cloned())
  }

  async fn list_deployments(&self, page: PageRequest, search: Option<String>) -> Result<Vec<TokenDeployment>, StoreError> {
    let mut rows: Vec<TokenDeployment> = self.deployments.lock().unwrap().clone();
    if let Some(q) = search {
      let q = q.to_lowercase();
      rows.retain(|d| d.token_name.to_lowercase().contains(&q) || d.token_symbol.to_lowercase().contains(&q));
    }
    rows.sort_by(|a, b| {
      b.deployment_block_number
        .cmp(&a.deployment_block_number)
        .then_with(|| a.deployment_tx_hash.cmp(&b.deployment_tx_hash))
    });
    Ok(
      rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect(),
    )
  }
}

#[async_trait]
impl FundStore for MemoryStore {
  async fn insert_fund_strategy(&self, strategy: Value) -> Result<FundStrategy, StoreError> {
    let mut rows = self.strategies.lock().unwrap();
    let saved = FundStrategy {
      id: Uuid::from_u128(rows.len() as u128 + 1),
      strategy,
      created_at: Utc::now(),
    };
    rows.push(saved.clone());
    Ok(saved)
  }

  async fn latest_fund_strategy(&self) -> Result<Option<FundStrategy>, StoreError> {
    Ok(self.strategies.lock().unwrap().last().cloned())
  }
}

pub struct FakePrices {
  pub healthy: bool,
}

#[async_trait]
impl PriceClient for FakePrices {
  async fn fetch_pair(&self, _pool_id: &str) -> Result<MarketData, UpstreamError> {
    if !self.healthy {
      return Err(UpstreamError::Status(503));
    }
    Ok(MarketData {
      value_usd: Some("0.0123".to_owned()),
      value_in_base_token: Some("0.0000041".to_owned()),
      volume_usd_24h: Some(1500.0),
      volume_usd_6h: Some(400.0),
      volume_usd_1h: Some(50.0),
      volume_usd_5m: Some(1.5),
      price_change_percentage_24h: Some(-4.2),
      fdv: Some(123000.0),
      market_cap: Some(120000.0),
      dexscreener_url: Some("https://dexscreener.com/base/0xabc".to_owned()),
    })
  }
}

pub struct FakeBalances;

#[async_trait]
impl BalanceClient for FakeBalances {
  async fn fetch_balances(&self, wallet_address: &str, chain_id: u64) -> Result<BalancesResponse, UpstreamError> {
    assert_eq!(chain_id, 8453);
    Ok(serde_json::from_value(json!({
      "wallet_address": wallet_address,
      "balances": [
        { "address": USDC, "symbol": "USDC", "value_usd": 250.0 },
        { "address": "native", "symbol": "ETH", "value_usd": 50.5 },
        { "address": token_address(7), "symbol": "ALEX", "value_usd": 12.25 }
      ]
    }))
    .unwrap())
  }
}

pub struct FakeSessions;

#[async_trait]
impl SessionVerifier for FakeSessions {
  async fn verify(&self, token: &str) -> Result<bool, UpstreamError> {
    match token {
      GOOD_SESSION => Ok(true),
      "provider-down" => Err(UpstreamError::Status(500)),
      _ => Ok(false),
    }
  }
}

pub struct TestContext {
  pub store: Arc<MemoryStore>,
  pub chain: Arc<FakeChain>,
  pub state: AppState,
}

pub fn context(prices_healthy: bool) -> TestContext {
  let store = Arc::new(MemoryStore::default());
  let chain = Arc::new(FakeChain::default());
  let state = AppState {
    deployments: store.clone(),
    funds: store.clone(),
    chain: chain.clone(),
    prices: Arc::new(FakePrices { healthy: prices_healthy }),
    balances: Arc::new(FakeBalances),
    sessions: Arc::new(FakeSessions),
    settings: ServiceSettings {
      network: Network::Base,
      session_cookie: SESSION_COOKIE.to_owned(),
      backend_api_key: BACKEND_KEY.to_owned(),
      fund_manager_address: FUND_MANAGER.to_owned(),
      non_investable_tokens: vec![USDC.to_owned(), "native".to_owned()],
    },
  };
  TestContext { store, chain, state }
}
