//! Diesel does not support tokio, so the Postgres store runs its queries on the
//! blocking thread pool via `web::block`, the same as a handler would.

use actix_web::web;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

use crate::db;
use crate::errors::StoreError;
use crate::models::{FundStrategy, NewFundStrategy, NewTokenDeployment, TokenDeployment};
use crate::pagination::PageRequest;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  Duplicate,
}

#[async_trait]
pub trait DeploymentStore: Send + Sync {
  /// Atomically inserts the record unless its transaction hash is already stored.
  async fn insert_deployment(&self, record: NewTokenDeployment) -> Result<InsertOutcome, StoreError>;

  async fn find_by_tx_hash(&self, tx_hash: &str) -> Result<Option<TokenDeployment>, StoreError>;

  async fn find_by_token_address(&self, token_address: &str) -> Result<Option<TokenDeployment>, StoreError>;

  /// Newest block first. `search` filters by token name or symbol.
  async fn list_deployments(&self, page: PageRequest, search: Option<String>) -> Result<Vec<TokenDeployment>, StoreError>;
}

#[async_trait]
pub trait FundStore: Send + Sync {
  async fn insert_fund_strategy(&self, strategy: Value) -> Result<FundStrategy, StoreError>;

  async fn latest_fund_strategy(&self) -> Result<Option<FundStrategy>, StoreError>;
}

/// Rows written by a conflict-ignoring insert. Zero rows, or a unique
/// violation from a racing writer, both mean the hash is already stored.
fn insert_outcome(result: Result<usize, StoreError>) -> Result<InsertOutcome, StoreError> {
  match result {
    Ok(0) => Ok(InsertOutcome::Duplicate),
    Ok(_) => Ok(InsertOutcome::Inserted),
    Err(StoreError::Query(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))) => {
      Ok(InsertOutcome::Duplicate)
    }
    Err(err) => Err(err),
  }
}

#[derive(Clone)]
pub struct PgStore {
  pool: DbPool,
}

impl PgStore {
  pub fn new(pool: DbPool) -> Self {
    PgStore { pool }
  }

  async fn run<F, R>(&self, query: F) -> Result<R, StoreError>
  where
    F: FnOnce(&mut PgConnection) -> Result<R, DieselError> + Send + 'static,
    R: Send + 'static,
  {
    let pool = self.pool.clone();
    web::block(move || {
      let mut conn = pool.get()?;
      query(&mut conn).map_err(StoreError::from)
    })
    .await?
  }
}

#[async_trait]
impl DeploymentStore for PgStore {
  async fn insert_deployment(&self, record: NewTokenDeployment) -> Result<InsertOutcome, StoreError> {
    let tx_hash = record.deployment_tx_hash.clone();
    let outcome = insert_outcome(self.run(move |conn| db::insert_deployment(conn, &record)).await)?;
    if outcome == InsertOutcome::Duplicate {
      debug!("Ignoring duplicate deployment entry {}", tx_hash);
    }
    Ok(outcome)
  }

  async fn find_by_tx_hash(&self, tx_hash: &str) -> Result<Option<TokenDeployment>, StoreError> {
    let tx_hash = tx_hash.to_owned();
    self.run(move |conn| db::find_deployment_by_tx_hash(conn, &tx_hash)).await
  }

  async fn find_by_token_address(&self, token_address: &str) -> Result<Option<TokenDeployment>, StoreError> {
    let token_address = token_address.to_owned();
    self.run(move |conn| db::find_deployment_by_token_address(conn, &token_address)).await
  }

  async fn list_deployments(&self, page: PageRequest, search: Option<String>) -> Result<Vec<TokenDeployment>, StoreError> {
    self.run(move |conn| db::fetch_deployments(conn, &page, search.as_deref())).await
  }
}

#[async_trait]
impl FundStore for PgStore {
  async fn insert_fund_strategy(&self, strategy: Value) -> Result<FundStrategy, StoreError> {
    self.run(move |conn| db::insert_fund_strategy(conn, &NewFundStrategy { strategy })).await
  }

  async fn latest_fund_strategy(&self) -> Result<Option<FundStrategy>, StoreError> {
    self.run(db::latest_fund_strategy).await
  }
}
