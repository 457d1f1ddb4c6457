use diesel::pg::Pg;
use diesel::prelude::*;

use crate::models;
use crate::pagination::PageRequest;
use crate::utils;

/// Inserts a deployment unless one with the same transaction hash exists.
/// Returns the number of rows written, so 0 means the hash was already recorded.
pub fn insert_deployment(
  conn: &mut PgConnection,
  new_deployment: &models::NewTokenDeployment,
) -> Result<usize, diesel::result::Error> {
  // dsl imports stay function-scoped, column names collide across tables
  use crate::schema::token_deployments::dsl::*;

  diesel::insert_into(token_deployments)
    .values(new_deployment)
    .on_conflict(deployment_tx_hash)
    .do_nothing()
    .execute(conn)
}

pub fn find_deployment_by_tx_hash(
  conn: &mut PgConnection,
  hash: &str,
) -> Result<Option<models::TokenDeployment>, diesel::result::Error> {
  use crate::schema::token_deployments::dsl::*;

  token_deployments
    .filter(deployment_tx_hash.eq(hash))
    .select(models::TokenDeployment::as_select())
    .first(conn)
    .optional()
}

pub fn find_deployment_by_token_address(
  conn: &mut PgConnection,
  address: &str,
) -> Result<Option<models::TokenDeployment>, diesel::result::Error> {
  use crate::schema::token_deployments::dsl::*;

  token_deployments
    .filter(token_address.eq(address))
    .order(deployment_block_number.asc())
    .select(models::TokenDeployment::as_select())
    .first(conn)
    .optional()
}

/// Lists deployments newest block first, optionally filtered by a
/// case-insensitive match on token name or symbol.
pub fn fetch_deployments(
  conn: &mut PgConnection,
  page: &PageRequest,
  search: Option<&str>,
) -> Result<Vec<models::TokenDeployment>, diesel::result::Error> {
  use crate::schema::token_deployments::dsl::*;

  let mut query = token_deployments
    .select(models::TokenDeployment::as_select())
    .into_boxed::<Pg>();

  if let Some(search) = search {
    let pattern = format!("%{}%", utils::escape_like(search));
    query = query.filter(token_name.ilike(pattern.clone()).or(token_symbol.ilike(pattern)));
  }

  query
    .order(deployment_block_number.desc())
    .then_order_by(deployment_tx_hash.asc())
    .limit(page.limit())
    .offset(page.offset())
    .load(conn)
}

pub fn insert_fund_strategy(
  conn: &mut PgConnection,
  new_strategy: &models::NewFundStrategy,
) -> Result<models::FundStrategy, diesel::result::Error> {
  use crate::schema::fund_strategies::dsl::*;

  diesel::insert_into(fund_strategies)
    .values(new_strategy)
    .returning(models::FundStrategy::as_returning())
    .get_result(conn)
}

pub fn latest_fund_strategy(
  conn: &mut PgConnection,
) -> Result<Option<models::FundStrategy>, diesel::result::Error> {
  use crate::schema::fund_strategies::dsl::*;

  fund_strategies
    .order(created_at.desc())
    .select(models::FundStrategy::as_select())
    .first(conn)
    .optional()
}
