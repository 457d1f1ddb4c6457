use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::{self, SessionVerifier};
use crate::constants::{Network, API_KEY_HEADER};
use crate::deployment;
use crate::errors::ApiError;
use crate::models::FundAllocation;
use crate::pagination::{PageRequest, PaginationInfo};
use crate::portfolio::{self, BalanceClient};
use crate::price::{self, PriceClient};
use crate::rpc::ChainClient;
use crate::store::{DeploymentStore, FundStore, InsertOutcome};
use crate::utils;

/// Settings the handlers need at request time.
#[derive(Clone, Debug)]
pub struct ServiceSettings {
  pub network: Network,
  pub session_cookie: String,
  pub backend_api_key: String,
  pub fund_manager_address: String,
  pub non_investable_tokens: Vec<String>,
}

/// Clients shared by all workers, built once at start-up.
#[derive(Clone)]
pub struct AppState {
  pub deployments: Arc<dyn DeploymentStore>,
  pub funds: Arc<dyn FundStore>,
  pub chain: Arc<dyn ChainClient>,
  pub prices: Arc<dyn PriceClient>,
  pub balances: Arc<dyn BalanceClient>,
  pub sessions: Arc<dyn SessionVerifier>,
  pub settings: ServiceSettings,
}

#[derive(Deserialize)]
struct RecordDeploymentRequest {
  #[serde(alias = "deploymentTxHash")]
  deployment_tx_hash: Option<String>,
}

#[derive(Deserialize)]
struct SearchInfo {
  query: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .service(hello)
    .service(record_deployment)
    .service(get_deployments)
    .service(search_deployments)
    .service(get_deployment_by_tx_hash)
    .service(get_deployment)
    .service(save_fund_allocations)
    .service(get_latest_fund_allocations)
    .service(get_fund_portfolio);
}

/// Test endpoint.
#[get("/")]
async fn hello() -> impl Responder {
  HttpResponse::Ok().body("Hello builders!")
}

/// Records a token deployment from its transaction hash.
// steps:
// 1. verify the session cookie
// 2. fetch the receipt and decode the first deployment event
// 3. lower-case addresses into a row
// 4. insert, with the unique tx hash as the duplicate guard
#[post("/deployments")]
async fn record_deployment(
  req: HttpRequest,
  body: web::Bytes,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let token = req
    .cookie(&state.settings.session_cookie)
    .map(|c| c.value().to_owned())
    .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_owned()))?;
  match state.sessions.verify(&token).await {
    Ok(true) => (),
    Ok(false) => return Err(ApiError::Unauthorized("Invalid auth token".to_owned())),
    Err(e) => {
      warn!("session verification failed: {}", e);
      return Err(ApiError::Unauthorized("Invalid auth token".to_owned()));
    }
  }

  let request: RecordDeploymentRequest =
    serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid JSON".to_owned()))?;
  let raw_hash = request
    .deployment_tx_hash
    .filter(|h| !h.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("Deployment tx hash is required".to_owned()))?;
  let tx_hash = utils::normalize_tx_hash(&raw_hash)
    .ok_or_else(|| ApiError::BadRequest("Invalid deployment tx hash".to_owned()))?;

  let event = deployment::extract_deployment(state.chain.as_ref(), &tx_hash).await?;
  let record = event.into_record(state.settings.network, &tx_hash);
  let token_address = record.token_address.clone();

  match state.deployments.insert_deployment(record).await? {
    InsertOutcome::Inserted => {
      info!("Recorded deployment of {} from {}", token_address, tx_hash);
      Ok(HttpResponse::Ok().json(json!({ "success": true })))
    }
    InsertOutcome::Duplicate => {
      debug!("Rejected duplicate deployment {}", tx_hash);
      Err(ApiError::Duplicate)
    }
  }
}

/// Gets deployments, newest block first.
#[get("/deployments")]
async fn get_deployments(
  query: web::Query<PaginationInfo>,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let page = PageRequest::from(&*query);
  let deployments = state.deployments.list_deployments(page, None).await?;
  Ok(HttpResponse::Ok().json(deployments))
}

/// Searches deployments by token name or symbol.
#[get("/deployments/search")]
async fn search_deployments(
  query: web::Query<PaginationInfo>,
  filter: web::Query<SearchInfo>,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let page = PageRequest::from(&*query);
  let search = filter.query.as_ref().map(|q| q.trim().to_owned()).filter(|q| !q.is_empty());
  let deployments = state.deployments.list_deployments(page, search).await?;
  Ok(HttpResponse::Ok().json(deployments))
}

/// Gets the deployment recorded for a transaction hash.
#[get("/deployments/tx/{tx_hash}")]
async fn get_deployment_by_tx_hash(
  path: web::Path<String>,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let tx_hash = utils::normalize_tx_hash(&path.into_inner())
    .ok_or_else(|| ApiError::BadRequest("Invalid deployment tx hash".to_owned()))?;
  match state.deployments.find_by_tx_hash(&tx_hash).await? {
    Some(deployment) => Ok(HttpResponse::Ok().json(deployment)),
    None => Err(ApiError::NotFound("Deployment not found".to_owned())),
  }
}

/// Gets one token with live price data when available.
#[get("/deployments/{token_address}")]
async fn get_deployment(
  path: web::Path<String>,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let token_address = path.into_inner().trim().to_lowercase();
  let deployment = state
    .deployments
    .find_by_token_address(&token_address)
    .await?
    .ok_or_else(|| ApiError::NotFound("Token not found".to_owned()))?;

  let details = price::enrich(deployment, state.prices.as_ref()).await;
  Ok(HttpResponse::Ok().json(details))
}

/// Stores an allocation set from the fund manager backend.
#[post("/fund-allocations")]
async fn save_fund_allocations(
  req: HttpRequest,
  body: web::Bytes,
  state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
  let provided = req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
  if !auth::api_key_matches(provided, &state.settings.backend_api_key) {
    return Err(ApiError::Unauthorized("Unauthorized".to_owned()));
  }

  let strategy: Value = serde_json::from_slice(&body)
    .map_err(|_| ApiError::BadRequest("Invalid JSON in request body".to_owned()))?;
  let allocations: Vec<FundAllocation> = serde_json::from_value(strategy.clone())
    .map_err(|e| ApiError::BadRequest(format!("Invalid allocations: {}", e)))?;

  let saved = state.funds.insert_fund_strategy(strategy).await?;
  let total_percentage: f64 = allocations.iter().map(|a| a.allocation_percentage).sum();
  info!("Saved fund strategy {} with {} allocations", saved.id, allocations.len());

  Ok(HttpResponse::Ok().json(json!({
    "message": "Fund manager allocation saved successfully",
    "strategy_id": saved.id,
    "total_allocations": allocations.len(),
    "total_percentage": total_percentage,
    "created_at": saved.created_at,
  })))
}

/// Gets the most recent allocation set.
#[get("/fund-allocations/latest")]
async fn get_latest_fund_allocations(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  match state.funds.latest_fund_strategy().await? {
    Some(strategy) => Ok(HttpResponse::Ok().json(strategy)),
    None => Err(ApiError::NotFound("No fund allocations".to_owned())),
  }
}

/// Gets the fund manager wallet split into liquidity and builder coins.
#[get("/fund/portfolio")]
async fn get_fund_portfolio(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let settings = &state.settings;
  let response = state
    .balances
    .fetch_balances(&settings.fund_manager_address, settings.network.chain_id())
    .await?;
  Ok(HttpResponse::Ok().json(portfolio::summarize(response, &settings.non_investable_tokens)))
}
