#[macro_use]
extern crate log;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

use builders_fund_api::api::{self, AppState, ServiceSettings};
use builders_fund_api::auth::HttpSessionVerifier;
use builders_fund_api::config::{Secrets, ServiceConfig};
use builders_fund_api::constants::DEFAULT_BIND;
use builders_fund_api::portfolio::SimBalancesClient;
use builders_fund_api::price::DexScreenerClient;
use builders_fund_api::rpc::EvmRpcClient;
use builders_fund_api::store::PgStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn parse_url(name: &str, url: &str) -> Url {
  Url::parse(url).unwrap_or_else(|e| panic!("invalid {}: {}", name, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("builders_fund_api=info,actix_web=info"),
  )
  .init();
  let env_path = std::env::var("ENV_FILE").unwrap_or(String::from("./.env"));
  dotenv::from_path(env_path).ok();

  let config_path = std::env::var("CONFIG_FILE").unwrap_or(String::from("./config.yml"));
  let config = ServiceConfig::load(&config_path).expect("failed to load config");
  let secrets = Secrets::from_env().expect("missing secrets");
  info!("Loaded config from {} for {} (chain {})", config_path, config.network, config.chain_id());

  // set up database connection pool
  let manager = ConnectionManager::<PgConnection>::new(secrets.database_url.clone());
  let pool = r2d2::Pool::builder()
    .build(manager)
    .expect("Failed to create db pool.");

  // run migrations
  {
    let mut conn = pool.get().expect("couldn't get db connection from pool");
    conn.run_pending_migrations(MIGRATIONS).expect("failed to run migrations.");
  }

  let timeout = Duration::from_secs(config.request_timeout_secs);
  let store = Arc::new(PgStore::new(pool));
  let chain = EvmRpcClient::new(parse_url("rpc_url", &config.rpc_url), timeout)
    .expect("failed to build rpc client");
  let prices = DexScreenerClient::new(parse_url("price_api_url", &config.price_api_url), timeout)
    .expect("failed to build price client");
  let balances = SimBalancesClient::new(
    parse_url("balances_api_url", &config.balances_api_url),
    secrets.balances_api_key.clone(),
    timeout,
  )
  .expect("failed to build balances client");
  let sessions = HttpSessionVerifier::new(parse_url("auth.verify_url", &config.auth.verify_url), timeout)
    .expect("failed to build session verifier");

  let state = AppState {
    deployments: store.clone(),
    funds: store,
    chain: Arc::new(chain),
    prices: Arc::new(prices),
    balances: Arc::new(balances),
    sessions: Arc::new(sessions),
    settings: ServiceSettings {
      network: config.network,
      session_cookie: config.auth.session_cookie.clone(),
      backend_api_key: secrets.backend_api_key.clone(),
      fund_manager_address: config.fund_manager_address.to_lowercase(),
      non_investable_tokens: config.non_investable_tokens(),
    },
  };
  let data = web::Data::new(state);

  let bind = std::env::var("BIND").unwrap_or(String::from(DEFAULT_BIND));
  info!("Starting server at: {}", &bind);
  HttpServer::new(move || {
    App::new()
      .app_data(data.clone())
      .wrap(Logger::default())
      .wrap(Cors::permissive())
      .configure(api::configure)
  })
  .bind(bind)?
  .run()
  .await
}
