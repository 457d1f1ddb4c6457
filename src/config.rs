use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::constants::{Network, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_COOKIE};
use crate::utils;

#[derive(Debug, Clone, Error)]
#[error("invalid config: {details}")]
pub struct InvalidConfigError {
  details: String,
}

pub trait Validate {
  fn validate(&self) -> Result<(), InvalidConfigError>;
}

#[derive(Deserialize, Debug, Clone)]
pub struct AuthConfig {
  pub verify_url: String,
  #[serde(default = "default_session_cookie")]
  pub session_cookie: String,
}

/// Non-secret service settings, read from the yaml config file.
#[derive(Deserialize, Debug, Clone)]
pub struct ServiceConfig {
  pub network: Network,
  pub rpc_url: String,
  pub price_api_url: String,
  pub balances_api_url: String,
  pub fund_manager_address: String,
  #[serde(default)]
  pub non_investable_tokens: Vec<String>,
  #[serde(default = "default_timeout")]
  pub request_timeout_secs: u64,
  pub auth: AuthConfig,
}

fn default_session_cookie() -> String {
  DEFAULT_SESSION_COOKIE.to_owned()
}

fn default_timeout() -> u64 {
  DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ServiceConfig {
  pub fn from_yaml(contents: &str) -> Result<ServiceConfig, InvalidConfigError> {
    let config: ServiceConfig = serde_yaml::from_str(contents)
      .map_err(|e| InvalidConfigError { details: e.to_string() })?;
    config.validate()?;
    Ok(config)
  }

  pub fn load<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, InvalidConfigError> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| InvalidConfigError {
      details: format!("cannot read {}: {}", path.as_ref().display(), e),
    })?;
    Self::from_yaml(&contents)
  }

  pub fn chain_id(&self) -> u64 {
    self.network.chain_id()
  }

  /// Non-investable token addresses in canonical lower-case.
  pub fn non_investable_tokens(&self) -> Vec<String> {
    self.non_investable_tokens.iter().map(|t| t.to_lowercase()).collect()
  }
}

impl Validate for ServiceConfig {
  fn validate(&self) -> Result<(), InvalidConfigError> {
    let mut errs = vec![];
    let urls = [
      ("rpc_url", &self.rpc_url),
      ("price_api_url", &self.price_api_url),
      ("balances_api_url", &self.balances_api_url),
      ("auth.verify_url", &self.auth.verify_url),
    ];
    for (name, url) in urls.iter() {
      if Url::parse(url).is_err() {
        errs.push(format!("{} is not a valid url", name))
      }
    }
    if !utils::is_address(&self.fund_manager_address) {
      errs.push("fund_manager_address must be a 0x prefixed 20 byte address".to_owned())
    }
    for token in self.non_investable_tokens.iter() {
      if token != "native" && !utils::is_address(token) {
        errs.push(format!("non_investable_tokens entry {} is not an address", token))
      }
    }
    if self.request_timeout_secs == 0 {
      errs.push("request_timeout_secs must be more than 0".to_owned())
    }
    if self.auth.session_cookie.is_empty() {
      errs.push("auth.session_cookie must not be empty".to_owned())
    }
    if errs.len() > 0 {
      Err(InvalidConfigError { details: errs.join("\n") })
    } else {
      Ok(())
    }
  }
}

/// Secrets and process settings, taken from the environment.
#[derive(Clone)]
pub struct Secrets {
  pub database_url: String,
  pub backend_api_key: String,
  pub balances_api_key: String,
}

impl Secrets {
  pub fn from_env() -> Result<Secrets, InvalidConfigError> {
    let var = |name: &str| {
      std::env::var(name).map_err(|_| InvalidConfigError { details: format!("{} env var missing", name) })
    };
    Ok(Secrets {
      database_url: var("DATABASE_URL")?,
      backend_api_key: var("BACKEND_API_KEY")?,
      balances_api_key: var("BALANCES_API_KEY")?,
    })
  }
}
