use alloy_primitives::{b256, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic0 of the deployer's `TokenCreated` event.
pub const DEPLOYMENT_EVENT_TOPIC: B256 =
  b256!("9299d1d1a88d8e1abdc591ae7a167a6bc63a8f17d695804e9091ee33aa89fb67");

pub const DEFAULT_SESSION_COOKIE: &str = "privy-token";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
  Base,
  BaseSepolia,
}

impl Network {
  pub fn chain_id(&self) -> u64 {
    match *self {
      Network::Base => 8453,
      Network::BaseSepolia => 84532,
    }
  }
}

impl fmt::Display for Network {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Network::Base => write!(f, "base"),
      Network::BaseSepolia => write!(f, "base-sepolia"),
    }
  }
}
