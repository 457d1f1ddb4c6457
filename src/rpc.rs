use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use strum_macros::Display;

use crate::errors::ExtractionError;

#[derive(Display, Clone)]
pub enum RPCMethod {
  #[strum(serialize = "eth_getTransactionReceipt")]
  GetTransactionReceipt,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RPCRequest {
  id: i32,
  jsonrpc: String,
  method: String,
  params: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RPCErrorObject {
  pub code: i64,
  pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RPCResponse {
  pub id: Value,
  pub jsonrpc: String,
  #[serde(default)]
  pub result: Option<Value>,
  #[serde(default)]
  pub error: Option<RPCErrorObject>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TxLog {
  pub address: Address,
  pub topics: Vec<B256>,
  pub data: Bytes,
  #[serde(default)]
  pub log_index: Option<U64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
  pub transaction_hash: B256,
  pub block_number: U64,
  #[serde(default)]
  pub status: Option<U64>,
  pub logs: Vec<TxLog>,
}

/// Source of transaction receipts.
#[async_trait]
pub trait ChainClient: Send + Sync {
  async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<TxReceipt, ExtractionError>;
}

#[derive(Clone)]
pub struct EvmRpcClient {
  rpc_url: Url,
  http_client: Client,
}

impl EvmRpcClient {
  pub fn new(rpc_url: Url, timeout: Duration) -> Result<EvmRpcClient, reqwest::Error> {
    let http_client = Client::builder().timeout(timeout).build()?;
    Ok(Self { rpc_url, http_client })
  }

  pub async fn rpc_call(&self, rpc_method: RPCMethod, params: Vec<Value>) -> Result<Option<Value>, ExtractionError> {
    let method = rpc_method.to_string();
    trace!("call {} {}", method, self.rpc_url);

    let request = RPCRequest {
      id: 1,
      jsonrpc: "2.0".to_string(),
      method,
      params,
    };

    let resp = self.http_client.post(self.rpc_url.clone()).json(&request).send().await?;
    let rpc_response: RPCResponse = resp.error_for_status()?.json().await?;
    trace!("response {:?}", rpc_response);

    if let Some(err) = rpc_response.error {
      return Err(ExtractionError::Rpc { code: err.code, message: err.message });
    }
    Ok(rpc_response.result.filter(|v| !v.is_null()))
  }
}

#[async_trait]
impl ChainClient for EvmRpcClient {
  async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<TxReceipt, ExtractionError> {
    let result = self
      .rpc_call(RPCMethod::GetTransactionReceipt, vec![Value::String(tx_hash.to_owned())])
      .await?
      .ok_or_else(|| ExtractionError::ReceiptNotFound(tx_hash.to_owned()))?;
    serde_json::from_value(result).map_err(|e| ExtractionError::Decode(format!("malformed receipt: {}", e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn method_names() {
    assert_eq!(RPCMethod::GetTransactionReceipt.to_string(), "eth_getTransactionReceipt");
  }

  #[test]
  fn parses_node_receipt() {
    let raw = json!({
      "transactionHash": "0x6b1d5c2c1a9b0f4f0ee0b3c4dbe4dbbf1f5f3d7a3b2f3f9e2c0c9e4b8f1a2b3c",
      "blockNumber": "0x1f4a3c2",
      "status": "0x1",
      "logs": [{
        "address": "0xE85A59c628F7d27878ACeB4bf3b35733630083a9",
        "topics": ["0x9299d1d1a88d8e1abdc591ae7a167a6bc63a8f17d695804e9091ee33aa89fb67"],
        "data": "0x",
        "logIndex": "0x3"
      }]
    });
    let receipt: TxReceipt = serde_json::from_value(raw).unwrap();
    assert_eq!(receipt.block_number.to::<u64>(), 0x1f4a3c2);
    assert_eq!(receipt.logs.len(), 1);
    assert_eq!(receipt.logs[0].log_index, Some(U64::from(3u64)));
  }
}
