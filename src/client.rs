/// Devnet Registry - Client SDK
///
/// Typed wrapper around the registry's HTTP surface, one call per method.
/// Meant for test harnesses and tooling that talk to a running registry.

use reqwest::Client;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default timeout for registry calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default registry URL when REGISTRY_URL is not set
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:9090";

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub enum ClientError {
    /// HTTP transport failed or the registry answered a non-success status
    RequestFailed(String),
    /// Response body did not have the expected shape
    InvalidResponse(String),
    /// The registry answered with a per-method error object
    Rpc(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::RequestFailed(msg) => write!(f, "registry request failed: {}", msg),
            ClientError::InvalidResponse(msg) => write!(f, "invalid registry response: {}", msg),
            ClientError::Rpc(msg) => write!(f, "registry rpc error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

// ============================================================================
// REGISTRY CLIENT
// ============================================================================

pub struct RegistryClient {
    base_url: String,
    http: Client,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        RegistryClient {
            base_url: base_url.into(),
            http,
        }
    }

    /// Create a client from the REGISTRY_URL environment variable
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("REGISTRY_URL").unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke one method and pull its result out from under its own key
    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let mut payload = Map::new();
        payload.insert(method.to_string(), params);

        let response = self
            .http
            .post(format!("{}/rpc", self.base_url))
            .json(&Value::Object(payload))
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::RequestFailed(format!(
                "registry returned {}",
                response.status()
            )));
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let result = body
            .get_mut(method)
            .map(Value::take)
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!("response carries no {} key", method))
            })?;

        if let Some(message) = result.get("error").and_then(Value::as_str) {
            return Err(ClientError::Rpc(message.to_string()));
        }

        Ok(result)
    }

    // ========================================================================
    // METHOD WRAPPERS
    // ========================================================================

    /// Drop every account and contract binding on the registry
    pub async fn purge(&self) -> Result<bool, ClientError> {
        let result = self.call("purge", json!({})).await?;
        result
            .as_bool()
            .ok_or_else(|| ClientError::InvalidResponse("purge did not return a bool".to_string()))
    }

    /// Resolve a name to an account address, creating the account if unseen
    pub async fn get_account(&self, name: &str) -> Result<String, ClientError> {
        let result = self.call("getAccount", json!({ "name": name })).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::InvalidResponse("getAccount did not return an address".to_string())
            })
    }

    /// Bulk-register accounts with known addresses
    pub async fn add_accounts(&self, pairs: &[(String, String)]) -> Result<bool, ClientError> {
        let result = self
            .call("addAccounts", json!({ "accounts": pairs }))
            .await?;
        result.as_bool().ok_or_else(|| {
            ClientError::InvalidResponse("addAccounts did not return a bool".to_string())
        })
    }

    /// Full name -> address map of registered accounts
    pub async fn list_accounts(&self) -> Result<HashMap<String, String>, ClientError> {
        let result = self.call("listAccounts", json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Contract address by name, None when the registry has never seen it
    pub async fn get_contract_address(&self, name: &str) -> Result<Option<String>, ClientError> {
        let result = self
            .call("getContractAddress", json!({ "name": name }))
            .await?;
        match result {
            Value::Null => Ok(None),
            Value::String(address) => Ok(Some(address)),
            other => Err(ClientError::InvalidResponse(format!(
                "getContractAddress returned {}",
                other
            ))),
        }
    }

    /// Bind a contract name to the address it was deployed at
    pub async fn register_contract_address(
        &self,
        name: &str,
        address: &str,
    ) -> Result<bool, ClientError> {
        let result = self
            .call(
                "registerContractAddress",
                json!({ "name": name, "address": address }),
            )
            .await?;
        result.as_bool().ok_or_else(|| {
            ClientError::InvalidResponse(
                "registerContractAddress did not return a bool".to_string(),
            )
        })
    }

    /// Full name -> address map of registered contracts
    pub async fn list_contracts(&self) -> Result<HashMap<String, String>, ClientError> {
        let result = self.call("listContracts", json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Fetch the registry's self-description
    pub async fn describe(&self) -> Result<Value, ClientError> {
        let response = self
            .http
            .get(format!("{}/describe", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::RequestFailed(format!(
                "registry returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_base_url() {
        let client = RegistryClient::new("http://localhost:9090");
        assert_eq!(client.base_url(), "http://localhost:9090");
    }
}
