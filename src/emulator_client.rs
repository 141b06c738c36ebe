/// Devnet Registry - Emulator Client
///
/// HTTP client for the local blockchain emulator, used to mint new accounts.
/// Supports mock mode for running without a live emulator process.

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default timeout for emulator calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default emulator URL (for reference only - use environment variable)
pub const DEFAULT_EMULATOR_URL: &str = "http://localhost:8080";

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmulatorError {
    /// HTTP request to the emulator failed
    RequestFailed(String),
    /// Emulator answered with something we could not use
    InvalidResponse(String),
}

impl std::fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmulatorError::RequestFailed(msg) => write!(f, "emulator request failed: {}", msg),
            EmulatorError::InvalidResponse(msg) => write!(f, "invalid emulator response: {}", msg),
        }
    }
}

impl std::error::Error for EmulatorError {}

// ============================================================================
// REQUEST/RESPONSE TYPES
// ============================================================================

/// Account creation response from the emulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub address: String,
}

// ============================================================================
// EMULATOR CLIENT
// ============================================================================

/// Client for the account-creation endpoint of the local emulator
pub struct EmulatorClient {
    /// Emulator endpoint URL
    endpoint_url: Option<String>,

    /// HTTP client
    client: Client,

    /// Whether we're in mock mode (no real emulator connection)
    mock_mode: bool,
}

impl EmulatorClient {
    /// Create a new EmulatorClient with explicit endpoint URL
    pub fn new(endpoint_url: Option<String>) -> Self {
        let mock_mode = endpoint_url.is_none();

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        EmulatorClient {
            endpoint_url,
            client,
            mock_mode,
        }
    }

    /// Create EmulatorClient from environment variable EMULATOR_URL
    pub fn from_env() -> Self {
        let endpoint_url = std::env::var("EMULATOR_URL").ok();
        Self::new(endpoint_url)
    }

    /// Check if connected to an emulator (not in mock mode)
    pub fn is_connected(&self) -> bool {
        !self.mock_mode
    }

    /// Check if in mock mode
    pub fn is_mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// Get the endpoint URL (if connected)
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Log connection status (call on startup)
    pub fn log_status(&self) {
        if self.mock_mode {
            info!("emulator: mock mode (EMULATOR_URL not set), minting local addresses");
        } else {
            info!(url = %self.endpoint_url.as_deref().unwrap_or(""), "emulator: connected");
        }
    }

    // ========================================================================
    // ACCOUNT CREATION
    // ========================================================================

    /// Create a new account and return its address.
    ///
    /// In mock mode: mints a unique local address without any network call.
    /// In live mode: calls the emulator's POST /accounts endpoint.
    pub async fn create_account(&self) -> Result<String, EmulatorError> {
        if self.mock_mode {
            return Ok(mint_local_address());
        }

        let url = format!("{}/accounts", self.endpoint_url.as_deref().unwrap_or(""));
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| EmulatorError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmulatorError::RequestFailed(format!(
                "emulator returned {}",
                response.status()
            )));
        }

        let created: CreateAccountResponse = response
            .json()
            .await
            .map_err(|e| EmulatorError::InvalidResponse(e.to_string()))?;

        if created.address.is_empty() {
            return Err(EmulatorError::InvalidResponse(
                "emulator returned an empty address".to_string(),
            ));
        }

        Ok(created.address)
    }
}

/// Mint a random local address in the emulator's format (0x + 8 bytes hex)
fn mint_local_address() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    format!("0x{}", hex::encode(bytes))
}

// ============================================================================
// TESTS
// ============================================================================
