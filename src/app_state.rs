// Application state management
//
// The registry's only state: two in-memory name -> address maps, one for
// emulator accounts and one for deployed contracts. State lives for the
// lifetime of the process and is never persisted.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::emulator_client::{EmulatorClient, EmulatorError};

pub type SharedState = Arc<Mutex<AppState>>;

pub struct AppState {
    pub accounts: HashMap<String, String>,
    pub contracts: HashMap<String, String>,
    emulator: EmulatorClient,
}

impl AppState {
    pub fn new(emulator: EmulatorClient) -> Self {
        Self {
            accounts: HashMap::new(),
            contracts: HashMap::new(),
            emulator,
        }
    }

    /// Build state with the emulator client configured from the environment
    pub fn from_env() -> Self {
        let emulator = EmulatorClient::from_env();
        emulator.log_status();
        Self::new(emulator)
    }

    /// Resolve an account name to its address, creating the account through
    /// the emulator on first sight. A name keeps its address until purge.
    ///
    /// Callers hold the state lock across the creation await, so two
    /// concurrent requests for the same unseen name cannot both create.
    pub async fn account_by_name(&mut self, name: &str) -> Result<String, EmulatorError> {
        if let Some(address) = self.accounts.get(name) {
            return Ok(address.clone());
        }

        let address = self.emulator.create_account().await?;
        info!(name = %name, address = %address, "created new account");
        self.accounts.insert(name.to_string(), address.clone());
        Ok(address)
    }

    /// Bulk-register (name, address) pairs. No existence check, last write
    /// wins on duplicate names.
    pub fn add_accounts(&mut self, pairs: &[(String, String)]) -> bool {
        for (name, address) in pairs {
            self.accounts.insert(name.clone(), address.clone());
        }
        info!(count = pairs.len(), "registered accounts in bulk");
        true
    }

    /// Pure lookup, None when the contract was never registered
    pub fn contract_by_name(&self, name: &str) -> Option<String> {
        self.contracts.get(name).cloned()
    }

    /// Unconditional upsert of a contract address
    pub fn store_contract(&mut self, name: &str, address: &str) -> bool {
        self.contracts.insert(name.to_string(), address.to_string());
        info!(name = %name, address = %address, "registered contract");
        true
    }

    /// Snapshot of the accounts map. Mutating the returned map does not
    /// touch the store.
    pub fn list_accounts(&self) -> HashMap<String, String> {
        self.accounts.clone()
    }

    /// Snapshot of the contracts map
    pub fn list_contracts(&self) -> HashMap<String, String> {
        self.contracts.clone()
    }

    /// Drop every binding in both namespaces
    pub fn purge(&mut self) -> bool {
        self.accounts = HashMap::new();
        self.contracts = HashMap::new();
        info!("registry purged");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(EmulatorClient::new(None))
    }

    #[test]
    fn test_account_lookup_is_idempotent() {
        let mut state = test_state();

        let first = tokio_test::block_on(state.account_by_name("alice")).unwrap();
        let second = tokio_test::block_on(state.account_by_name("alice")).unwrap();

        assert_eq!(first, second);
        assert_eq!(state.accounts.len(), 1);
    }

    #[test]
    fn test_distinct_names_get_distinct_addresses() {
        let mut state = test_state();

        let alice = tokio_test::block_on(state.account_by_name("alice")).unwrap();
        let bob = tokio_test::block_on(state.account_by_name("bob")).unwrap();

        assert_ne!(alice, bob);
    }

    #[test]
    fn test_add_accounts_last_write_wins() {
        let mut state = test_state();

        let pairs = vec![
            ("alice".to_string(), "0x01".to_string()),
            ("bob".to_string(), "0x02".to_string()),
            ("alice".to_string(), "0x03".to_string()),
        ];
        assert!(state.add_accounts(&pairs));

        assert_eq!(state.accounts.len(), 2);
        assert_eq!(state.accounts["alice"], "0x03");
        assert_eq!(state.accounts["bob"], "0x02");
    }

    #[test]
    fn test_contract_lookup_absent_is_none() {
        let state = test_state();
        assert_eq!(state.contract_by_name("FungibleToken"), None);
    }

    #[test]
    fn test_store_and_lookup_contract() {
        let mut state = test_state();

        assert!(state.store_contract("FungibleToken", "0x01"));
        assert_eq!(
            state.contract_by_name("FungibleToken"),
            Some("0x01".to_string())
        );
    }

    #[test]
    fn test_listings_are_copies() {
        let mut state = test_state();
        state.store_contract("FungibleToken", "0x01");

        let mut listed = state.list_contracts();
        listed.insert("Intruder".to_string(), "0xff".to_string());

        assert_eq!(state.contracts.len(), 1);
        assert!(state.contract_by_name("Intruder").is_none());
    }

    #[test]
    fn test_purge_clears_both_namespaces() {
        let mut state = test_state();

        tokio_test::block_on(state.account_by_name("alice")).unwrap();
        state.store_contract("FungibleToken", "0x01");

        assert!(state.purge());
        assert!(state.list_accounts().is_empty());
        assert!(state.list_contracts().is_empty());
    }
}
