// Data models for the devnet registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ===== METHOD PARAMETERS =====

#[derive(Debug, Deserialize)]
pub struct GetAccountParams {
    /// Assigned name of the account
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAccountsParams {
    /// Ordered (name, address) pairs
    pub accounts: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
pub struct GetContractAddressParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterContractAddressParams {
    pub name: String,
    pub address: String,
}

// ===== DISCOVERY METADATA =====

/// Descriptive half of a registered method, as rendered by /describe.
/// Carries no executable parts.
#[derive(Debug, Clone, Serialize)]
pub struct MethodDescriptor {
    pub description: &'static str,
    pub params: Vec<&'static str>,
    pub returns: Vec<&'static str>,
}

/// Parameter-shape metadata for one method. Purely descriptive, nothing
/// validates incoming requests against it.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDescriptor {
    pub description: &'static str,
    /// Property name -> (type tag, requirement tag)
    pub props: BTreeMap<&'static str, (&'static str, &'static str)>,
}
