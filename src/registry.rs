// Method registry
//
// The canonical list of invocable operations. Dispatch looks methods up by
// wire name and runs them through one uniform execute signature, discovery
// renders their descriptors. The registry itself holds no state, every
// executor works against the shared AppState handed in by the dispatcher.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::app_state::SharedState;
use crate::emulator_client::EmulatorError;
use crate::models::{
    AddAccountsParams, GetAccountParams, GetContractAddressParams, MethodDescriptor,
    RegisterContractAddressParams, TypeDescriptor,
};

// ===== ERRORS =====

/// Failure inside an executor. The dispatcher treats any of these as fatal
/// for the whole request, matching the behavior of an uncaught throw.
#[derive(Debug)]
pub enum MethodError {
    /// Parameter object did not match the method's expected shape
    BadParams {
        method: &'static str,
        detail: String,
    },
    /// Account creation through the emulator failed
    Emulator(EmulatorError),
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodError::BadParams { method, detail } => {
                write!(f, "bad params for {}: {}", method, detail)
            }
            MethodError::Emulator(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MethodError {}

impl From<EmulatorError> for MethodError {
    fn from(err: EmulatorError) -> Self {
        MethodError::Emulator(err)
    }
}

// ===== METHODS =====

/// One variant per invocable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Purge,
    GetAccount,
    AddAccounts,
    ListAccounts,
    GetContractAddress,
    RegisterContractAddress,
    ListContracts,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Purge,
        Method::GetAccount,
        Method::AddAccounts,
        Method::ListAccounts,
        Method::GetContractAddress,
        Method::RegisterContractAddress,
        Method::ListContracts,
    ];

    /// Look a method up by its wire name
    pub fn from_name(name: &str) -> Option<Method> {
        match name {
            "purge" => Some(Method::Purge),
            "getAccount" => Some(Method::GetAccount),
            "addAccounts" => Some(Method::AddAccounts),
            "listAccounts" => Some(Method::ListAccounts),
            "getContractAddress" => Some(Method::GetContractAddress),
            "registerContractAddress" => Some(Method::RegisterContractAddress),
            "listContracts" => Some(Method::ListContracts),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Purge => "purge",
            Method::GetAccount => "getAccount",
            Method::AddAccounts => "addAccounts",
            Method::ListAccounts => "listAccounts",
            Method::GetContractAddress => "getContractAddress",
            Method::RegisterContractAddress => "registerContractAddress",
            Method::ListContracts => "listContracts",
        }
    }

    pub fn descriptor(&self) -> MethodDescriptor {
        match self {
            Method::Purge => MethodDescriptor {
                description: "drop every stored account and contract binding",
                params: vec![],
                returns: vec!["status"],
            },
            Method::GetAccount => MethodDescriptor {
                description: "resolve an account name to its address, creating the account if unseen",
                params: vec!["name: assigned name of the account"],
                returns: vec!["address"],
            },
            Method::AddAccounts => MethodDescriptor {
                description: "bulk-register accounts that already have addresses",
                params: vec!["accounts: array of [name, address] pairs"],
                returns: vec!["status"],
            },
            Method::ListAccounts => MethodDescriptor {
                description: "list every registered account",
                params: vec![],
                returns: vec!["accounts"],
            },
            Method::GetContractAddress => MethodDescriptor {
                description: "address of a deployed contract, null when unknown",
                params: vec!["name: name of the contract"],
                returns: vec!["address"],
            },
            Method::RegisterContractAddress => MethodDescriptor {
                description: "bind a deployed contract name to its address",
                params: vec![
                    "name: name of the contract",
                    "address: address where the contract is deployed",
                ],
                returns: vec!["status"],
            },
            Method::ListContracts => MethodDescriptor {
                description: "list every registered contract address",
                params: vec![],
                returns: vec!["contracts"],
            },
        }
    }

    /// Run this method against the shared state.
    ///
    /// No-arg methods ignore whatever parameter object arrived. Methods with
    /// parameters reject a mismatched shape with BadParams, which fails the
    /// whole request at the dispatcher.
    pub async fn execute(&self, state: &SharedState, params: Value) -> Result<Value, MethodError> {
        match self {
            Method::Purge => {
                let mut state = state.lock().await;
                Ok(json!(state.purge()))
            }
            Method::GetAccount => {
                let params: GetAccountParams = parse_params(self.name(), params)?;
                let mut state = state.lock().await;
                let address = state.account_by_name(&params.name).await?;
                Ok(json!(address))
            }
            Method::AddAccounts => {
                let params: AddAccountsParams = parse_params(self.name(), params)?;
                let mut state = state.lock().await;
                Ok(json!(state.add_accounts(&params.accounts)))
            }
            Method::ListAccounts => {
                let state = state.lock().await;
                Ok(json!(state.list_accounts()))
            }
            Method::GetContractAddress => {
                let params: GetContractAddressParams = parse_params(self.name(), params)?;
                let state = state.lock().await;
                match state.contract_by_name(&params.name) {
                    Some(address) => Ok(json!(address)),
                    None => Ok(Value::Null),
                }
            }
            Method::RegisterContractAddress => {
                let params: RegisterContractAddressParams = parse_params(self.name(), params)?;
                let mut state = state.lock().await;
                Ok(json!(state.store_contract(&params.name, &params.address)))
            }
            Method::ListContracts => {
                let state = state.lock().await;
                Ok(json!(state.list_contracts()))
            }
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    method: &'static str,
    params: Value,
) -> Result<T, MethodError> {
    serde_json::from_value(params).map_err(|e| MethodError::BadParams {
        method,
        detail: e.to_string(),
    })
}

// ===== DISCOVERY =====

/// Every method descriptor keyed by wire name, for /describe
pub fn describe_methods() -> BTreeMap<&'static str, MethodDescriptor> {
    Method::ALL
        .iter()
        .map(|method| (method.name(), method.descriptor()))
        .collect()
}

/// Parameter-shape metadata keyed by wire name, for /describe
pub fn describe_types() -> BTreeMap<&'static str, TypeDescriptor> {
    let mut types = BTreeMap::new();

    types.insert(
        Method::Purge.name(),
        TypeDescriptor {
            description: "drop every stored account and contract binding",
            props: BTreeMap::new(),
        },
    );
    types.insert(
        Method::GetAccount.name(),
        TypeDescriptor {
            description: "resolve an account name to its address, creating the account if unseen",
            props: BTreeMap::from([("name", ("string", "required"))]),
        },
    );
    types.insert(
        Method::AddAccounts.name(),
        TypeDescriptor {
            description: "bulk-register accounts that already have addresses",
            props: BTreeMap::from([("accounts", ("array", "required"))]),
        },
    );
    types.insert(
        Method::ListAccounts.name(),
        TypeDescriptor {
            description: "list every registered account",
            props: BTreeMap::new(),
        },
    );
    types.insert(
        Method::GetContractAddress.name(),
        TypeDescriptor {
            description: "address of a deployed contract by its name",
            props: BTreeMap::from([("name", ("string", "required"))]),
        },
    );
    types.insert(
        Method::RegisterContractAddress.name(),
        TypeDescriptor {
            description: "bind a deployed contract name to its address",
            props: BTreeMap::from([
                ("name", ("string", "required")),
                ("address", ("string", "required")),
            ]),
        },
    );
    types.insert(
        Method::ListContracts.name(),
        TypeDescriptor {
            description: "list every registered contract address",
            props: BTreeMap::new(),
        },
    );

    types
}
