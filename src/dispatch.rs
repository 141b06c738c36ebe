// Request dispatcher
//
// Turns one raw /rpc body into a batch of method invocations and one
// combined response. Top-level JSON keys are method names, their values are
// the parameter objects. Results come back under the same keys.

use futures::future;
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use crate::app_state::SharedState;
use crate::registry::Method;

// ===== ERRORS =====

/// Request-level failures. Any of these aborts the request before or instead
/// of producing results, nothing is partially processed.
#[derive(Debug)]
pub enum DispatchError {
    /// Body was empty or missing
    NoData,
    /// Body was not a JSON object
    MalformedBody,
    /// An executor failed. Detail stays in the logs, clients get a generic
    /// message.
    Internal(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::NoData => write!(f, "rpc request was expecting some data"),
            DispatchError::MalformedBody => write!(f, "malformed request body"),
            DispatchError::Internal(_) => write!(f, "server error"),
        }
    }
}

impl std::error::Error for DispatchError {}

// ===== DISPATCH =====

/// Dispatch one request body.
///
/// Known methods run concurrently and settle together. An unknown method
/// name is data, not a failure: its slot in the response carries an error
/// object and the rest of the batch is unaffected. Methods inside one batch
/// are independent, nothing may rely on a sibling having run first.
pub async fn dispatch(state: &SharedState, body: &str) -> Result<Value, DispatchError> {
    if body.trim().is_empty() {
        return Err(DispatchError::NoData);
    }

    let parsed: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "request body is not valid JSON");
        DispatchError::MalformedBody
    })?;

    let Value::Object(calls) = parsed else {
        warn!("request body is not a JSON object");
        return Err(DispatchError::MalformedBody);
    };

    let invocations = calls.into_iter().map(|(name, params)| async move {
        match Method::from_name(&name) {
            Some(method) => method
                .execute(state, params)
                .await
                .map(|value| (name, value)),
            None => {
                warn!(method = %name, "unknown rpc method requested");
                Ok((name, json!({ "error": "method not defined" })))
            }
        }
    });

    let settled = future::try_join_all(invocations).await.map_err(|e| {
        error!(error = %e, "rpc method execution failed");
        DispatchError::Internal(e.to_string())
    })?;

    let mut response = Map::new();
    for (name, value) in settled {
        response.insert(name, value);
    }
    Ok(Value::Object(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::emulator_client::EmulatorClient;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn test_state() -> SharedState {
        Arc::new(Mutex::new(AppState::new(EmulatorClient::new(None))))
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let state = test_state();

        let result = tokio_test::block_on(dispatch(&state, ""));
        assert!(matches!(result, Err(DispatchError::NoData)));

        let result = tokio_test::block_on(dispatch(&state, "   \n"));
        assert!(matches!(result, Err(DispatchError::NoData)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let state = test_state();

        let result = tokio_test::block_on(dispatch(&state, "{not valid"));
        assert!(matches!(result, Err(DispatchError::MalformedBody)));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let state = test_state();

        for body in ["[1, 2, 3]", "\"listAccounts\"", "42", "null"] {
            let result = tokio_test::block_on(dispatch(&state, body));
            assert!(
                matches!(result, Err(DispatchError::MalformedBody)),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_response_mirrors_request_keys() {
        let state = test_state();

        let response = tokio_test::block_on(dispatch(
            &state,
            r#"{"purge": {}, "listAccounts": {}, "listContracts": {}}"#,
        ))
        .unwrap();

        let response = response.as_object().unwrap();
        assert_eq!(response.len(), 3);
        assert_eq!(response["purge"], json!(true));
        assert_eq!(response["listAccounts"], json!({}));
        assert_eq!(response["listContracts"], json!({}));
    }

    #[test]
    fn test_unknown_method_is_a_data_error() {
        let state = test_state();

        let response =
            tokio_test::block_on(dispatch(&state, r#"{"notARealMethod": {}}"#)).unwrap();

        assert_eq!(
            response["notARealMethod"],
            json!({ "error": "method not defined" })
        );
    }

    #[test]
    fn test_unknown_method_does_not_poison_the_batch() {
        let state = test_state();

        let response = tokio_test::block_on(dispatch(
            &state,
            r#"{"notARealMethod": {}, "registerContractAddress": {"name": "Vault", "address": "0x01"}}"#,
        ))
        .unwrap();

        assert_eq!(
            response["notARealMethod"],
            json!({ "error": "method not defined" })
        );
        assert_eq!(response["registerContractAddress"], json!(true));
    }

    #[test]
    fn test_executor_failure_fails_the_whole_request() {
        let state = test_state();

        // getAccount with a missing name is an executor-level throw
        let result = tokio_test::block_on(dispatch(
            &state,
            r#"{"getAccount": {}, "listAccounts": {}}"#,
        ));

        assert!(matches!(result, Err(DispatchError::Internal(_))));
    }

    #[test]
    fn test_batch_of_reads_settles_together() {
        let state = test_state();

        tokio_test::block_on(async {
            dispatch(
                &state,
                r#"{"registerContractAddress": {"name": "Vault", "address": "0x01"}}"#,
            )
            .await
            .unwrap();

            let response = dispatch(&state, r#"{"listAccounts": {}, "listContracts": {}}"#)
                .await
                .unwrap();

            assert_eq!(response["listAccounts"], json!({}));
            assert_eq!(response["listContracts"], json!({ "Vault": "0x01" }));
        });
    }
}
