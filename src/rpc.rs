//! Boundary adapters for the two payload shapes upstream collaborators hand
//! us: the bare `logsSubscribe` value (`{signature, err, logs}` plus a slot)
//! and the full websocket notification envelope. Each decodes once into the
//! typed core; the core never sees loosely-typed values.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::parse::parse_full;
use crate::results::ParsedLogResult;
use crate::selector::ProgramSelector;

/// The `value` part of a `logsSubscribe` notification.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLogsValue {
    pub signature: String,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    pub logs: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcContext {
    pub slot: u64,
    #[serde(default)]
    pub api_version: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResult {
    pub context: RpcContext,
    pub value: RpcLogsValue,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcParams {
    pub result: RpcResult,
    pub subscription: i64,
}

/// Full websocket notification envelope as sent by `logsSubscribe`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcLogsNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: RpcParams,
}

// The RPC error field is an arbitrary JSON value; render it the way the
// transaction-status Display does for strings, verbatim JSON otherwise.
fn err_to_string(err: Option<&serde_json::Value>) -> String {
    match err {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Parses the logs carried by a `logsSubscribe` value, with the slot supplied
/// separately.
pub fn from_logs_value(
    value: &RpcLogsValue,
    slot: u64,
    selector: &ProgramSelector,
) -> Vec<ParsedLogResult> {
    parse_full(
        &value.logs,
        selector,
        &err_to_string(value.err.as_ref()),
        slot,
        &value.signature,
    )
}

/// Parses the logs carried by a bare `{context, value}` RPC result, the
/// generic response shape without the jsonrpc envelope.
pub fn from_rpc_result(result: &RpcResult, selector: &ProgramSelector) -> Vec<ParsedLogResult> {
    from_logs_value(&result.value, result.context.slot, selector)
}

/// Parses the logs carried by a full websocket notification envelope.
pub fn from_rpc_notification(
    notification: &RpcLogsNotification,
    selector: &ProgramSelector,
) -> Vec<ParsedLogResult> {
    from_rpc_result(&notification.params.result, selector)
}

/// Decodes a raw notification payload and parses it. Malformed payloads fail
/// the whole call with [`Error::Json`]; no partial result is produced.
pub fn parse_logs_from_json(
    payload: &str,
    selector: &ProgramSelector,
) -> Result<Vec<ParsedLogResult>, Error> {
    let notification: RpcLogsNotification = serde_json::from_str(payload)?;
    Ok(from_rpc_notification(&notification, selector))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::invocation::InvocationStatus;

    const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";

    fn logs_value() -> RpcLogsValue {
        RpcLogsValue {
            signature: "pF5oPR8R4vJwU2KeQm8BAAGYcTiikZkpJAmP8TuuVztk".to_string(),
            err: None,
            logs: vec![
                format!("Program {SYSTEM_PROGRAM} invoke [1]"),
                format!("Program {SYSTEM_PROGRAM} success"),
            ],
        }
    }

    #[test]
    fn from_logs_value_merges_slot_and_signature() {
        let results = from_logs_value(&logs_value(), 323_432, &ProgramSelector::new_all_programs());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slot, Some(323_432));
        assert_eq!(
            results[0].signature.as_deref(),
            Some("pF5oPR8R4vJwU2KeQm8BAAGYcTiikZkpJAmP8TuuVztk")
        );
        assert_eq!(results[0].transaction_error, None);
        assert_eq!(
            results[0].context.as_ref().unwrap().status,
            InvocationStatus::Success
        );
    }

    #[test]
    fn structured_err_is_rendered_as_json() {
        let value = RpcLogsValue {
            err: Some(serde_json::json!({"InstructionError": [0, "Custom"]})),
            ..logs_value()
        };
        let results = from_logs_value(&value, 1, &ProgramSelector::new_all_programs());
        assert_eq!(
            results[0].transaction_error.as_deref(),
            Some(r#"{"InstructionError":[0,"Custom"]}"#)
        );
    }

    #[test]
    fn from_rpc_result_uses_context_slot() {
        let result = RpcResult {
            context: RpcContext {
                slot: 12_324,
                api_version: None,
            },
            value: logs_value(),
        };
        let results = from_rpc_result(&result, &ProgramSelector::new_all_programs());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slot, Some(12_324));
        assert_eq!(
            results[0].signature.as_deref(),
            Some("pF5oPR8R4vJwU2KeQm8BAAGYcTiikZkpJAmP8TuuVztk")
        );
    }

    #[test]
    fn parse_logs_from_json_full_envelope() {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "logsNotification",
            "params": {
                "result": {
                    "context": { "slot": 5_208_469, "apiVersion": "1.18.0" },
                    "value": {
                        "signature": "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqRYdtRwHi2E9HussGPVLr5nxc",
                        "err": null,
                        "logs": [
                            format!("Program {SYSTEM_PROGRAM} invoke [1]"),
                            format!("Program {SYSTEM_PROGRAM} success"),
                        ]
                    }
                },
                "subscription": 24_040
            }
        })
        .to_string();

        let results =
            parse_logs_from_json(&payload, &ProgramSelector::new_all_programs()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slot, Some(5_208_469));
    }

    #[test]
    fn malformed_payload_is_a_single_error() {
        let result = parse_logs_from_json("{\"params\": 12}", &ProgramSelector::new_all_programs());
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
