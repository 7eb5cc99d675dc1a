use wasm_bindgen::prelude::*;

use crate::parse::{parse_basic, parse_full};
use crate::results::ParsedLogResult;
use crate::rpc;
use crate::selector::ProgramSelector;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

fn results_to_js(results: &[ParsedLogResult]) -> JsValue {
    match serde_json::to_value(results) {
        Ok(value) => to_js(&value),
        Err(_) => error_result("Failed to serialize results"),
    }
}

fn decode_strings(value: JsValue, what: &str) -> Result<Vec<String>, JsValue> {
    serde_wasm_bindgen::from_value::<Vec<String>>(value)
        .map_err(|_| error_result(&format!("Expected an array of strings for {what}")))
}

// JS numbers are doubles; a slot must survive the trip to u64 unchanged.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the guard admits only non-negative integral doubles"
)]
fn checked_slot(slot: f64) -> Option<u64> {
    (slot.is_finite() && slot >= 0.0 && slot.fract() == 0.0).then_some(slot as u64)
}

/// Structural parsing with no transaction metadata. `logs` and `program_ids`
/// are JS arrays of strings; `"*"` in `program_ids` selects all programs.
#[wasm_bindgen]
pub fn parse_logs_basic_js(logs: JsValue, program_ids: JsValue) -> JsValue {
    let logs = match decode_strings(logs, "logs") {
        Ok(v) => v,
        Err(err) => return err,
    };
    let program_ids = match decode_strings(program_ids, "program_ids") {
        Ok(v) => v,
        Err(err) => return err,
    };

    let selector = ProgramSelector::new(&program_ids);
    results_to_js(&parse_basic(&logs, &selector))
}

/// Full-mode parsing with transaction metadata. An absent or empty
/// `transaction_error` means the transaction landed cleanly.
#[wasm_bindgen]
pub fn parse_logs_js(
    logs: JsValue,
    program_ids: JsValue,
    transaction_error: Option<String>,
    slot: f64,
    signature: String,
) -> JsValue {
    let logs = match decode_strings(logs, "logs") {
        Ok(v) => v,
        Err(err) => return err,
    };
    let program_ids = match decode_strings(program_ids, "program_ids") {
        Ok(v) => v,
        Err(err) => return err,
    };

    let Some(slot) = checked_slot(slot) else {
        return error_result("Expected a non-negative integer for slot");
    };

    let selector = ProgramSelector::new(&program_ids);
    let results = parse_full(
        &logs,
        &selector,
        transaction_error.as_deref().unwrap_or(""),
        slot,
        &signature,
    );
    results_to_js(&results)
}

/// Parses a raw `logsSubscribe` websocket notification payload.
#[wasm_bindgen]
pub fn parse_rpc_notification_js(payload: &str, program_ids: JsValue) -> JsValue {
    let program_ids = match decode_strings(program_ids, "program_ids") {
        Ok(v) => v,
        Err(err) => return err,
    };

    let selector = ProgramSelector::new(&program_ids);
    match rpc::parse_logs_from_json(payload, &selector) {
        Ok(results) => results_to_js(&results),
        Err(err) => error_result(&err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::checked_slot;

    #[test]
    fn checked_slot_accepts_only_integral_non_negative_doubles() {
        assert_eq!(checked_slot(0.0), Some(0));
        assert_eq!(checked_slot(219_907_401.0), Some(219_907_401));
        assert_eq!(checked_slot(-1.0), None);
        assert_eq!(checked_slot(0.5), None);
        assert_eq!(checked_slot(f64::NAN), None);
        assert_eq!(checked_slot(f64::INFINITY), None);
    }
}
