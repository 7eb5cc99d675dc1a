use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::invocation::InvocationContext;

/// Transaction-scoped metadata supplied alongside the log lines in full mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMeta {
    pub slot: u64,
    pub signature: String,
    /// Transaction-level error, `None` when the transaction landed cleanly.
    /// Does not decide any invocation's status — that stays per-line.
    pub error: Option<String>,
}

/// One self-contained output record: either a retained top-level invocation
/// (with its whole subtree) or the trailing bucket of lines attributable to
/// no invocation at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLogResult {
    pub program_id: Option<String>,
    pub context: Option<InvocationContext>,
    pub raw_unmatched: Vec<String>,
    pub transaction_error: Option<String>,
    pub slot: Option<u64>,
    pub signature: Option<String>,
}

impl ParsedLogResult {
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn has_errors(&self) -> bool {
        self.transaction_error.is_some()
            || self
                .context
                .as_ref()
                .is_some_and(|context| context.status.is_failed())
    }
}

/// Flattens retained roots plus the unmatched bucket into result records.
///
/// Slot, signature and transaction error are transaction-scoped, so each
/// record carries its own clone of them. Empty roots and empty unmatched
/// lines produce an empty sequence, not an error.
pub fn build_results(
    roots: Vec<InvocationContext>,
    raw_unmatched: Vec<String>,
    meta: Option<&TransactionMeta>,
) -> Vec<ParsedLogResult> {
    let transaction_error = meta.and_then(|m| m.error.clone());
    let slot = meta.map(|m| m.slot);
    let signature = meta.map(|m| m.signature.clone());

    let mut results: Vec<ParsedLogResult> = roots
        .into_iter()
        .map(|root| ParsedLogResult {
            program_id: Some(root.program_id.clone()),
            context: Some(root),
            raw_unmatched: Vec::new(),
            transaction_error: transaction_error.clone(),
            slot,
            signature: signature.clone(),
        })
        .collect();

    if !raw_unmatched.is_empty() {
        results.push(ParsedLogResult {
            program_id: None,
            context: None,
            raw_unmatched,
            transaction_error,
            slot,
            signature,
        });
    }

    results
}
