use tracing::trace;

use crate::invocation::ContextBuilder;
use crate::results::{ParsedLogResult, TransactionMeta, build_results};
use crate::selector::{ProgramSelector, filter_roots};

/// Structural parsing only: classify, fold into invocation trees, filter.
/// No transaction metadata is attached.
pub fn parse_basic(logs: &[String], selector: &ProgramSelector) -> Vec<ParsedLogResult> {
    run(logs, selector, None)
}

/// Full pipeline: structural parsing plus transaction metadata merge. An
/// empty `transaction_error` means the transaction landed cleanly; a
/// non-empty one is attached to every result record unconditionally, since
/// it is transaction-wide rather than invocation-scoped.
pub fn parse_full(
    logs: &[String],
    selector: &ProgramSelector,
    transaction_error: &str,
    slot: u64,
    signature: &str,
) -> Vec<ParsedLogResult> {
    let meta = TransactionMeta {
        slot,
        signature: signature.to_string(),
        error: (!transaction_error.is_empty()).then(|| transaction_error.to_string()),
    };
    run(logs, selector, Some(&meta))
}

fn run(
    logs: &[String],
    selector: &ProgramSelector,
    meta: Option<&TransactionMeta>,
) -> Vec<ParsedLogResult> {
    if logs.is_empty() {
        trace!("logs are empty, returning empty vec");
        return Vec::new();
    }

    let built = ContextBuilder::process_all(logs);
    let roots = filter_roots(built.roots, selector);
    build_results(roots, built.raw_unmatched, meta)
}
