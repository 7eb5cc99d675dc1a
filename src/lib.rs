#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod classifier;
pub mod error;
pub mod invocation;
pub mod parse;
pub mod results;
pub mod rpc;
pub mod selector;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classifier::{LineKind, LogLine, classify};
pub use error::Error;
pub use invocation::{
    Anomaly, BuiltContexts, ContextBuilder, InvocationContext, InvocationStatus, STREAM_END_REASON,
};
pub use parse::{parse_basic, parse_full};
pub use results::{ParsedLogResult, TransactionMeta, build_results};
pub use rpc::{
    RpcLogsNotification, RpcLogsValue, RpcResult, from_logs_value, from_rpc_notification,
    from_rpc_result, parse_logs_from_json,
};
pub use selector::{ProgramSelector, filter_roots};
