use std::sync::LazyLock;

use regex::Regex;

/// One raw log line, classified. Classification is total: every line maps to
/// exactly one variant, with [`LogLine::Unknown`] as the fallback, so no line
/// is ever dropped at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Invoke { program_id: String, depth: u32 },
    Success { program_id: String },
    Failed { program_id: String, reason: String },
    /// `"Program failed to complete: <err>"` — carries no program id and does
    /// not close a frame; the matching `Failed` line follows separately.
    FailedToComplete { reason: String },
    Log { text: String },
    Data { text: String },
    Consumed { program_id: String, used: u64, budget: u64 },
    /// `"Program return: <id> <base64>"`.
    Return { program_id: String, text: String },
    Truncated,
    Unknown { raw: String },
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum LineKind {
    Invoke,
    Success,
    Failed,
    FailedToComplete,
    Log,
    Data,
    Consumed,
    Return,
    Truncated,
    Unknown,
}

impl LogLine {
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Invoke { .. } => LineKind::Invoke,
            Self::Success { .. } => LineKind::Success,
            Self::Failed { .. } => LineKind::Failed,
            Self::FailedToComplete { .. } => LineKind::FailedToComplete,
            Self::Log { .. } => LineKind::Log,
            Self::Data { .. } => LineKind::Data,
            Self::Consumed { .. } => LineKind::Consumed,
            Self::Return { .. } => LineKind::Return,
            Self::Truncated => LineKind::Truncated,
            Self::Unknown { .. } => LineKind::Unknown,
        }
    }
}

// Program ids are base58, 32 chars or longer, matching the runtime's output.
const LINE_PATTERN: &str = r"(?x)
    ^Program\ (?<invoke_id>[1-9A-HJ-NP-Za-km-z]{32,})\ invoke\ \[(?<depth>\d+)\]$
  | ^Program\ (?<success_id>[1-9A-HJ-NP-Za-km-z]{32,})\ success$
  | ^Program\ (?<failed_id>[1-9A-HJ-NP-Za-km-z]{32,})\ failed:\ (?<failed_reason>.*)$
  | ^Program\ failed\ to\ complete:\ (?<complete_reason>.*)$
  | ^Program\ log:\ (?<log_text>.*)$
  | ^Program\ data:\ (?<data_text>.*)$
  | ^Program\ (?<consumed_id>[1-9A-HJ-NP-Za-km-z]{32,})\ consumed\ (?<used>\d+)\ of\ (?<budget>\d+)\ compute\ units$
  | ^Program\ return:\ (?<return_id>[1-9A-HJ-NP-Za-km-z]{32,})\ (?<return_text>.*)$
  | ^Log\ truncated$
";

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(LINE_PATTERN).unwrap());

/// Classifies one raw log line. Deterministic and side-effect free; lines
/// whose numeric fields fail to parse fall back to [`LogLine::Unknown`]
/// rather than erroring, so unrecognized structure never aborts a parse.
///
/// Matching tolerates trailing whitespace; `Unknown` preserves the line
/// verbatim as received.
pub fn classify(line: &str) -> LogLine {
    let unknown = || LogLine::Unknown {
        raw: line.to_string(),
    };

    let Some(caps) = LINE_REGEX.captures(line.trim_end()) else {
        return unknown();
    };

    let owned = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    if let (Some(program_id), Some(depth)) = (owned("invoke_id"), caps.name("depth")) {
        let Ok(depth) = depth.as_str().parse::<u32>() else {
            return unknown();
        };
        return LogLine::Invoke { program_id, depth };
    }
    if let Some(program_id) = owned("success_id") {
        return LogLine::Success { program_id };
    }
    if let (Some(program_id), Some(reason)) = (owned("failed_id"), owned("failed_reason")) {
        return LogLine::Failed { program_id, reason };
    }
    if let Some(reason) = owned("complete_reason") {
        return LogLine::FailedToComplete { reason };
    }
    if let Some(text) = owned("log_text") {
        return LogLine::Log { text };
    }
    if let Some(text) = owned("data_text") {
        return LogLine::Data { text };
    }
    if let (Some(program_id), Some(used), Some(budget)) =
        (owned("consumed_id"), caps.name("used"), caps.name("budget"))
    {
        let (Ok(used), Ok(budget)) = (
            used.as_str().parse::<u64>(),
            budget.as_str().parse::<u64>(),
        ) else {
            return unknown();
        };
        return LogLine::Consumed {
            program_id,
            used,
            budget,
        };
    }
    if let (Some(program_id), Some(text)) = (owned("return_id"), owned("return_text")) {
        return LogLine::Return { program_id, text };
    }
    LogLine::Truncated
}
