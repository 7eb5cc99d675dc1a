use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::classifier::{LogLine, classify};

/// Status applied to an open frame when the stream ends before its terminal
/// `success`/`failed` line was seen.
pub const STREAM_END_REASON: &str = "truncated: stream ended while invocation open";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Pending,
    Success,
    Failed(String),
}

impl InvocationStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One program's execution span within a transaction, finalized. Children are
/// owned by value and ordered by completion, so the tree is traversed
/// top-down with no back-pointers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub program_id: String,
    /// Nesting level as reported by the runtime's invoke line (1 = top-level).
    pub depth: u32,
    /// Payload text of `Program log:`/`Program data:` lines belonging to this
    /// frame, plus any unrecognized lines attributed to it, insertion order.
    pub logs: Vec<String>,
    pub compute_used: Option<u64>,
    pub compute_budget: Option<u64>,
    /// Base64 payload of the last `Program return:` line for this frame.
    pub return_data: Option<String>,
    pub status: InvocationStatus,
    pub children: Vec<InvocationContext>,
}

/// Structural anomalies observed while folding the line stream. These never
/// fail a parse; they are recoverable per-line and surfaced here so callers
/// and tests can assert on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    /// Invoke whose reported depth is not one past the current stack depth.
    DepthSkip {
        program_id: String,
        reported: u32,
        expected: u32,
    },
    /// Terminal line whose program id differs from the innermost open frame.
    CloseMismatch { expected: String, reported: String },
    /// Terminal line observed while no frame was open.
    OrphanClose { program_id: String },
    /// Return line whose program id differs from the innermost open frame.
    ReturnMismatch { expected: String, reported: String },
}

/// An invocation still waiting for its terminal line.
struct Frame {
    program_id: String,
    depth: u32,
    logs: Vec<String>,
    compute_used: Option<u64>,
    compute_budget: Option<u64>,
    return_data: Option<String>,
    children: Vec<InvocationContext>,
}

impl Frame {
    fn open(program_id: String, depth: u32) -> Self {
        Self {
            program_id,
            depth,
            logs: Vec::new(),
            compute_used: None,
            compute_budget: None,
            return_data: None,
            children: Vec::new(),
        }
    }

    fn close(self, status: InvocationStatus) -> InvocationContext {
        InvocationContext {
            program_id: self.program_id,
            depth: self.depth,
            logs: self.logs,
            compute_used: self.compute_used,
            compute_budget: self.compute_budget,
            return_data: self.return_data,
            status,
            children: self.children,
        }
    }
}

/// Everything one pass over a transaction's log lines produces: completed
/// top-level contexts, lines attributable to no frame, and the anomalies
/// recovered from along the way.
#[derive(Debug, Default)]
pub struct BuiltContexts {
    pub roots: Vec<InvocationContext>,
    pub raw_unmatched: Vec<String>,
    pub anomalies: Vec<Anomaly>,
}

/// Folds classified log lines into an invocation tree. Owns the call-depth
/// stack; one builder serves one transaction's line sequence, in order, with
/// no backtracking. O(n) over lines, O(depth) auxiliary stack space.
#[derive(Default)]
pub struct ContextBuilder {
    stack: Vec<Frame>,
    roots: Vec<InvocationContext>,
    raw_unmatched: Vec<String>,
    anomalies: Vec<Anomaly>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies and folds the whole sequence, then closes any frames left
    /// open by a truncated stream.
    pub fn process_all(lines: &[String]) -> BuiltContexts {
        let mut builder = Self::new();
        for line in lines {
            builder.push_line(line);
        }
        builder.finish()
    }

    pub fn push_line(&mut self, raw: &str) {
        let event = classify(raw);
        trace!(kind = %event.kind(), line = raw, "classified log line");
        self.apply(event, raw);
    }

    fn apply(&mut self, event: LogLine, raw: &str) {
        match event {
            LogLine::Invoke { program_id, depth } => {
                let expected = self.stack.len() as u32 + 1;
                if depth != expected {
                    warn!(
                        program_id = %program_id,
                        reported = depth,
                        expected,
                        "invoke depth does not follow current stack depth"
                    );
                    self.anomalies.push(Anomaly::DepthSkip {
                        program_id: program_id.clone(),
                        reported: depth,
                        expected,
                    });
                }
                // Best-effort: push regardless, keeping the reported depth.
                self.stack.push(Frame::open(program_id, depth));
            }
            LogLine::Success { program_id } => {
                self.close_top(&program_id, InvocationStatus::Success, raw);
            }
            LogLine::Failed { program_id, reason } => {
                self.close_top(&program_id, InvocationStatus::Failed(reason), raw);
            }
            LogLine::FailedToComplete { reason } => match self.stack.last_mut() {
                Some(frame) => frame.logs.push(reason),
                None => self.unmatched(raw),
            },
            LogLine::Log { text } | LogLine::Data { text } => match self.stack.last_mut() {
                Some(frame) => frame.logs.push(text),
                None => self.unmatched(raw),
            },
            LogLine::Consumed {
                program_id,
                used,
                budget,
            } => {
                // Innermost matching frame; a later line for the same program
                // overwrites (last wins).
                match self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|frame| frame.program_id == program_id)
                {
                    Some(frame) => {
                        frame.compute_used = Some(used);
                        frame.compute_budget = Some(budget);
                    }
                    None => self.unmatched(raw),
                }
            }
            LogLine::Return { program_id, text } => match self.stack.last_mut() {
                Some(frame) => {
                    if frame.program_id != program_id {
                        warn!(
                            expected = %frame.program_id,
                            reported = %program_id,
                            "return line does not match innermost open frame"
                        );
                        self.anomalies.push(Anomaly::ReturnMismatch {
                            expected: frame.program_id.clone(),
                            reported: program_id,
                        });
                    }
                    frame.return_data = Some(text);
                }
                None => self.unmatched(raw),
            },
            LogLine::Truncated | LogLine::Unknown { .. } => match self.stack.last_mut() {
                Some(frame) => frame.logs.push(raw.to_string()),
                None => self.unmatched(raw),
            },
        }
    }

    /// Closes all still-open frames, innermost first, with the implicit
    /// truncation status, and returns the accumulated output.
    pub fn finish(mut self) -> BuiltContexts {
        while let Some(frame) = self.stack.pop() {
            warn!(
                program_id = %frame.program_id,
                depth = frame.depth,
                "stream ended while invocation open"
            );
            let context = frame.close(InvocationStatus::Failed(STREAM_END_REASON.to_string()));
            self.attach(context);
        }
        BuiltContexts {
            roots: self.roots,
            raw_unmatched: self.raw_unmatched,
            anomalies: self.anomalies,
        }
    }

    fn close_top(&mut self, program_id: &str, status: InvocationStatus, raw: &str) {
        match self.stack.pop() {
            Some(frame) => {
                if frame.program_id != program_id {
                    // Runtime logs occasionally interleave incompletely; close
                    // the top frame with the reported status and record it.
                    warn!(
                        expected = %frame.program_id,
                        reported = %program_id,
                        "terminal line does not match innermost open frame"
                    );
                    self.anomalies.push(Anomaly::CloseMismatch {
                        expected: frame.program_id.clone(),
                        reported: program_id.to_string(),
                    });
                }
                let context = frame.close(status);
                self.attach(context);
            }
            None => {
                warn!(program_id, "terminal line with no open invocation");
                self.anomalies.push(Anomaly::OrphanClose {
                    program_id: program_id.to_string(),
                });
                self.unmatched(raw);
            }
        }
    }

    fn attach(&mut self, context: InvocationContext) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(context),
            None => self.roots.push(context),
        }
    }

    fn unmatched(&mut self, raw: &str) {
        debug!(line = raw, "line not attributable to any open invocation");
        self.raw_unmatched.push(raw.to_string());
    }
}
