use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::invocation::InvocationContext;

/// Allowlist of program ids whose top-level invocations are retained in
/// output. The sentinel `"*"` anywhere in the list selects all programs.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSelector {
    pub programs: HashSet<String>,
    pub select_all_programs: bool,
}

impl ProgramSelector {
    pub fn new(programs: &[String]) -> Self {
        debug!(?programs, "creating program selector");

        let select_all_programs = programs.iter().any(|key| key == "*");
        if select_all_programs {
            return Self {
                programs: HashSet::default(),
                select_all_programs,
            };
        }
        Self {
            programs: programs.iter().cloned().collect(),
            select_all_programs,
        }
    }

    pub fn new_all_programs() -> Self {
        Self::new(&["*".to_string()])
    }

    pub fn is_selected(&self, program_id: &str) -> bool {
        self.select_all_programs || self.programs.contains(program_id)
    }

    /// Returns true if the selector retains anything at all.
    pub fn is_enabled(&self) -> bool {
        self.select_all_programs || !self.programs.is_empty()
    }
}

/// Prunes the forest of root contexts to those whose program id is selected.
///
/// Applied post-construction, so nesting inside a kept root is unaffected:
/// child invocations by non-selected programs stay visible as context for the
/// kept ancestor. Unmatched raw lines are not subject to filtering — they
/// carry no program id.
pub fn filter_roots(
    roots: Vec<InvocationContext>,
    selector: &ProgramSelector,
) -> Vec<InvocationContext> {
    if selector.select_all_programs {
        return roots;
    }
    roots
        .into_iter()
        .filter(|root| selector.is_selected(&root.program_id))
        .collect()
}
