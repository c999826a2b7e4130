// History ledger: instructions already tried within one run

use serde::Serialize;

/// Append-only, oldest-first record of instructions that did not succeed.
///
/// Owned by exactly one run. Entries are never reordered, deduplicated or pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<String>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an instruction.
    pub fn append(&mut self, instruction: impl Into<String>) {
        self.entries.push(instruction.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Render the whole ledger for the coach, oldest first.
    pub fn as_context(&self) -> String {
        if self.entries.is_empty() {
            return "prompt history: (none)".to_string();
        }

        let mut out = String::from("prompt history:");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("\n{}. {}", i + 1, entry));
        }
        out
    }
}

impl From<Vec<String>> for HistoryLedger {
    fn from(entries: Vec<String>) -> Self {
        Self { entries }
    }
}
