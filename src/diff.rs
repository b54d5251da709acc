//! Diff rendering for dry-run previews of remote edits.

use similar::{ChangeTag, TextDiff};

/// Generates a unified diff between two versions of a repository file.
pub fn unified_diff(original: &str, modified: &str, path: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = format!("--- a/{path}\n+++ b/{path}\n");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                output.push(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Line counts of a single file edit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Creates a summary from original and modified content.
    pub fn from_diff(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_lines(original, modified);
        let mut summary = Self::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => summary.insertions += 1,
                ChangeTag::Delete => summary.deletions += 1,
                ChangeTag::Equal => {}
            }
        }

        summary
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{}", self.insertions, self.deletions)
    }
}
