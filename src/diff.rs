//! Line diffs between staged and working-tree content.

use std::fmt::Write as _;

use similar::{ChangeTag, TextDiff};

/// A single line in a diff hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Unchanged line, present on both sides.
    Context(String),
    /// Line present only on the new side.
    Added(String),
    /// Line present only on the old side.
    Removed(String),
}

/// A contiguous group of changes with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// 1-based first line of the hunk on the old side.
    pub old_start: usize,
    /// Number of old-side lines covered.
    pub old_count: usize,
    /// 1-based first line of the hunk on the new side.
    pub new_start: usize,
    /// Number of new-side lines covered.
    pub new_count: usize,
    /// The hunk's lines, in order.
    pub lines: Vec<DiffLine>,
}

/// The diff of one file between its staged and working-tree versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Repository-relative path.
    pub path: String,
    /// Change hunks; empty when the file is binary, deleted, or unchanged.
    pub hunks: Vec<DiffHunk>,
    /// True if either side is not valid UTF-8 text.
    pub is_binary: bool,
    /// True if the file is staged but missing from the working tree.
    pub is_deleted: bool,
}

impl FileDiff {
    /// Diffs the staged content against the working-tree content.
    ///
    /// Non-UTF-8 content on either side yields a binary marker with no
    /// hunks. Hunks group changes with up to 3 lines of context.
    pub fn compute(path: impl Into<String>, old: &[u8], new: &[u8]) -> Self {
        let path = path.into();

        let (Ok(old_text), Ok(new_text)) = (std::str::from_utf8(old), std::str::from_utf8(new))
        else {
            return FileDiff {
                path,
                hunks: Vec::new(),
                is_binary: true,
                is_deleted: false,
            };
        };

        let diff = TextDiff::from_lines(old_text, new_text);
        let mut hunks = Vec::new();

        for group in diff.grouped_ops(3) {
            let Some(first) = group.first() else { continue };
            let Some(last) = group.last() else { continue };

            let old_range = first.old_range().start..last.old_range().end;
            let new_range = first.new_range().start..last.new_range().end;

            let mut lines = Vec::new();
            for op in &group {
                for change in diff.iter_changes(op) {
                    let text = change.value().trim_end_matches('\n').to_string();
                    lines.push(match change.tag() {
                        ChangeTag::Equal => DiffLine::Context(text),
                        ChangeTag::Insert => DiffLine::Added(text),
                        ChangeTag::Delete => DiffLine::Removed(text),
                    });
                }
            }

            hunks.push(DiffHunk {
                old_start: old_range.start + 1,
                old_count: old_range.len(),
                new_start: new_range.start + 1,
                new_count: new_range.len(),
                lines,
            });
        }

        FileDiff {
            path,
            hunks,
            is_binary: false,
            is_deleted: false,
        }
    }

    /// Marks a staged file that no longer exists in the working tree.
    pub fn deleted(path: impl Into<String>) -> Self {
        FileDiff {
            path: path.into(),
            hunks: Vec::new(),
            is_binary: false,
            is_deleted: true,
        }
    }

    /// Returns true if the two sides are identical text.
    pub fn is_unchanged(&self) -> bool {
        self.hunks.is_empty() && !self.is_binary && !self.is_deleted
    }

    /// Renders the diff in unified format.
    pub fn to_unified(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "--- a/{}", self.path);
        let _ = writeln!(out, "+++ b/{}", self.path);

        if self.is_deleted {
            out.push_str("(file deleted in working tree)\n");
            return out;
        }
        if self.is_binary {
            out.push_str("(binary files differ)\n");
            return out;
        }

        for hunk in &self.hunks {
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            for line in &hunk.lines {
                match line {
                    DiffLine::Context(text) => {
                        let _ = writeln!(out, " {}", text);
                    }
                    DiffLine::Added(text) => {
                        let _ = writeln!(out, "+{}", text);
                    }
                    DiffLine::Removed(text) => {
                        let _ = writeln!(out, "-{}", text);
                    }
                }
            }
        }
        out
    }
}
