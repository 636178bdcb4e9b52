//! Default issue flattener.

use sieve_contracts::{FlattenedIssues, Issue};

use crate::traits::IssueFlattener;

/// Groups issue messages under their dot-joined path.
///
/// Issues without a path go to `FlattenedIssues::root`. Array positions are
/// rendered as decimal segments (`"tags.0"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFlattener;

impl IssueFlattener for PathFlattener {
    fn flatten(&self, issues: &[Issue]) -> FlattenedIssues {
        let mut flat = FlattenedIssues::new();
        for issue in issues {
            if issue.path.is_empty() {
                flat.push_root(issue.message.clone());
            } else {
                flat.push(issue.dotted_path(), issue.message.clone());
            }
        }
        flat
    }
}
