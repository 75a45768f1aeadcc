//! Validation issues and the aggregated error report

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of the path to the value an issue refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) if key.is_empty() => f.write_str("(empty)"),
            PathSegment::Key(key) if key.chars().any(char::is_control) => {
                write!(f, "{}", key.escape_debug())
            }
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    /// Issue on a top-level variable
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![PathSegment::Key(field.into())],
            message: message.into(),
        }
    }

    /// Issue at an arbitrary path
    pub fn at(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// The first path segment, rendered for display.
    ///
    /// Never fails: an empty path renders as `(root)`.
    pub fn field_name(&self) -> String {
        match self.path.first() {
            Some(segment) => segment.to_string(),
            None => "(root)".to_string(),
        }
    }
}

/// Which half of a split schema an issue came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Server,
    Client,
}

impl Partition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Server => "server",
            Partition::Client => "client",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues collected for one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionIssues {
    pub partition: Partition,
    pub issues: Vec<Issue>,
}

/// Every issue found during one load, grouped by schema shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    Unified(Vec<Issue>),
    /// Partitions in evaluation order (server first)
    Split(Vec<PartitionIssues>),
}

impl ErrorReport {
    /// Total number of issues across all partitions
    pub fn issue_count(&self) -> usize {
        match self {
            ErrorReport::Unified(issues) => issues.len(),
            ErrorReport::Split(groups) => groups.iter().map(|g| g.issues.len()).sum(),
        }
    }

    /// All issues, in report order
    pub fn issues(&self) -> Vec<&Issue> {
        match self {
            ErrorReport::Unified(issues) => issues.iter().collect(),
            ErrorReport::Split(groups) => groups.iter().flat_map(|g| g.issues.iter()).collect(),
        }
    }

    /// Partitions that failed, in evaluation order. Empty for unified reports.
    pub fn partitions(&self) -> Vec<Partition> {
        match self {
            ErrorReport::Unified(_) => Vec::new(),
            ErrorReport::Split(groups) => groups.iter().map(|g| g.partition).collect(),
        }
    }

    /// Issues recorded for one partition
    pub fn issues_for(&self, partition: Partition) -> &[Issue] {
        match self {
            ErrorReport::Unified(_) => &[],
            ErrorReport::Split(groups) => groups
                .iter()
                .find(|g| g.partition == partition)
                .map(|g| g.issues.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// The first failing partition, used as the representative cause
    pub fn first_partition(&self) -> Option<&PartitionIssues> {
        match self {
            ErrorReport::Unified(_) => None,
            ErrorReport::Split(groups) => groups.first(),
        }
    }

    /// Whether any issue refers to the given variable
    pub fn mentions(&self, field: &str) -> bool {
        self.issues().iter().any(|issue| issue.field_name() == field)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReport::Unified(issues) => write!(f, "{} issue(s)", issues.len()),
            ErrorReport::Split(groups) => {
                let parts: Vec<String> = groups
                    .iter()
                    .map(|g| format!("{}: {} issue(s)", g.partition, g.issues.len()))
                    .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_report() -> ErrorReport {
        ErrorReport::Split(vec![
            PartitionIssues {
                partition: Partition::Server,
                issues: vec![
                    Issue::new("NODE_ENV", "required"),
                    Issue::new("DATABASE_URL", "invalid url"),
                ],
            },
            PartitionIssues {
                partition: Partition::Client,
                issues: vec![Issue::new("NEXT_PUBLIC_API_URL", "required")],
            },
        ])
    }

    #[test]
    fn test_field_name_rendering() {
        assert_eq!(Issue::new("PORT", "bad").field_name(), "PORT");
        assert_eq!(Issue::at(vec![], "bad").field_name(), "(root)");
        assert_eq!(Issue::at(vec![3.into()], "bad").field_name(), "[3]");
        assert_eq!(Issue::new("", "bad").field_name(), "(empty)");
        assert_eq!(Issue::new("A\nB", "bad").field_name(), "A\\nB");
    }

    #[test]
    fn test_field_name_uses_first_segment_only() {
        let issue = Issue::at(vec!["SERVICES".into(), 0.into()], "bad");
        assert_eq!(issue.field_name(), "SERVICES");
    }

    #[test]
    fn test_split_report_accessors() {
        let report = split_report();
        assert_eq!(report.issue_count(), 3);
        assert_eq!(report.partitions(), vec![Partition::Server, Partition::Client]);
        assert_eq!(report.issues_for(Partition::Server).len(), 2);
        assert_eq!(report.issues_for(Partition::Client).len(), 1);
        assert_eq!(
            report.first_partition().map(|g| g.partition),
            Some(Partition::Server)
        );
        assert!(report.mentions("DATABASE_URL"));
        assert!(!report.mentions("SECRET_KEY"));
    }

    #[test]
    fn test_report_display() {
        assert_eq!(
            split_report().to_string(),
            "server: 2 issue(s), client: 1 issue(s)"
        );
        let unified = ErrorReport::Unified(vec![Issue::new("NODE_ENV", "required")]);
        assert_eq!(unified.to_string(), "1 issue(s)");
        assert!(unified.partitions().is_empty());
        assert!(unified.issues_for(Partition::Server).is_empty());
    }

    #[test]
    fn test_deserialize_partition() {
        let partition: Partition = serde_json::from_str(r#""client""#).unwrap();
        assert_eq!(partition, Partition::Client);
    }
}
