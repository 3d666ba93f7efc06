//! Output structures for JSON formatting
//!
//! This module provides structures for serializing the `--json` preview
//! into JSON format for programmatic consumption. The preview never stages
//! or commits anything.

use serde::Serialize;

use crate::app::Outcome;
use crate::classify::CommitType;

/// Commit message structure for JSON output
///
/// # Example
///
/// ```
/// use commitgpt::classify::CommitType;
/// use commitgpt::output::CommitMessage;
///
/// let commit = CommitMessage {
///     message: "feat: add new feature".to_string(),
///     commit_type: Some(CommitType::Feat),
/// };
///
/// let json = serde_json::to_string(&commit).unwrap();
/// assert_eq!(json, r#"{"message":"feat: add new feature","commit_type":"feat"}"#);
/// ```
#[derive(Debug, Serialize)]
pub struct CommitMessage {
    /// The composed commit message, empty when there was nothing to commit
    pub message: String,
    pub commit_type: Option<CommitType>,
}

impl From<&Outcome> for CommitMessage {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::NoChanges => CommitMessage {
                message: String::new(),
                commit_type: None,
            },
            Outcome::Committed {
                commit_type,
                message,
            }
            | Outcome::Previewed {
                commit_type,
                message,
            } => CommitMessage {
                message: message.clone(),
                commit_type: Some(*commit_type),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message_from_preview() {
        // Arrange
        let outcome = Outcome::Previewed {
            commit_type: CommitType::Fix,
            message: "fix: correct off-by-one error".to_string(),
        };

        // Act
        let json = serde_json::to_string(&CommitMessage::from(&outcome)).unwrap();

        // Assert
        assert_eq!(
            json,
            r#"{"message":"fix: correct off-by-one error","commit_type":"fix"}"#
        );
    }

    #[test]
    fn test_commit_message_from_committed() {
        let outcome = Outcome::Committed {
            commit_type: CommitType::Docs,
            message: "docs: update readme".to_string(),
        };

        let parsed = serde_json::to_value(CommitMessage::from(&outcome)).unwrap();

        assert_eq!(parsed["commit_type"], "docs");
        assert_eq!(parsed["message"], "docs: update readme");
    }

    #[test]
    fn test_commit_message_from_no_changes() {
        let json = serde_json::to_string(&CommitMessage::from(&Outcome::NoChanges)).unwrap();

        assert_eq!(json, r#"{"message":"","commit_type":null}"#);
    }

    #[test]
    fn test_commit_message_serialize_special_characters() {
        // Arrange - message with special characters
        let commit = CommitMessage {
            message: r#"fix: resolve "quote" issue and \backslash"#.to_string(),
            commit_type: Some(CommitType::Fix),
        };

        // Act
        let json = serde_json::to_string(&commit).unwrap();

        // Assert - JSON should escape quotes and backslashes
        assert!(json.contains(r#"\"quote\""#));
        assert!(json.contains(r#"\\"#));
    }
}
