//! Conventional commit classification and message composition

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::PrefixMode;

/// Conventional commit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Fix,
    Feat,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
}

/// Keyword table in priority order; the first matching row wins
const KEYWORDS: &[(CommitType, &[&str])] = &[
    (CommitType::Fix, &["fix", "bug"]),
    (CommitType::Feat, &["feat", "feature"]),
    (CommitType::Docs, &["docs", "documentation"]),
    (CommitType::Style, &["style"]),
    (CommitType::Refactor, &["refactor"]),
    (CommitType::Test, &["test"]),
    (CommitType::Chore, &["chore"]),
];

impl CommitType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Fix => "fix",
            CommitType::Feat => "feat",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KEYWORDS
            .iter()
            .map(|(commit_type, _)| *commit_type)
            .find(|commit_type| commit_type.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown commit type: {s}"))
    }
}

/// Classify a summary by keyword containment
///
/// Case-insensitive. Keywords are checked in a fixed order (fix, feat,
/// docs, style, refactor, test, chore) and the first hit wins. Anything
/// without a hit is a chore.
///
/// # Example
///
/// ```
/// use commitgpt::classify::{classify, CommitType};
///
/// assert_eq!(classify("Fixed a bug in the parser"), CommitType::Fix);
/// assert_eq!(classify("bump dependencies"), CommitType::Chore);
/// ```
pub fn classify(summary: &str) -> CommitType {
    let folded = summary.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| folded.contains(word)))
        .map(|(commit_type, _)| *commit_type)
        .unwrap_or(CommitType::Chore)
}

/// Parse a leading `type:`, `type(scope):` or `type!:` prefix
///
/// Only the seven known types count. Returns `None` when the line does
/// not start with one.
pub fn existing_prefix(line: &str) -> Option<CommitType> {
    let (head, _) = line.split_once(':')?;
    let head = head.strip_suffix('!').unwrap_or(head);
    let name = match head.split_once('(') {
        Some((name, scope)) if scope.ends_with(')') => name,
        Some(_) => return None,
        None => head,
    };
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    name.parse().ok()
}

/// Reduce a model reply to a single clean line
///
/// Takes the first line with content, skipping code fence lines, and strips
/// surrounding whitespace, backticks and quotes. Returns an empty string
/// when nothing is left.
pub fn normalize_summary(summary: &str) -> String {
    summary
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .map(|line| {
            line.trim()
                .trim_matches(|c: char| c == '`' || c == '"' || c == '\'')
                .trim()
        })
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Final commit message with its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub commit_type: CommitType,
    pub message: String,
}

/// Build the commit message from a summary
///
/// `fallback` replaces a summary that normalizes to nothing.
///
/// # Example
///
/// ```
/// use commitgpt::classify::{compose_message, CommitType};
/// use commitgpt::config::PrefixMode;
///
/// let composed = compose_message("fix: correct off-by-one error", PrefixMode::Always, "n/a");
/// assert_eq!(composed.message, "fix: fix: correct off-by-one error");
///
/// let composed = compose_message("fix: correct off-by-one error", PrefixMode::Auto, "n/a");
/// assert_eq!(composed.message, "fix: correct off-by-one error");
/// assert_eq!(composed.commit_type, CommitType::Fix);
/// ```
pub fn compose_message(summary: &str, mode: PrefixMode, fallback: &str) -> ComposedMessage {
    let mut line = normalize_summary(summary);
    if line.is_empty() {
        line = normalize_summary(fallback);
    }

    let prefixed = |commit_type: CommitType, line: &str| ComposedMessage {
        commit_type,
        message: format!("{commit_type}: {line}"),
    };

    match mode {
        PrefixMode::Always => prefixed(classify(&line), &line),
        PrefixMode::Never => ComposedMessage {
            commit_type: existing_prefix(&line).unwrap_or_else(|| classify(&line)),
            message: line,
        },
        PrefixMode::Auto => match existing_prefix(&line) {
            Some(commit_type) => ComposedMessage {
                commit_type,
                message: line,
            },
            None => prefixed(classify(&line), &line),
        },
    }
}
