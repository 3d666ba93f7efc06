//! Prompt construction for commit summaries
//!
//! This module embeds the diff and its stat overview in a fixed instruction
//! and ensures the result stays within the configured size limit.

use crate::error::SummaryError;

/// Default maximum allowed prompt size in bytes (1MB)
pub const DEFAULT_MAX_PROMPT_SIZE: usize = 1_000_000;

const INSTRUCTION_HEAD: &str = "Summarize the following Git changes:\n\n";

const INSTRUCTION_TAIL: &str = "\n\nProvide a concise one-line summary of the changes, \
like the following: `fix: fixed an issue where a memory leak was happening` or \
`feat: added the ability to take screenshots`. ONLY RETURN ONE LINE.";

const DIFF_HEADER: &str = "Detailed Changes:\n";
const STAT_HEADER: &str = "\n\nChanges Overview:\n";

/// Size of the prompt in bytes, computed without building it
pub fn calculate_prompt_size(diff: &str, stat: &str) -> usize {
    INSTRUCTION_HEAD.len()
        + DIFF_HEADER.len()
        + diff.len()
        + STAT_HEADER.len()
        + stat.len()
        + INSTRUCTION_TAIL.len()
}

/// Build the summarization prompt
///
/// The final prompt structure is:
/// ```text
/// Summarize the following Git changes:
///
/// Detailed Changes:
/// {diff}
///
/// Changes Overview:
/// {stat}
///
/// Provide a concise one-line summary ... ONLY RETURN ONE LINE.
/// ```
///
/// # Errors
///
/// * Combined prompt size exceeds `max_size`
///
/// # Example
///
/// ```
/// use commitgpt::prompt::build_prompt;
///
/// let prompt = build_prompt("+added line", "1 file changed", 1_000_000).unwrap();
/// assert!(prompt.contains("Detailed Changes:\n+added line"));
/// assert!(prompt.contains("Changes Overview:\n1 file changed"));
/// ```
pub fn build_prompt(diff: &str, stat: &str, max_size: usize) -> Result<String, SummaryError> {
    // Validate size BEFORE allocating the combined string
    let combined_size = calculate_prompt_size(diff, stat);

    if combined_size > max_size {
        return Err(SummaryError::Prompt(format!(
            "Prompt size ({} bytes) exceeds maximum allowed size ({} bytes). \
             Consider committing fewer changes at once or splitting into multiple commits.",
            combined_size, max_size
        )));
    }

    let mut prompt = String::with_capacity(combined_size);
    prompt.push_str(INSTRUCTION_HEAD);
    prompt.push_str(DIFF_HEADER);
    prompt.push_str(diff);
    prompt.push_str(STAT_HEADER);
    prompt.push_str(stat);
    prompt.push_str(INSTRUCTION_TAIL);
    Ok(prompt)
}
