//! Shared helper functions for CLI commands

use console::style;

use crate::core::flow::STEP_COUNT;

/// Step indicator: filled dots up to and including `step`
pub fn progress_dots(step: usize) -> String {
    (0..STEP_COUNT)
        .map(|i| {
            if i <= step {
                style("●").blue().to_string()
            } else {
                style("○").dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&style(" ── ").dim().to_string())
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
