//! Active-tag resolution for model and tag pages.
//!
//! Sources, highest priority first:
//! 1. the tag in the request path (`/library/llama3:8b`)
//! 2. the label of the selected tag button
//! 3. a `:tag` suffix on the run command (`ollama run llama3:8b`)
//! 4. a run command naming the model without a tag, which means `latest`
//! 5. the highlighted dropdown row
//! 6. the first dropdown row
//!
//! Once resolved, every dropdown flag is rewritten against the result.

use crate::config::RegistryConfig;
use crate::models::TagSummaryEntry;

/// Raw signals collected from one page.
#[derive(Debug, Clone, Default)]
pub struct ActiveTagSignals<'a> {
    pub path_tag: Option<&'a str>,
    pub selected_label: Option<&'a str>,
    pub run_command: Option<&'a str>,
    /// Display name the run command must mention for the `latest` inference.
    pub model_full_name: &'a str,
}

/// Resolve the active tag; `None` only when no source yields one.
pub fn resolve_active_tag(
    signals: &ActiveTagSignals<'_>,
    entries: &[TagSummaryEntry],
) -> Option<String> {
    let candidates = [
        signals.path_tag.map(str::to_string),
        signals.selected_label.map(str::to_string),
        signals.run_command.and_then(command_tag),
        signals
            .run_command
            .and_then(|cmd| implicit_latest(cmd, signals.model_full_name)),
        entries
            .iter()
            .find(|entry| entry.is_active)
            .map(|entry| entry.tag_part.clone()),
        entries.first().map(|entry| entry.tag_part.clone()),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|tag| tag.trim().to_lowercase())
        .find(|tag| !tag.is_empty())
}

/// Rewrite every entry's flag to `tag_part == active`.
pub fn reconcile_active_flags(entries: &mut [TagSummaryEntry], active: Option<&str>) {
    for entry in entries.iter_mut() {
        entry.is_active = active.is_some_and(|tag| entry.tag_part == tag);
    }
}

fn command_tag(command: &str) -> Option<String> {
    let (_, tag) = command.trim().rsplit_once(':')?;
    let tag = tag.trim();
    (!tag.is_empty()).then(|| tag.to_lowercase())
}

fn implicit_latest(command: &str, model_full_name: &str) -> Option<String> {
    if model_full_name.is_empty() {
        return None;
    }
    let parts: Vec<&str> = command.split_whitespace().collect();
    match parts.as_slice() {
        ["ollama", "run", name] if name.eq_ignore_ascii_case(model_full_name) => {
            Some(RegistryConfig::IMPLICIT_TAG.to_string())
        }
        _ => None,
    }
}
