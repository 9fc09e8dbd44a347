//! Builds the instructions and user request sent to the search agent.
//!
//! Pure string assembly from a `DigestConfiguration`; the output schema itself is
//! enforced by the adapter, these instructions restate it for the model.

use crate::domain::{DigestConfiguration, SearchRequest};

/// Lower bound asked of the agent, capped by `max_items`.
const PREFERRED_MIN_ITEMS: usize = 5;

/// Summary length bounds (sentences).
const SUMMARY_MIN_SENTENCES: usize = 1;
const SUMMARY_MAX_SENTENCES: usize = 3;

/// Build the search request. `request_override` replaces the default user request text.
pub fn build_search_request(
    config: &DigestConfiguration,
    request_override: Option<&str>,
) -> SearchRequest {
    let max_items = config.max_items.max(1);
    let min_items = PREFERRED_MIN_ITEMS.min(max_items);

    let input = request_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_request(config));

    SearchRequest {
        instructions: instructions(config, min_items, max_items),
        input,
        min_items,
        max_items,
    }
}

fn instructions(config: &DigestConfiguration, min_items: usize, max_items: usize) -> String {
    let locations = bullet_list(&config.locations);
    let topics = bullet_list(&config.challenge_focus);
    let language = config.language.display_name();
    let hours = config.recency_hours;

    format!(
        r#"You are a research assistant that finds hackathons and programming challenges using web search.

## Scope
Locations (include events held in or open to participants from):
{locations}
Challenge focus:
{topics}
Only include items announced, updated, or with registration open within the last {hours} hours, or upcoming events whose registration is still open.

## Output Format
You MUST respond with JSON only. No markdown, no commentary outside JSON.
Return an object with a single key "items" holding an array of objects.
Every item has exactly these fields, all strings (never null, numbers, or arrays):
- "title": event or challenge name
- "summary": {SUMMARY_MIN_SENTENCES}-{SUMMARY_MAX_SENTENCES} sentences written in {language}
- "publisher": organiser or publishing site
- "url": direct link to the event or announcement
- "category": short label such as "hackathon", "challenge", "competition", "game jam" or "CTF"
- "date": event date as YYYY-MM-DD, a range as YYYY-MM-DD – YYYY-MM-DD, or the organiser's wording if no exact date is published

## Bounds
Return at least {min_items} and at most {max_items} items. Return fewer than {min_items} only if fewer relevant items exist.
Do not repeat the same event. Prefer official organiser pages over aggregators."#
    )
}

fn default_request(config: &DigestConfiguration) -> String {
    format!(
        "Find hackathons and programming challenges in {} focused on {} from the last {} hours. Write summaries in {}.",
        config.locations.join(", "),
        config.challenge_focus.join(", "),
        config.recency_hours,
        config.language.display_name(),
    )
}

fn bullet_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("- {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}
