use tracing::warn;

use crate::assistant::BestEffort;
use crate::core::message::ChatTurn;
use crate::core::session::DEFAULT_SESSION_TITLE;
use crate::providers::Provider;

/// Hard clamp on generated titles, in characters.
const MAX_TITLE_CHARS: usize = 60;

/// Derives a short session title from the first user query, in the
/// configured display language. Best-effort: failure degrades to the fixed
/// placeholder. Callers invoke this once per session, after its first
/// completed turn.
pub async fn generate_title(provider: &dyn Provider, query: &str, language: &str) -> BestEffort {
    let instruction = format!(
        "Write a short title (at most 40 characters, in {language}) for a \
         research conversation that starts with the topic the user gives you. \
         Reply with the title only, no quotes, nothing else."
    );

    let turns = [ChatTurn::system(instruction), ChatTurn::user(query)];

    match provider.complete(&turns).await {
        Ok(text) => {
            let trimmed = text.trim().trim_matches('"').trim();
            if trimmed.is_empty() {
                warn!("title generation returned empty text, keeping placeholder");
                BestEffort::fallback(DEFAULT_SESSION_TITLE.to_string())
            } else {
                BestEffort::ok(clamp_chars(trimmed, MAX_TITLE_CHARS))
            }
        }
        Err(e) => {
            warn!("title generation unavailable, keeping placeholder: {e}");
            BestEffort::fallback(DEFAULT_SESSION_TITLE.to_string())
        }
    }
}

fn clamp_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => s[..i].to_string(),
        None => s.to_string(),
    }
}
