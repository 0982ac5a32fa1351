use tracing::warn;

use crate::assistant::BestEffort;
use crate::core::message::ChatTurn;
use crate::providers::Provider;

const TRANSLATE_INSTRUCTION: &str = "\
The user gives you a research topic, possibly not in English. Reduce it to \
concise English search keywords suitable for an academic search engine. \
Reply with the keywords only, nothing else.";

/// Normalizes an arbitrary-language query into English search keywords.
/// Best-effort: on any provider failure (or a blank completion) the original
/// query is passed through unchanged.
pub async fn translate_to_keywords(provider: &dyn Provider, query: &str) -> BestEffort {
    let turns = [
        ChatTurn::system(TRANSLATE_INSTRUCTION),
        ChatTurn::user(query),
    ];

    match provider.complete(&turns).await {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                warn!("keyword translation returned empty text, passing query through");
                BestEffort::fallback(query.to_string())
            } else {
                BestEffort::ok(trimmed.to_string())
            }
        }
        Err(e) => {
            warn!("keyword translation unavailable, passing query through: {e}");
            BestEffort::fallback(query.to_string())
        }
    }
}
