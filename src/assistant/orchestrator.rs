use std::sync::Arc;
use tracing::{debug, info};

use crate::assistant::prompt::{compose_prompt, SYSTEM_PROMPT};
use crate::assistant::title::generate_title;
use crate::assistant::translate::translate_to_keywords;
use crate::core::citation::CitationStyle;
use crate::core::error::{RefscoutError, StorageError};
use crate::core::message::{ChatTurn, MessageRole};
use crate::providers::Provider;
use crate::search::PaperSearch;
use crate::storage::Database;

/// Fixed assistant reply persisted when the search yields nothing. The
/// generation capability is not invoked on that path.
pub const NO_RESULTS_REPLY: &str = "\
No papers matched this search. Try again with different keywords (English \
terms usually give the best recall).";

/// Per-turn knobs, owned and threaded in by the presentation layer.
#[derive(Debug, Clone)]
pub struct TurnConfig {
    pub paper_count: usize,
    pub citation_style: CitationStyle,
}

/// Everything one turn produced, returned explicitly so the caller holds the
/// state instead of ambient globals. The message pair itself is already
/// persisted by the time this is returned.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub translated_query: String,
    pub translation_degraded: bool,
    pub papers_found: usize,
    /// Set when this turn was the session's first and auto-titling renamed it
    pub auto_title: Option<String>,
}

/// Drives one user submission end to end: translate, search, compose,
/// generate, persist. Stateless between calls; everything durable lives in
/// the store.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    search: PaperSearch,
    db: Database,
    reply_language: String,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        search: PaperSearch,
        db: Database,
        reply_language: String,
    ) -> Self {
        Self {
            provider,
            search,
            db,
            reply_language,
        }
    }

    pub async fn handle_turn(
        &self,
        session_id: &str,
        user_text: &str,
        config: &TurnConfig,
    ) -> Result<TurnOutcome, RefscoutError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(RefscoutError::EmptyInput);
        }

        // Session existence is a precondition; a message write must never
        // create one implicitly.
        match self.db.sessions().get(session_id).await {
            Ok(_) => {}
            Err(StorageError::NotFound(_)) => {
                return Err(RefscoutError::SessionNotFound(session_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        // Prior history, read before the append: it is both the replay
        // context and the first-turn gate for auto-titling.
        let prior = self.db.messages().list(session_id).await?;
        let first_turn = prior.is_empty();

        // The user message is durable before any network call.
        self.db
            .messages()
            .append(session_id, MessageRole::User, user_text)
            .await?;

        let translation = translate_to_keywords(self.provider.as_ref(), user_text).await;
        debug!(
            degraded = translation.degraded,
            "search keywords: {}", translation.text
        );

        let outcome = self
            .search
            .search_papers(&translation.text, config.paper_count)
            .await;

        let reply = if outcome.records.is_empty() {
            // Short-circuit: no generation call on the no-results path.
            info!("no search results, persisting fixed reply");
            NO_RESULTS_REPLY.to_string()
        } else {
            let composed = compose_prompt(
                user_text,
                &translation.text,
                &outcome.records,
                config.citation_style,
                &self.reply_language,
            );

            // One system instruction, the persisted history, then the
            // composed prompt as the final user turn. The composed text is
            // never persisted; only the raw query above was.
            let mut turns: Vec<ChatTurn> = Vec::with_capacity(prior.len() + 2);
            turns.push(ChatTurn::system(SYSTEM_PROMPT));
            turns.extend(prior.iter().map(|m| m.as_turn()));
            turns.push(ChatTurn::user(composed));

            // A failure here aborts the turn: the user message stays, no
            // assistant message is written, and the next submission recovers.
            self.provider.complete(&turns).await?
        };

        self.db
            .messages()
            .append(session_id, MessageRole::Assistant, &reply)
            .await?;

        let auto_title = if first_turn {
            let titled =
                generate_title(self.provider.as_ref(), user_text, &self.reply_language).await;
            if titled.degraded {
                // Keep whatever title the session already carries.
                None
            } else {
                self.db.sessions().rename(session_id, &titled.text).await?;
                Some(titled.text)
            }
        } else {
            None
        };

        Ok(TurnOutcome {
            reply,
            translated_query: translation.text,
            translation_degraded: translation.degraded,
            papers_found: outcome.count,
            auto_title,
        })
    }
}
