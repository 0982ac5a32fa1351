use crate::assistant::TurnOutcome;
use crate::core::citation::CitationStyle;
use crate::core::message::{Message, MessageRole};
use crate::core::session::Session;
use crate::storage::SearchHit;

/// Transient keyword line: shows what was actually searched, and whether the
/// translation fell back to the raw query.
pub fn print_keywords(outcome: &TurnOutcome) {
    let suffix = if outcome.translation_degraded {
        " (untranslated)"
    } else {
        ""
    };
    println!(
        "\x1b[90mSearched for: {}{suffix}\x1b[0m",
        outcome.translated_query
    );
}

pub fn print_sessions(sessions: &[Session], current_id: &str) {
    if sessions.is_empty() {
        println!("No sessions.");
        return;
    }
    for s in sessions {
        let marker = if s.id == current_id { " *" } else { "" };
        println!(
            "  \x1b[90m{}\x1b[0m  {}  ({}){}",
            &s.id[..8],
            s.title,
            s.created_at.format("%Y-%m-%d %H:%M"),
            marker,
        );
    }
}

pub fn print_messages(messages: &[Message]) {
    for msg in messages {
        let (label, color) = match msg.role {
            MessageRole::User => ("you", "\x1b[32;1m"),
            MessageRole::Assistant => ("refscout", "\x1b[36;1m"),
            MessageRole::System => ("system", "\x1b[90m"),
        };
        println!("{color}{label}:\x1b[0m {}\n", msg.content);
    }
}

pub fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matches.");
        return;
    }
    for hit in hits {
        println!(
            "  \x1b[90m{}\x1b[0m  \x1b[1m{}\x1b[0m  {}",
            &hit.session_id[..8],
            hit.title,
            hit.snippet,
        );
    }
}

pub fn print_styles(current: CitationStyle) {
    println!("\x1b[1mCitation styles:\x1b[0m");
    for style in CitationStyle::ALL {
        let marker = if style == current { " *" } else { "" };
        println!("  {:<16} {}{}", style.label(), style.style_name(), marker);
    }
}
