use super::citation::CitationStyle;
use super::config::AppConfig;
use super::message::{ChatTurn, MessageRole};
use super::session::{Session, DEFAULT_SESSION_TITLE};
use chrono::Utc;

#[test]
fn test_session_creation() {
    let session = Session::new(DEFAULT_SESSION_TITLE.into());
    assert!(!session.id.is_empty());
    assert_eq!(session.title, "New conversation");
    assert!(session.created_at <= Utc::now());
}

#[test]
fn test_session_ids_are_unique() {
    let a = Session::new("a".into());
    let b = Session::new("b".into());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_message_role_round_trip() {
    for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
        assert_eq!(MessageRole::parse(role.as_str()), Some(role));
    }
    assert_eq!(MessageRole::parse("tool"), None);
}

#[test]
fn test_message_role_serialization() {
    let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
    assert_eq!(json, "\"assistant\"");

    let deserialized: MessageRole = serde_json::from_str("\"user\"").unwrap();
    assert_eq!(deserialized, MessageRole::User);
}

#[test]
fn test_chat_turn_constructors() {
    let turn = ChatTurn::system("be helpful");
    assert_eq!(turn.role, MessageRole::System);
    assert_eq!(turn.content, "be helpful");

    assert_eq!(ChatTurn::user("q").role, MessageRole::User);
    assert_eq!(ChatTurn::assistant("a").role, MessageRole::Assistant);
}

#[test]
fn test_citation_style_mapping() {
    assert_eq!(CitationStyle::ALL.len(), 5);
    assert_eq!(
        CitationStyle::SocialSciences.style_name(),
        "APA 7th edition"
    );
    assert_eq!(CitationStyle::Engineering.style_name(), "IEEE");
    assert_eq!(CitationStyle::History.label(), "History");
}

#[test]
fn test_citation_style_parse() {
    assert_eq!(
        CitationStyle::parse("apa"),
        Some(CitationStyle::SocialSciences)
    );
    assert_eq!(
        CitationStyle::parse("Social Sciences"),
        Some(CitationStyle::SocialSciences)
    );
    assert_eq!(CitationStyle::parse("IEEE"), Some(CitationStyle::Engineering));
    assert_eq!(CitationStyle::parse("vancouver"), None);
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.data_dir, ".refscout");
    assert!(!config.debug);
    assert!(config.api_key.is_none());
    assert_eq!(config.base_url, "https://api.openai.com");
    assert_eq!(config.chat.model, "gpt-4o-mini");
    assert_eq!(config.chat.reply_language, "English");
    assert_eq!(config.search.paper_count, 3);
    assert_eq!(
        config.search.base_url,
        "https://export.arxiv.org/api/query"
    );
}

#[test]
fn test_config_has_api_key() {
    let mut config = AppConfig::default();
    assert!(!config.has_api_key());

    config.api_key = Some("test-key".into());
    assert!(config.has_api_key());

    config.api_key = Some("".into());
    assert!(!config.has_api_key());
}
