use crate::core::config::AppConfig;
use crate::core::error::StorageError;
use crate::core::message::MessageRole;
use crate::core::session::Session;
use crate::storage::Database;
use chrono::Utc;

async fn test_db() -> (Database, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        working_dir: tmp.path().to_path_buf(),
        ..Default::default()
    };
    let db = Database::open(&config).await.unwrap();
    db.run_migrations().await.unwrap();
    (db, tmp)
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (db, _tmp) = test_db().await;
    db.run_migrations().await.unwrap();
    db.run_migrations().await.unwrap();
}

#[tokio::test]
async fn test_session_round_trip() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("Transformer models".into());
    db.sessions().create(&session).await.unwrap();

    let fetched = db.sessions().get(&session.id).await.unwrap();
    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.title, "Transformer models");
    assert!(fetched.created_at <= Utc::now());
}

#[tokio::test]
async fn test_get_unknown_session_is_not_found() {
    let (db, _tmp) = test_db().await;
    let result = db.sessions().get("missing").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_rename_session() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("New conversation".into());
    db.sessions().create(&session).await.unwrap();

    db.sessions().rename(&session.id, "Graph networks").await.unwrap();
    let fetched = db.sessions().get(&session.id).await.unwrap();
    assert_eq!(fetched.title, "Graph networks");

    let result = db.sessions().rename("missing", "whatever").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_list_sessions_most_recent_first() {
    let (db, _tmp) = test_db().await;

    for i in 0..5 {
        let mut s = Session::new(format!("Session {i}"));
        // Force distinct, increasing creation times.
        s.created_at = Utc::now() + chrono::Duration::seconds(i as i64);
        db.sessions().create(&s).await.unwrap();
    }

    let all = db.sessions().list().await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].title, "Session 4");
    assert_eq!(all[4].title, "Session 0");
}

#[tokio::test]
async fn test_delete_session_cascades() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("Doomed".into());
    db.sessions().create(&session).await.unwrap();
    db.messages()
        .append(&session.id, MessageRole::User, "hello")
        .await
        .unwrap();
    db.messages()
        .append(&session.id, MessageRole::Assistant, "hi")
        .await
        .unwrap();

    db.sessions().delete(&session.id).await.unwrap();

    assert!(db.messages().list(&session.id).await.unwrap().is_empty());
    assert!(matches!(
        db.sessions().get(&session.id).await,
        Err(StorageError::NotFound(_))
    ));

    let result = db.sessions().delete(&session.id).await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_append_order_is_list_order() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("Ordering".into());
    db.sessions().create(&session).await.unwrap();

    // Appends land within the same millisecond; the autoincrement id, not
    // the timestamp, must carry the order.
    for i in 0..20 {
        let role = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        db.messages()
            .append(&session.id, role, &format!("msg {i}"))
            .await
            .unwrap();
    }

    let messages = db.messages().list(&session.id).await.unwrap();
    assert_eq!(messages.len(), 20);
    for (i, msg) in messages.iter().enumerate() {
        assert_eq!(msg.content, format!("msg {i}"));
    }
    assert!(messages.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_append_to_unknown_session_is_fk_violation() {
    let (db, _tmp) = test_db().await;

    let result = db
        .messages()
        .append("no-such-session", MessageRole::User, "orphan")
        .await;
    assert!(matches!(result, Err(StorageError::ForeignKeyViolation(_))));
}

#[tokio::test]
async fn test_list_messages_of_unknown_session_is_empty() {
    let (db, _tmp) = test_db().await;
    let messages = db.messages().list("no-such-session").await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_search_matches_literal_substring() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("Notes".into());
    db.sessions().create(&session).await.unwrap();
    db.messages()
        .append(&session.id, MessageRole::User, "papers on diffusion models")
        .await
        .unwrap();
    db.messages()
        .append(&session.id, MessageRole::Assistant, "Diffusion is popular.")
        .await
        .unwrap();

    let hits = db.messages().search("diffusion models").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].session_id, session.id);
    assert_eq!(hits[0].title, "Notes");
    assert!(hits[0].snippet.contains("diffusion models"));

    // Case-sensitive: "Diffusion" only matches the assistant message.
    let hits = db.messages().search("Diffusion").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].snippet.contains("Diffusion is popular."));

    let hits = db.messages().search("nothing like this").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_search_deduplicates_per_session_and_content() {
    let (db, _tmp) = test_db().await;

    let a = Session::new("A".into());
    let b = Session::new("B".into());
    db.sessions().create(&a).await.unwrap();
    db.sessions().create(&b).await.unwrap();

    // The same content twice in session A collapses to one hit; session B
    // contributes its own.
    for _ in 0..2 {
        db.messages()
            .append(&a.id, MessageRole::User, "about quantum entanglement")
            .await
            .unwrap();
    }
    db.messages()
        .append(&b.id, MessageRole::User, "more quantum entanglement papers")
        .await
        .unwrap();

    let hits = db.messages().search("quantum entanglement").await.unwrap();
    assert_eq!(hits.len(), 2);

    let mut pairs: Vec<(String, String)> = hits
        .iter()
        .map(|h| (h.session_id.clone(), h.snippet.clone()))
        .collect();
    pairs.dedup();
    assert_eq!(pairs.len(), 2);
}

#[tokio::test]
async fn test_search_orders_by_match_recency() {
    let (db, _tmp) = test_db().await;

    let old = Session::new("Old".into());
    let new = Session::new("New".into());
    db.sessions().create(&old).await.unwrap();
    db.sessions().create(&new).await.unwrap();

    db.messages()
        .append(&old.id, MessageRole::User, "keyword first")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    db.messages()
        .append(&new.id, MessageRole::User, "keyword second")
        .await
        .unwrap();

    let hits = db.messages().search("keyword").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "New");
    assert_eq!(hits[1].title, "Old");
    assert!(hits[0].matched_at >= hits[1].matched_at);
}

#[tokio::test]
async fn test_search_snippet_windows_long_content() {
    let (db, _tmp) = test_db().await;

    let session = Session::new("Long".into());
    db.sessions().create(&session).await.unwrap();

    let long = format!("{}needle{}", "a".repeat(500), "b".repeat(500));
    db.messages()
        .append(&session.id, MessageRole::Assistant, &long)
        .await
        .unwrap();

    let hits = db.messages().search("needle").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].snippet.contains("needle"));
    assert!(hits[0].snippet.chars().count() < 120);
    assert!(hits[0].snippet.starts_with('…'));
    assert!(hits[0].snippet.ends_with('…'));
}
