//! Integration tests for the login flow and the typed API bindings.

use std::sync::Arc;

use perch_core::session::store::{CredentialStore, FileCredentialStore};
use perch_core::session::{Navigator, Session, SessionClient};
use perch_core::{api, auth};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct QuietNavigator;

impl Navigator for QuietNavigator {
    fn redirect_to_landing(&self) {}
}

fn client_with_store(base_url: &str) -> (tempfile::TempDir, Arc<FileCredentialStore>, SessionClient) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileCredentialStore::new(dir.path().join("session.json")));
    let client = SessionClient::new(
        base_url,
        false,
        Arc::clone(&store) as Arc<dyn CredentialStore>,
        Arc::new(QuietNavigator),
    )
    .unwrap();
    (dir, store, client)
}

#[tokio::test]
async fn test_login_stores_token_from_callback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/google/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "authorization_url": "https://accounts.google.com/o/oauth2/v2/auth?client_id=x"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/google/callback"))
        .and(query_param("code", "abc"))
        .and(query_param("state", "xyz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "tok-123456789012345"})),
        )
        .mount(&server)
        .await;

    let (_dir, store, client) = client_with_store(&server.uri());

    let url = auth::authorization_url(&client).await.unwrap();
    assert!(url.starts_with("https://accounts.google.com/"));

    // paste the full redirect URL, as a user would
    let token = auth::complete_login(
        &client,
        "https://localhost:5173/oauth/callback?code=abc&state=xyz",
    )
    .await
    .unwrap();

    assert_eq!(token, "tok-123456789012345");
    assert_eq!(
        store.session_token().unwrap().as_deref(),
        Some("tok-123456789012345")
    );
}

#[tokio::test]
async fn test_logout_clears_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path().join("session.json"));
    store.set_session_token("abc123").unwrap();

    auth::logout(&store).unwrap();
    assert!(store.session_token().unwrap().is_none());

    // logging out twice is fine
    auth::logout(&store).unwrap();
}

#[tokio::test]
async fn test_open_persona_remembers_identifiers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/add_persona"))
        .and(body_json(serde_json::json!({
            "persona_name": "ada",
            "persona_description": "ada",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "persona_id": 3,
            "persona_name": "ada",
            "user_id": "u-42",
            "conversation_id": 7,
        })))
        .mount(&server)
        .await;

    let (_dir, store, client) = client_with_store(&server.uri());
    store.set_session_token("abc123").unwrap();

    let outcome = api::personas::open(&client, "ada", "ada").await.unwrap();
    let Session::Active(handle) = outcome else {
        panic!("expected a persona handle");
    };

    assert_eq!(handle.conversation_id, 7);
    // ids cached next to the token, for the 401 teardown to remove
    assert_eq!(store.user_id().unwrap().as_deref(), Some("u-42"));
    assert_eq!(store.persona_id().unwrap(), Some(3));
}

#[tokio::test]
async fn test_persona_list_unwraps_names() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/get_user_personas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "persona_names": [
                {"persona_name": "ada"},
                {"persona_name": "turing"},
            ]
        })))
        .mount(&server)
        .await;

    let (_dir, _store, client) = client_with_store(&server.uri());
    let outcome = api::personas::list(&client).await.unwrap();

    let Session::Active(names) = outcome else {
        panic!("expected persona names");
    };
    assert_eq!(names, vec!["ada".to_string(), "turing".to_string()]);
}

#[tokio::test]
async fn test_ask_decodes_bare_json_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/get_answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
            "Nice to meet you."
        )))
        .mount(&server)
        .await;

    let (_dir, _store, client) = client_with_store(&server.uri());
    let outcome = api::chat::ask(&client, 7, "ada", "hey", 0.1).await.unwrap();

    assert_eq!(outcome.into_active().as_deref(), Some("Nice to meet you."));
}

#[tokio::test]
async fn test_pdf_export_uses_server_filename() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/pdf_conversation"))
        .and(body_json(serde_json::json!({"conversation_id": 7})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=conversation_with_ada.pdf",
                )
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 fake".to_vec()),
        )
        .mount(&server)
        .await;

    let (_dir, _store, client) = client_with_store(&server.uri());
    let outcome = api::export::conversation_pdf(&client, 7).await.unwrap();

    let Session::Active(pdf) = outcome else {
        panic!("expected a PDF");
    };
    assert_eq!(pdf.filename, "conversation_with_ada.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_transcribe_uploads_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"text": "hello from audio"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, _store, client) = client_with_store(&server.uri());
    let outcome = api::transcribe::transcribe(&client, vec![0u8; 16], "memo.mp3")
        .await
        .unwrap();

    assert_eq!(outcome.into_active().as_deref(), Some("hello from audio"));
}

#[tokio::test]
async fn test_transcribe_rejects_unsupported_extension() {
    // the request must fail before anything is sent
    let (_dir, _store, client) = client_with_store("http://127.0.0.1:9");
    let result = api::transcribe::transcribe(&client, vec![0u8; 16], "memo.wav").await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("mp3"), "unexpected error: {err}");
}
