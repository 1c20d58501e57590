//! Integration tests for the `/api/*` snippet endpoints.
//!
//! Routes are exercised in-process through `tower::ServiceExt::oneshot`, so no
//! port is bound. Most tests run without a profile store; the store-backed
//! tests use a throwaway SQLite file under the system temp directory.

use antigravity_snippets_core::db;
use antigravity_snippets_core::models::Protocol;
use antigravity_snippets_core::server::{router, ServerState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn get(state: ServerState, uri: &str) -> axum::response::Response {
    router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn parse_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|e| panic!("Expected valid JSON body: {e}"))
}

fn temp_db(name: &str) -> String {
    let path = std::env::temp_dir().join(format!(
        "ag-snippets-{}-{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    let path = path.to_string_lossy().to_string();
    let conn = db::open_db(&path).expect("open temp db");
    db::migrate(&conn).expect("migrate temp db");
    path
}

#[tokio::test]
async fn health_returns_ok() {
    let response = get(ServerState::without_store(), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn languages_are_listed_in_order() {
    let response = get(ServerState::without_store(), "/api/languages").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    let ids: Vec<&str> = json["languages"]
        .as_array()
        .expect("languages array")
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["python", "nodejs", "go", "curl", "rust"]);
}

#[tokio::test]
async fn python_snippet_uses_query_parameters() {
    let response = get(
        ServerState::without_store(),
        "/api/snippets/python?model=gpt-4o&protocol=openai&port=8080&api_key=sk-test&lang=en",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    assert_eq!(json["language"], "python");
    assert_eq!(json["protocol"], "openai");
    let code = json["code"].as_str().unwrap();
    assert!(code.contains(r#"base_url="http://127.0.0.1:8080/v1""#));
    assert!(code.contains(r#"api_key="sk-test""#));
    assert!(code.contains(r#"model="gpt-4o""#));
}

#[tokio::test]
async fn language_alias_and_unknown_protocol_are_accepted() {
    let response = get(
        ServerState::without_store(),
        "/api/snippets/golang?model=m&protocol=mystery&port=1234&api_key=k",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    assert_eq!(json["language"], "go");
    assert_eq!(json["protocol"], "openai");
    assert!(json["code"].as_str().unwrap().contains("go-openai"));
}

#[tokio::test]
async fn unknown_language_is_rejected() {
    let response = get(ServerState::without_store(), "/api/snippets/cobol").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_parameters_fall_back_to_defaults() {
    let response = get(ServerState::without_store(), "/api/snippets/curl").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    assert!(json["code"]
        .as_str()
        .unwrap()
        .contains("http://127.0.0.1:8045/v1/chat/completions"));
}

#[tokio::test]
async fn all_snippets_cover_every_language() {
    let response = get(
        ServerState::without_store(),
        "/api/snippets?model=claude-3-opus&protocol=anthropic&port=9000&api_key=key123&lang=zh",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    let snippets = json["snippets"].as_array().expect("snippets array");
    assert_eq!(snippets.len(), 5);
    for item in snippets {
        assert_eq!(item["protocol"], "anthropic");
        let code = item["code"].as_str().unwrap();
        assert!(code.contains("key123"));
        assert!(code.contains("claude-3-opus"));
    }
}

#[tokio::test]
async fn stored_profile_fills_missing_parameters() {
    let path = temp_db("profile");
    {
        let conn = db::open_db(&path).expect("open");
        db::upsert_default_profile(&conn, "default", 9100, "sk-stored", "claude-3-5-sonnet", Protocol::Anthropic)
            .expect("save profile");
        db::set_lang(&conn, "zh-CN").expect("save lang");
    }

    let response = get(ServerState::with_db_path(&path), "/api/snippets/nodejs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_json(response).await;
    assert_eq!(json["protocol"], "anthropic");
    let code = json["code"].as_str().unwrap();
    assert!(code.contains("baseURL: 'http://127.0.0.1:9100',"));
    assert!(code.contains("apiKey: 'sk-stored',"));

    let response = get(
        ServerState::with_db_path(&path),
        "/api/snippets/python?protocol=gemini&model=gemini-2.5-pro",
    )
    .await;
    let json = parse_json(response).await;
    let code = json["code"].as_str().unwrap();
    assert!(code.contains("# 需要安装: pip install google-generativeai"));
    assert!(code.contains("'api_endpoint': 'http://127.0.0.1:9100'"));

    let _ = std::fs::remove_file(&path);
}
