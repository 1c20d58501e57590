use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db,
    models::{base_request, ClientLanguage, Protocol, SnippetOverrides, SnippetRequest},
    snippets, telemetry,
};

/**
 * \brief HTTP 服务共享状态。
 * \details `db_path` 为空时不读取档案，仅使用请求参数与内置默认值。
 */
#[derive(Debug, Clone, Default)]
pub struct ServerState {
    db_path: Option<String>,
}

impl ServerState {
    pub fn from_env() -> Self {
        Self {
            db_path: Some(db::default_db_path()),
        }
    }

    pub fn with_db_path(path: &str) -> Self {
        Self {
            db_path: Some(path.to_string()),
        }
    }

    pub fn without_store() -> Self {
        Self { db_path: None }
    }
}

/**
 * \brief 启动本地 HTTP 服务，提供示例代码 API。
 * \param addr 监听地址，如 "127.0.0.1:5180"
 */
pub async fn run(addr: &str) -> Result<()> {
    let state = ServerState::from_env();
    if let Some(path) = &state.db_path {
        let conn = db::open_db(path)?;
        db::migrate(&conn)?;
        telemetry::set_enabled(db::get_telemetry_enabled(&conn)?);
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on http://{}", addr);
    telemetry::log_event("server", &format!("listening addr={}", addr));
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief 构建路由，便于在不绑定端口的情况下测试。
 */
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/languages", get(list_languages))
        .route("/api/snippets", get(all_snippets))
        .route("/api/snippets/{language}", get(one_snippet))
        .with_state(state)
}

#[derive(Serialize, Debug)]
struct LanguageItem {
    id: &'static str,
    title: &'static str,
}

#[derive(Serialize, Debug)]
struct LanguageList {
    languages: Vec<LanguageItem>,
}

#[derive(Serialize, Debug)]
struct SnippetDto {
    language: &'static str,
    title: &'static str,
    protocol: Protocol,
    code: String,
}

#[derive(Serialize, Debug)]
struct SnippetList {
    snippets: Vec<SnippetDto>,
}

fn internal_err<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

/**
 * \brief 合并默认档案与查询参数，查询参数优先。
 */
fn resolve_request(state: &ServerState, overrides: SnippetOverrides) -> Result<SnippetRequest> {
    let base = match &state.db_path {
        Some(path) => {
            let conn = db::open_db(path)?;
            let profile = db::get_default_profile(&conn)?;
            base_request(profile.as_ref(), Some(db::get_lang(&conn)?))
        }
        None => base_request(None, None),
    };
    Ok(overrides.apply(base))
}

fn snippet_dto(language: ClientLanguage, req: &SnippetRequest, code: String) -> SnippetDto {
    SnippetDto {
        language: language.as_str(),
        title: language.title(),
        protocol: req.protocol,
        code,
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/**
 * \brief 列出支持的客户端语言。
 */
async fn list_languages() -> Json<LanguageList> {
    let languages = ClientLanguage::ALL
        .iter()
        .map(|lang| LanguageItem {
            id: lang.as_str(),
            title: lang.title(),
        })
        .collect();
    Json(LanguageList { languages })
}

/**
 * \brief 生成指定语言的示例：GET /api/snippets/{language}?model=...&protocol=...
 */
async fn one_snippet(
    State(state): State<ServerState>,
    Path(language): Path<String>,
    Query(overrides): Query<SnippetOverrides>,
) -> Result<Json<SnippetDto>, (StatusCode, String)> {
    let language = language.parse::<ClientLanguage>().map_err(bad_request)?;
    let req = resolve_request(&state, overrides).map_err(|e| {
        telemetry::log_error("server.snippet", &format!("resolve failed: {}", e));
        internal_err(e)
    })?;
    let code = snippets::render(language, &req);
    telemetry::log_event(
        "server.snippet",
        &format!(
            "language={} protocol={} model={} port={}",
            language, req.protocol, req.model_id, req.port
        ),
    );
    Ok(Json(snippet_dto(language, &req, code)))
}

/**
 * \brief 一次生成所有语言的示例。
 */
async fn all_snippets(
    State(state): State<ServerState>,
    Query(overrides): Query<SnippetOverrides>,
) -> Result<Json<SnippetList>, (StatusCode, String)> {
    let req = resolve_request(&state, overrides).map_err(internal_err)?;
    let snippets = snippets::render_all(&req)
        .into_iter()
        .map(|(language, code)| snippet_dto(language, &req, code))
        .collect();
    telemetry::log_event(
        "server.snippet",
        &format!("language=all protocol={} model={}", req.protocol, req.model_id),
    );
    Ok(Json(SnippetList { snippets }))
}
