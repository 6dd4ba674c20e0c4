//! Deterministic HTTP fixtures for exercising the fetch client end to end.
//!
//! # Routes
//! - `/items`, `/items/{id}`: in-memory item store (list, create, get, patch,
//!   delete). Missing items answer `404` with a JSON error body.
//! - `/echo`: any method; answers with what was received.
//! - `/status/{code}`: answers `code` with a JSON body (`204` has none).
//! - `/text`: `text/plain` body.
//! - `/malformed/{code}`: `application/json` header over a non-JSON body.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub archived: Option<bool>,
}

/// What `/echo` saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

pub type Store = Arc<RwLock<BTreeMap<Uuid, Item>>>;

pub fn app() -> Router {
    let store: Store = Arc::default();
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).patch(patch_item).delete(delete_item))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/text", get(text))
        .route("/malformed/{code}", get(malformed))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

fn not_found(id: Uuid) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("item {id} not found")}))).into_response()
}

async fn list_items(State(store): State<Store>) -> Json<Vec<Item>> {
    Json(store.read().await.values().cloned().collect())
}

async fn create_item(State(store): State<Store>, Json(input): Json<NewItem>) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        archived: input.archived,
    };
    store.write().await.insert(item.id, item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn get_item(State(store): State<Store>, Path(id): Path<Uuid>) -> Response {
    match store.read().await.get(&id) {
        Some(item) => Json(item.clone()).into_response(),
        None => not_found(id),
    }
}

async fn patch_item(State(store): State<Store>, Path(id): Path<Uuid>, Json(patch): Json<ItemPatch>) -> Response {
    let mut items = store.write().await;
    let Some(item) = items.get_mut(&id) else {
        return not_found(id);
    };
    if let Some(name) = patch.name {
        item.name = name;
    }
    if let Some(archived) = patch.archived {
        item.archived = archived;
    }
    Json(item.clone()).into_response()
}

async fn delete_item(State(store): State<Store>, Path(id): Path<Uuid>) -> Response {
    match store.write().await.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(id),
    }
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        content_type: header_text(header::CONTENT_TYPE),
        authorization: header_text(header::AUTHORIZATION),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad status"}))).into_response();
    };
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, Json(status_body(code))).into_response()
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "plain text")
}

async fn malformed(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::OK);
    (status, [(header::CONTENT_TYPE, "application/json")], "{not json").into_response()
}

/// Body of a `/status` response, for callers decoding it.
pub fn status_body(code: u16) -> Value {
    json!({ "status": code })
}
