//! SupabaseClient tests against an in-process PostgREST stand-in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use datastore::{
    to_record, DataError, DataErrorKind, DataStore, DataStoreConfig, Filter, SupabaseClient,
};

const KEY: &str = "test-service-key";

#[derive(Clone, Default)]
struct FakeState {
    rows: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    apikey == Some(KEY) && bearer == Some(KEY)
}

async fn insert_row(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(row): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        );
    }
    if table == "locked" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "code": "42501",
                "message": "new row violates row-level security policy for table \"locked\""
            })),
        );
    }

    let mut rows = state.rows.lock().unwrap();
    if rows.iter().any(|r| r["phone_number"] == row["phone_number"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "code": "23505",
                "details": format!("Key (phone_number)=({}) already exists.", row["phone_number"]),
                "hint": null,
                "message": "duplicate key value violates unique constraint \"phone_numbers_pkey\""
            })),
        );
    }
    rows.push(row.clone());
    (StatusCode::CREATED, Json(json!([row])))
}

async fn select_rows(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        );
    }
    if table == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "42P01",
                "message": "relation \"public.missing\" does not exist"
            })),
        );
    }

    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let rows = state.rows.lock().unwrap();
    let matched: Vec<Value> = rows
        .iter()
        .filter(|row| {
            params
                .iter()
                .filter(|(k, _)| !["select", "limit", "order"].contains(&k.as_str()))
                .all(|(k, v)| {
                    v.strip_prefix("eq.")
                        .map(|want| row[k.as_str()] == Value::from(want))
                        .unwrap_or(false)
                })
        })
        .take(limit)
        .cloned()
        .collect();

    (StatusCode::OK, Json(Value::Array(matched)))
}

async fn spawn_fake() -> String {
    let app = Router::new()
        .route("/rest/v1/:table", get(select_rows).post(insert_row))
        .with_state(FakeState::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(url: &str, key: &str) -> SupabaseClient {
    SupabaseClient::new(&DataStoreConfig::new(url, key)).unwrap()
}

fn phone_row(number: &str, status: &str) -> datastore::Record {
    to_record(&json!({
        "phone_number": number,
        "rent_id": "r-1",
        "service": "whatsapp",
        "country": "DE",
        "end_date": "2024-06-16T00:00:00Z",
        "status": status,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    let stored = store
        .insert("phone_numbers", phone_row("+4915100000001", "active"))
        .await
        .unwrap();

    assert_eq!(stored["phone_number"], "+4915100000001");
    assert_eq!(stored["status"], "active");
}

#[tokio::test]
async fn test_duplicate_insert_is_unique_violation() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    store
        .insert("phone_numbers", phone_row("+4915100000002", "active"))
        .await
        .unwrap();
    let err = store
        .insert("phone_numbers", phone_row("+4915100000002", "active"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DataErrorKind::UniqueViolation);
}

#[tokio::test]
async fn test_select_applies_filter_and_limit() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    for (number, status) in [
        ("+4915100000010", "active"),
        ("+4915100000011", "active"),
        ("+4915100000012", "expired"),
    ] {
        store
            .insert("phone_numbers", phone_row(number, status))
            .await
            .unwrap();
    }

    let active = store
        .select("phone_numbers", &Filter::new().eq("status", "active"), None)
        .await
        .unwrap();
    assert_eq!(active.len(), 2);

    let limited = store
        .select("phone_numbers", &Filter::new(), Some(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_rejected_key_is_permission_denied() {
    let url = spawn_fake().await;
    let store = client(&url, "wrong-key");

    let err = store
        .insert("phone_numbers", phone_row("+4915100000020", "active"))
        .await
        .unwrap_err();

    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn test_row_level_policy_is_permission_denied() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    let err = store
        .insert("locked", phone_row("+4915100000021", "active"))
        .await
        .unwrap_err();

    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn test_unknown_table_is_generic() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    let err = store.ping("missing").await.unwrap_err();

    assert_eq!(err.kind(), DataErrorKind::Generic);
    assert!(matches!(err, DataError::Query { status: 404, .. }));
}

#[tokio::test]
async fn test_ping_succeeds_on_empty_table() {
    let url = spawn_fake().await;
    let store = client(&url, KEY);

    assert!(store.ping("phone_numbers").await.is_ok());
}

#[tokio::test]
async fn test_unreachable_host_is_generic_transport_failure() {
    let store = client("http://127.0.0.1:1", KEY);

    let err = store.ping("phone_numbers").await.unwrap_err();

    assert!(matches!(err, DataError::Transport(_)));
    assert_eq!(err.kind(), DataErrorKind::Generic);
}
