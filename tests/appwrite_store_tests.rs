use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use reelscout::clients::appwrite::AppwriteClient;
use reelscout::config::AppwriteConfig;
use reelscout::domain::MovieId;
use reelscout::models::MovieSummary;
use reelscout::services::{AppwriteTrendingStore, StoreError, TrendingStore};
use serde_json::{Map, Value, json};

const DOCUMENTS: &str = "/v1/databases/db1/collections/metrics/documents";

#[derive(Clone, Default)]
struct FakeAppwrite {
    documents: Arc<Mutex<Vec<Map<String, Value>>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-appwrite-project").and_then(|h| h.to_str().ok()) == Some("proj")
        && headers.get("x-appwrite-key").and_then(|h| h.to_str().ok()) == Some("secret")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Missing scope", "code": 401 })),
    )
        .into_response()
}

async fn list(
    State(fake): State<FakeAppwrite>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let queries: Vec<Value> = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == "queries[]")
        .filter_map(|(_, v)| serde_json::from_str(&v).ok())
        .collect();

    let mut docs = fake.documents.lock().unwrap().clone();
    let mut limit = 25;

    for q in &queries {
        match q["method"].as_str() {
            Some("equal") => {
                let attr = q["attribute"].as_str().unwrap_or_default();
                let wanted = &q["values"][0];
                docs.retain(|d| d.get(attr) == Some(wanted));
            }
            Some("orderDesc") => {
                let attr = q["attribute"].as_str().unwrap_or_default().to_string();
                docs.sort_by_key(|d| {
                    std::cmp::Reverse(d.get(&attr).and_then(Value::as_u64).unwrap_or(0))
                });
            }
            Some("limit") => limit = q["values"][0].as_u64().unwrap_or(25) as usize,
            _ => {}
        }
    }

    let total = docs.len();
    docs.truncate(limit);
    Json(json!({ "total": total, "documents": docs })).into_response()
}

async fn create(
    State(fake): State<FakeAppwrite>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut doc = body["data"].as_object().cloned().unwrap_or_default();
    doc.insert("$id".to_string(), body["documentId"].clone());
    fake.documents.lock().unwrap().push(doc.clone());
    (StatusCode::CREATED, Json(Value::Object(doc))).into_response()
}

async fn update(
    State(fake): State<FakeAppwrite>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut docs = fake.documents.lock().unwrap();
    let Some(doc) = docs.iter_mut().find(|d| d["$id"] == id.as_str()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Document not found" })),
        )
            .into_response();
    };

    if let Some(data) = body["data"].as_object() {
        for (k, v) in data {
            doc.insert(k.clone(), v.clone());
        }
    }
    Json(Value::Object(doc.clone())).into_response()
}

async fn spawn_fake_appwrite() -> (String, FakeAppwrite) {
    let fake = FakeAppwrite::default();
    let app = Router::new()
        .route(DOCUMENTS, get(list).post(create))
        .route(&format!("{DOCUMENTS}/{{id}}"), patch(update))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), fake)
}

fn store_for(endpoint: &str, api_key: &str) -> AppwriteTrendingStore {
    let config = AppwriteConfig {
        endpoint: endpoint.to_string(),
        project_id: "proj".to_string(),
        api_key: api_key.to_string(),
        database_id: "db1".to_string(),
        collection_id: "metrics".to_string(),
        ..AppwriteConfig::default()
    };
    AppwriteTrendingStore::new(
        AppwriteClient::new(&config),
        "https://image.tmdb.org/t/p/w500",
    )
}

fn movie(id: u64, poster: Option<&str>) -> MovieSummary {
    MovieSummary {
        id: MovieId::new(id),
        title: format!("Movie {id}"),
        poster_path: poster.map(str::to_string),
        popularity: None,
        vote_average: None,
        release_date: None,
        original_language: None,
    }
}

#[tokio::test]
async fn first_record_creates_document_with_poster() {
    let (endpoint, fake) = spawn_fake_appwrite().await;
    let store = store_for(&endpoint, "secret");

    store
        .record_search("dune", &movie(438631, Some("/dune.jpg")))
        .await
        .unwrap();

    let docs = fake.documents.lock().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["searchTerm"], "dune");
    assert_eq!(docs[0]["count"], 1);
    assert_eq!(docs[0]["movie_id"], 438631);
    assert_eq!(
        docs[0]["poster_url"],
        "https://image.tmdb.org/t/p/w500/dune.jpg"
    );
}

#[tokio::test]
async fn repeat_record_increments_count_and_keeps_poster() {
    let (endpoint, fake) = spawn_fake_appwrite().await;
    let store = store_for(&endpoint, "secret");

    store
        .record_search("dune", &movie(438631, Some("/dune.jpg")))
        .await
        .unwrap();
    store
        .record_search("dune", &movie(841, Some("/other.jpg")))
        .await
        .unwrap();

    let docs = fake.documents.lock().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["count"], 2);
    assert_eq!(docs[0]["movie_id"], 438631);
    assert_eq!(
        docs[0]["poster_url"],
        "https://image.tmdb.org/t/p/w500/dune.jpg"
    );
}

#[tokio::test]
async fn top_entries_are_ordered_by_count_and_limited() {
    let (endpoint, _) = spawn_fake_appwrite().await;
    let store = store_for(&endpoint, "secret");

    let counts = [
        ("alien", 3),
        ("batman", 1),
        ("cars", 6),
        ("dune", 2),
        ("elf", 5),
        ("fargo", 4),
    ];
    for (i, (term, n)) in counts.iter().enumerate() {
        for _ in 0..*n {
            store
                .record_search(term, &movie(i as u64 + 1, None))
                .await
                .unwrap();
        }
    }

    let top = store.top_entries(5).await.unwrap();
    let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();

    assert_eq!(terms, vec!["cars", "elf", "fargo", "alien", "dune"]);
    assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(top.iter().all(|e| e.poster_url.is_none()));
}

#[tokio::test]
async fn empty_collection_yields_no_entries() {
    let (endpoint, _) = spawn_fake_appwrite().await;
    let top = store_for(&endpoint, "secret").top_entries(5).await.unwrap();
    assert!(top.is_empty());
}

#[tokio::test]
async fn rejected_credentials_surface_remote_error() {
    let (endpoint, _) = spawn_fake_appwrite().await;
    let err = store_for(&endpoint, "wrong")
        .top_entries(5)
        .await
        .unwrap_err();

    match err {
        StoreError::Remote { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Missing scope");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}
