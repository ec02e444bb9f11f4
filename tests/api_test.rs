//! HTTP API behaviour driven in-process through the router

use ambulance_wl::adapters::database::{DocumentService, OperationContext};
use ambulance_wl::adapters::memory::InMemoryDocumentStore;
use ambulance_wl::api::{router, AppState, ErrorBody};
use ambulance_wl::domain::{Ambulance, Condition, WaitingListEntry};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<dyn DocumentService<Ambulance>>,
}

impl TestApp {
    fn new() -> Self {
        let store: Arc<dyn DocumentService<Ambulance>> =
            Arc::new(InMemoryDocumentStore::<Ambulance>::new("ambulance"));
        Self {
            router: router(AppState::new(Arc::clone(&store))),
            store,
        }
    }

    /// An app with one ambulance "gp" holding two predefined conditions
    async fn with_ambulance() -> Self {
        let app = Self::new();
        let mut ambulance = Ambulance::new("General practice", "101");
        ambulance.id = "gp".to_string();
        ambulance.predefined_conditions = vec![
            Condition::new("folowup", "Follow-up").with_typical_duration(20),
            Condition::new("nausea", "Nausea"),
        ];
        app.store
            .create_document(&OperationContext::new(), "gp", &ambulance)
            .await
            .unwrap();
        app
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn stored(&self, id: &str) -> Ambulance {
        self.store
            .find_document(&OperationContext::new(), id)
            .await
            .unwrap()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = TestApp::new();

    let health = app.send(Method::GET, "/health", None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = read_json(health).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["collection"], "ambulance");

    let openapi = app.send(Method::GET, "/openapi", None).await;
    assert_eq!(openapi.status(), StatusCode::OK);
    let doc: Value = read_json(openapi).await;
    assert!(doc["paths"]["/api/waiting-list/{ambulanceId}/entries"].is_object());
}

#[tokio::test]
async fn test_create_ambulance_generates_id() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/ambulance",
            Some(json!({"name": "Dermatology", "roomNumber": "204"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Ambulance = read_json(response).await;
    assert!(!created.id.is_empty());
    assert_eq!(app.stored(&created.id).await.room_number, "204");

    let list = app.send(Method::GET, "/api/ambulance", None).await;
    let all: Vec<Ambulance> = read_json(list).await;
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_create_ambulance_rejects_endless_durations() {
    let app = TestApp::new();
    let since = Utc::now();
    let entries: Vec<Value> = (0..40)
        .map(|i| {
            json!({
                "id": format!("e{i}"),
                "patientId": format!("p{i}"),
                "waitingSince": since,
                "estimatedStart": since,
                "estimatedDurationMinutes": u32::MAX,
            })
        })
        .collect();

    let response = app
        .send(
            Method::POST,
            "/api/ambulance",
            Some(json!({"id": "long", "name": "Long", "roomNumber": "1", "waitingList": entries})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = app.send(Method::GET, "/api/ambulance", None).await;
    let all: Vec<Ambulance> = read_json(list).await;
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_ambulance_conflict_and_bad_body() {
    let app = TestApp::with_ambulance().await;

    let conflict = app
        .send(
            Method::POST,
            "/api/ambulance",
            Some(json!({"id": "gp", "name": "Again", "roomNumber": "1"})),
        )
        .await;
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    let body: ErrorBody = read_json(conflict).await;
    assert_eq!(body.status, "Conflict");
    assert_eq!(body.message, "Ambulance already exists");

    let malformed = app
        .send(Method::POST, "/api/ambulance", Some(json!({"name": 5})))
        .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = read_json(malformed).await;
    assert_eq!(body.status, "Bad Request");
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_delete_ambulance() {
    let app = TestApp::with_ambulance().await;

    let deleted = app.send(Method::DELETE, "/api/ambulance/gp", None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = app.send(Method::DELETE, "/api/ambulance/gp", None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = read_json(again).await;
    assert_eq!(body.status, "Not Found");
    assert_eq!(body.message, "Ambulance not found");
}

#[tokio::test]
async fn test_create_entry_applies_defaults_and_reconciles() {
    let app = TestApp::with_ambulance().await;
    let before = Utc::now();

    let first = app
        .send(
            Method::POST,
            "/api/waiting-list/gp/entries",
            Some(json!({"patientId": "p1", "conditionCode": "folowup"})),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: WaitingListEntry = read_json(first).await;
    assert!(!first.id.is_empty());
    assert_eq!(first.estimated_duration_minutes, 20);
    assert!(first.waiting_since >= before);
    assert!(first.estimated_start >= before);

    let second = app
        .send(
            Method::POST,
            "/api/waiting-list/gp/entries",
            Some(json!({"id": "e2", "patientId": "p2"})),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second: WaitingListEntry = read_json(second).await;
    assert_eq!(second.id, "e2");
    assert_eq!(second.estimated_duration_minutes, 15);
    assert!(second.estimated_start >= first.estimated_end().unwrap());

    let listed = app
        .send(Method::GET, "/api/waiting-list/gp/entries", None)
        .await;
    let entries: Vec<WaitingListEntry> = read_json(listed).await;
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, [first.id.as_str(), "e2"]);
}

#[tokio::test]
async fn test_create_entry_rejections() {
    let app = TestApp::with_ambulance().await;
    let created = app
        .send(
            Method::POST,
            "/api/waiting-list/gp/entries",
            Some(json!({"id": "e1", "patientId": "p1"})),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let cases = [
        (json!({"id": "e1", "patientId": "p9"}), StatusCode::CONFLICT),
        (json!({"patientId": "p1"}), StatusCode::CONFLICT),
        (json!({"patientId": ""}), StatusCode::BAD_REQUEST),
        (
            json!({"patientId": "p3", "conditionCode": "fever"}),
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (body, expected) in cases {
        let response = app
            .send(Method::POST, "/api/waiting-list/gp/entries", Some(body.clone()))
            .await;
        assert_eq!(response.status(), expected, "body {body}");
    }

    let missing = app
        .send(
            Method::POST,
            "/api/waiting-list/nope/entries",
            Some(json!({"patientId": "p1"})),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    // Rejected requests left the stored list untouched
    assert_eq!(app.stored("gp").await.waiting_list.len(), 1);
}

#[tokio::test]
async fn test_get_update_and_delete_entry() {
    let app = TestApp::with_ambulance().await;
    let now = Utc::now();
    for (id, patient, minutes_ago) in [("e1", "p1", 30), ("e2", "p2", 10)] {
        let response = app
            .send(
                Method::POST,
                "/api/waiting-list/gp/entries",
                Some(json!({
                    "id": id,
                    "patientId": patient,
                    "waitingSince": now - Duration::minutes(minutes_ago),
                    "estimatedDurationMinutes": 10
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let fetched = app
        .send(Method::GET, "/api/waiting-list/gp/entries/e2", None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);

    let updated = app
        .send(
            Method::PUT,
            "/api/waiting-list/gp/entries/e1",
            Some(json!({"id": "e1", "name": "Jana", "estimatedDurationMinutes": 40})),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: WaitingListEntry = read_json(updated).await;
    assert_eq!(updated.name.as_deref(), Some("Jana"));
    assert_eq!(updated.estimated_duration_minutes, 40);

    let stored = app.stored("gp").await;
    assert!(stored.waiting_list[1].estimated_start >= stored.waiting_list[0].estimated_end().unwrap());

    let mismatch = app
        .send(
            Method::PUT,
            "/api/waiting-list/gp/entries/e1",
            Some(json!({"id": "e2"})),
        )
        .await;
    assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);

    let taken = app
        .send(
            Method::PUT,
            "/api/waiting-list/gp/entries/e1",
            Some(json!({"patientId": "p2"})),
        )
        .await;
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let deleted = app
        .send(Method::DELETE, "/api/waiting-list/gp/entries/e1", None)
        .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = app
        .send(Method::GET, "/api/waiting-list/gp/entries/e1", None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = read_json(gone).await;
    assert_eq!(body.message, "Entry not found");

    let last = app
        .send(Method::DELETE, "/api/waiting-list/gp/entries/e2", None)
        .await;
    assert_eq!(last.status(), StatusCode::NO_CONTENT);
    assert!(app.stored("gp").await.waiting_list.is_empty());
}

#[tokio::test]
async fn test_conditions() {
    let app = TestApp::with_ambulance().await;

    let response = app
        .send(Method::GET, "/api/waiting-list/gp/condition", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let conditions: Vec<Condition> = read_json(response).await;
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0].typical_duration_minutes, Some(20));

    let missing = app
        .send(Method::GET, "/api/waiting-list/nope/condition", None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
