//! Router and OpenAPI document

use super::error::ErrorBody;
use super::handlers::{ambulances, health, waiting_list};
use super::models::{HealthResponse, NewWaitingListEntry, WaitingListEntryUpdate};
use super::state::AppState;
use crate::domain::{Ambulance, Condition, WaitingListEntry};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waiting List Api",
        description = "Ambulance waiting list management for Web-In-Cloud system"
    ),
    paths(
        health::health,
        ambulances::create_ambulance,
        ambulances::list_ambulances,
        ambulances::delete_ambulance,
        waiting_list::get_waiting_list_entries,
        waiting_list::create_waiting_list_entry,
        waiting_list::get_waiting_list_entry,
        waiting_list::update_waiting_list_entry,
        waiting_list::delete_waiting_list_entry,
        waiting_list::get_conditions,
    ),
    components(schemas(
        Ambulance,
        WaitingListEntry,
        Condition,
        NewWaitingListEntry,
        WaitingListEntryUpdate,
        HealthResponse,
        ErrorBody,
    )),
    tags(
        (name = "ambulances", description = "Ambulance details"),
        (name = "waiting-list", description = "Ambulance waiting list management"),
        (name = "health", description = "Service liveness")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document as JSON
async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the application router over the given state
///
/// CORS is left to the caller since it depends on the environment.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/ambulance",
            get(ambulances::list_ambulances).post(ambulances::create_ambulance),
        )
        .route(
            "/ambulance/:ambulanceId",
            axum::routing::delete(ambulances::delete_ambulance),
        )
        .route(
            "/waiting-list/:ambulanceId/entries",
            get(waiting_list::get_waiting_list_entries)
                .post(waiting_list::create_waiting_list_entry),
        )
        .route(
            "/waiting-list/:ambulanceId/entries/:entryId",
            get(waiting_list::get_waiting_list_entry)
                .put(waiting_list::update_waiting_list_entry)
                .delete(waiting_list::delete_waiting_list_entry),
        )
        .route(
            "/waiting-list/:ambulanceId/condition",
            get(waiting_list::get_conditions),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health))
        .route("/openapi", get(openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
