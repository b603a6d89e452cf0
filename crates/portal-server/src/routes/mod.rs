//! Route table

mod chat;
mod equipment;
mod faq;
mod notices;
mod settings;
mod teams;
mod uploads;
mod vehicles;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use portal_app::Portal;
use portal_infra::uploads::{MAX_UPLOAD_BYTES, UPLOAD_URL_PREFIX};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the portal router
pub fn router(portal: Portal) -> Router {
    let upload_dir = portal.uploads.store().dir().to_path_buf();

    let api = Router::new()
        .route("/health", get(health))
        .route("/notices", get(notices::list).post(notices::create))
        .route(
            "/notices/:id",
            get(notices::get).put(notices::update).delete(notices::delete),
        )
        .route("/requests/:id/status", put(notices::set_request_status))
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route("/vehicles/:id", put(vehicles::update).delete(vehicles::delete))
        .route("/teams", get(teams::list))
        .route("/teams/export", get(teams::export))
        .route("/teams/:id", put(teams::update))
        .route("/conversations", get(chat::list).post(chat::create))
        .route("/conversations/:id", get(chat::get).delete(chat::delete))
        .route("/conversations/:id/messages", post(chat::send_message))
        .route("/upload", post(uploads::image))
        .route("/upload/file", post(uploads::file))
        .route("/settings/lock", get(settings::get_lock).put(settings::set_lock))
        .route("/equipment/teams", get(equipment::teams))
        .route("/equipment/summary", get(equipment::summary))
        .route("/equipment/import", post(equipment::import))
        .route("/equipment/bulk-add", post(equipment::bulk_add))
        .route("/equipment/export", get(equipment::export))
        .route("/faq", get(faq::answer));

    Router::new()
        .nest("/api", api)
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(portal)
}
