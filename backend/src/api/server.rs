//! HTTP Server for the AttendMe API.
//!
//! # API Endpoints
//!
//! | Method | Path                           | Description                      |
//! |--------|--------------------------------|----------------------------------|
//! | GET    | `/health`                      | Health check                     |
//! | GET    | `/api/get_loaded_people`       | Roster                           |
//! | POST   | `/api/add_person`              | Add a person (JSON)              |
//! | DELETE | `/api/remove_person/{id}`      | Remove a person and their images |
//! | POST   | `/api/upload_image/{id}`       | One person image (multipart)     |
//! | GET    | `/api/get_target_images`       | Target gallery                   |
//! | POST   | `/api/append_target_images`    | Target files (multipart)         |
//! | POST   | `/api/delete_target_images`    | Delete targets by public id      |
//! | GET    | `/media/{key}`                 | Stored bytes                     |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{
        multipart::Field, rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State,
    },
    http::{header, Method},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::types::*;
use crate::error::{ServerError, ServerResult};
use crate::store::{Store, DEFAULT_MAX_IMAGES};

/// Upload bodies above this size are refused.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_images: usize,
    /// Preload demo people.
    pub seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            max_images: DEFAULT_MAX_IMAGES,
            seed: false,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // permissive, the frontend is served from another origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/get_loaded_people", get(get_loaded_people))
        .route("/api/add_person", post(add_person))
        .route("/api/remove_person/{id}", delete(remove_person))
        .route("/api/upload_image/{id}", post(upload_image))
        .route("/api/get_target_images", get(get_target_images))
        .route("/api/append_target_images", post(append_target_images))
        .route("/api/delete_target_images", post(delete_target_images))
        .route("/media/{*key}", get(media))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until the process ends.
pub async fn serve(listener: TcpListener, store: Store) -> ServerResult<()> {
    let app = build_router(AppState::new(store));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let mut store = Store::new(config.max_images);
    if config.seed {
        store.seed_demo();
        tracing::info!("Seeded {} demo people", store.people().len());
    }

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 AttendMe server running on http://{}", addr);
    tracing::info!("   Max images per person: {}", config.max_images);

    serve(listener, store).await
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "attendme",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// People
// =============================================================================

async fn get_loaded_people(State(state): State<AppState>) -> Json<Success<PeopleBody>> {
    let store = state.store.read().await;
    let people = store.people().iter().map(PersonView::from).collect();
    Json(Success::new(PeopleBody { people }))
}

async fn add_person(
    State(state): State<AppState>,
    payload: Result<Json<AddPersonRequest>, JsonRejection>,
) -> ServerResult<Json<Success<AddPersonBody>>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let mut store = state.store.write().await;
    let person = store.add_person(&request.first_name, &request.last_name, &request.id_number)?;
    tracing::info!("➕ Added {} ({})", person.full_name(), person.id);

    Ok(Json(Success::new(AddPersonBody {
        person_id: person.id.clone(),
        message: format!("{} added successfully", person.full_name()),
    })))
}

async fn remove_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Success<MessageBody>>> {
    let person = state.store.write().await.remove_person(&id)?;
    tracing::info!("🗑️ Removed {} ({})", person.full_name(), person.id);

    Ok(Json(Success::new(MessageBody {
        message: format!("{} removed successfully", person.full_name()),
    })))
}

/// Bytes and content type of a multipart file part.
async fn read_part(field: Field<'_>) -> ServerResult<(String, String, Vec<u8>)> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
    Ok((file_name, content_type, bytes.to_vec()))
}

fn multipart_error(e: impl std::fmt::Display) -> ServerError {
    ServerError::BadRequest(format!("Multipart error: {}", e))
}

async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ServerResult<Json<Success<ImageUploadBody>>> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("image") {
            image = Some(read_part(field).await?);
            break;
        }
    }
    let (file_name, content_type, bytes) =
        image.ok_or_else(|| ServerError::BadRequest("No image provided".into()))?;

    let mut store = state.store.write().await;
    let image_count = store.add_person_image(&id, &content_type, bytes)?;
    let can_add_more = image_count < store.max_images();
    tracing::info!("📷 {} stored for {} ({} images)", file_name, id, image_count);

    Ok(Json(Success::new(ImageUploadBody {
        image_count,
        can_add_more,
        message: format!("Image {} uploaded successfully", image_count),
    })))
}

// =============================================================================
// Targets
// =============================================================================

async fn get_target_images(State(state): State<AppState>) -> Json<Success<TargetListBody>> {
    let store = state.store.read().await;
    let files = store.targets().iter().map(TargetView::from).collect();
    Json(Success::new(TargetListBody::new(files, store.target_counts())))
}

async fn append_target_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<Success<TargetAppendBody>>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if matches!(field.name(), Some("target_images") | Some("target_images[]")) {
            parts.push(read_part(field).await?);
        }
    }
    if parts.is_empty() {
        return Err(ServerError::BadRequest("No files provided".into()));
    }

    let mut store = state.store.write().await;
    let uploaded_count = parts.len();
    for (file_name, content_type, bytes) in parts {
        store.add_target(&file_name, &content_type, bytes);
    }
    let total_count = store.targets().len();
    tracing::info!("🎯 {} target files added ({} total)", uploaded_count, total_count);

    Ok(Json(Success::new(TargetAppendBody {
        uploaded_count,
        total_count,
    })))
}

async fn delete_target_images(
    State(state): State<AppState>,
    payload: Result<Json<DeleteTargetsRequest>, JsonRejection>,
) -> ServerResult<Json<Success<TargetDeleteBody>>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let deleted_count = state
        .store
        .write()
        .await
        .delete_targets(&request.public_ids)?;
    tracing::info!("🗑️ {} target files deleted", deleted_count);

    Ok(Json(Success::new(TargetDeleteBody { deleted_count })))
}

async fn media(State(state): State<AppState>, Path(key): Path<String>) -> ServerResult<Response> {
    let store = state.store.read().await;
    let blob = store
        .media(&key)
        .ok_or_else(|| ServerError::NotFound(key.clone()))?;
    Ok((
        [(header::CONTENT_TYPE, blob.content_type.clone())],
        blob.bytes.clone(),
    )
        .into_response())
}
