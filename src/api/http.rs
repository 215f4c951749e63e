//! HTTP API Server
//!
//! REST API for user CRUD and cluster topology queries. Handlers are
//! thin: decode the request, call exactly one repository or topology
//! operation on the shared session, encode the result.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::store::{ClusterConnection, ClusterNode, User, UserRepository};

/// Shared application state
pub struct AppState {
    /// User repository over the shared session
    pub repo: UserRepository,
    /// Cluster connection, for topology queries
    pub cluster: ClusterConnection,
}

/// HTTP API server
pub struct HttpServer {
    config: ApiConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: ApiConfig, repo: UserRepository, cluster: ClusterConnection) -> Self {
        let state = Arc::new(AppState { repo, cluster });
        Self { config, state }
    }

    /// Get the router, for serving or for driving requests in tests
    pub fn router(&self) -> Router {
        Self::create_router(Arc::clone(&self.state), self.config.cors_enabled)
    }

    /// Create the router
    fn create_router(state: Arc<AppState>, cors_enabled: bool) -> Router {
        let router = Router::new()
            .route("/users", post(handle_create_user).get(handle_list_users))
            .route(
                "/users/:id",
                get(handle_get_user)
                    .put(handle_update_user)
                    .delete(handle_delete_user),
            )
            .route("/cluster/nodes", get(handle_cluster_nodes))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if cors_enabled {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start the HTTP server
    ///
    /// Called only after schema bootstrap completed, so no request can
    /// observe a missing keyspace or table.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            tracing::info!("HTTP API disabled");
            return Ok(());
        }

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&self.config.bind_address).await?;
        tracing::info!("HTTP API listening on {}", self.config.bind_address);

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

// ============ Request/Response Types ============

/// Create/update request body
#[derive(Debug, Deserialize, Serialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Confirmation response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Cluster topology response
#[derive(Debug, Serialize)]
pub struct NodesResponse {
    pub node_count: usize,
    pub nodes: Vec<ClusterNode>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-boundary error wrapper mapping crate errors to status codes
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidId(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ============ Handlers ============

async fn handle_create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserPayload>,
) -> std::result::Result<(StatusCode, Json<User>), ApiError> {
    let user = state.repo.create(req.name, req.email).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn handle_get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Response, ApiError> {
    match state.repo.get(&id).await? {
        Some(user) => Ok(Json(user).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("user {} not found", id),
            }),
        )
            .into_response()),
    }
}

async fn handle_list_users(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<User>>, ApiError> {
    let users = state.repo.list_all().await?;
    Ok(Json(users))
}

async fn handle_update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UserPayload>,
) -> std::result::Result<Json<User>, ApiError> {
    let user = state.repo.update(&id, req.name, req.email).await?;
    Ok(Json(user))
}

async fn handle_delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<MessageResponse>, ApiError> {
    state.repo.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "user deleted".to_string(),
    }))
}

async fn handle_cluster_nodes(
    State(state): State<Arc<AppState>>,
) -> Json<NodesResponse> {
    let nodes = state.cluster.topology();
    Json(NodesResponse {
        node_count: nodes.len(),
        nodes,
    })
}
