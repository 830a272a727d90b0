//! HTTP routes of the browser chat surface
//!
//! Every interaction is a full round trip: form posts run the turn and
//! redirect back to the view, which is then rendered from scratch.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::engine::ChatEngine;
use crate::error::{Result, ThreadchatError};
use crate::surface::{ChatView, Renderer, ViewHandle, ViewId, ViewRegistry, ViewSnapshot};

/// Whether the server has a working engine
pub enum EngineStatus {
    /// Engine built; chat is enabled
    Available(ChatEngine),
    /// Engine construction failed with the given detail; chat is disabled
    Unavailable(String),
}

struct SharedState {
    engine: EngineStatus,
    views: ViewRegistry,
    renderer: Renderer,
    title: String,
}

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    inner: Arc<SharedState>,
}

impl AppState {
    /// Build the state and compile the page template
    ///
    /// # Errors
    ///
    /// Returns error if the page template fails to compile
    pub fn new(engine: EngineStatus, title: impl Into<String>) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(SharedState {
                engine,
                views: ViewRegistry::new(),
                renderer: Renderer::new()?,
                title: title.into(),
            }),
        })
    }

    /// State with a working engine
    pub fn available(engine: ChatEngine, title: impl Into<String>) -> Result<Self> {
        Self::new(EngineStatus::Available(engine), title)
    }

    /// State for a server whose engine could not be built
    pub fn unavailable(detail: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        Self::new(EngineStatus::Unavailable(detail.into()), title)
    }

    fn engine(&self) -> std::result::Result<&ChatEngine, AppError> {
        match &self.inner.engine {
            EngineStatus::Available(engine) => Ok(engine),
            EngineStatus::Unavailable(detail) => Err(AppError::Unavailable(detail.clone())),
        }
    }

    fn unavailable_detail(&self) -> Option<&str> {
        match &self.inner.engine {
            EngineStatus::Available(_) => None,
            EngineStatus::Unavailable(detail) => Some(detail),
        }
    }

    /// Registered view under `raw_id`, registering it if needed
    async fn view(&self, raw_id: &str) -> std::result::Result<(ViewId, ViewHandle), AppError> {
        let id = parse_view_id(raw_id)?;
        Ok((id, self.inner.views.get_or_create(id).await))
    }

    /// Contents of the view under `raw_id`; unregistered views are empty
    async fn snapshot(&self, raw_id: &str) -> std::result::Result<ViewSnapshot, AppError> {
        let id = parse_view_id(raw_id)?;
        Ok(match self.inner.views.get(id).await {
            Some(handle) => handle.lock().await.snapshot(),
            None => ChatView::new(id).snapshot(),
        })
    }
}

fn parse_view_id(raw_id: &str) -> std::result::Result<ViewId, AppError> {
    raw_id
        .parse()
        .map_err(|_| ThreadchatError::ViewNotFound(raw_id.to_string()).into())
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(open_view))
        .route("/views/:view_id", get(show_view))
        .route("/views/:view_id/messages", post(submit_message))
        .route("/views/:view_id/clear", post(clear_view))
        .route("/api/views/:view_id", get(view_json))
        .route("/health", get(health))
        .with_state(state)
}

fn view_location(id: ViewId) -> String {
    format!("/views/{}", id)
}

/// GET / - Open a new view
async fn open_view() -> Redirect {
    let id = ViewId::new();
    tracing::debug!("Opened view {}", id);
    Redirect::to(&view_location(id))
}

/// GET /views/:view_id - Render the chat page
async fn show_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> std::result::Result<Html<String>, AppError> {
    let snapshot = state.snapshot(&view_id).await?;
    let html = state.inner.renderer.render_page(
        &state.inner.title,
        &snapshot,
        state.unavailable_detail(),
    )?;
    Ok(Html(html))
}

/// Chat input form
#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

/// POST /views/:view_id/messages - Run one turn
///
/// The turn runs on its own task, so a client that disconnects mid-request
/// does not cancel it.
async fn submit_message(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
    Form(form): Form<PromptForm>,
) -> std::result::Result<Redirect, AppError> {
    state.engine()?;
    let (id, handle) = state.view(&view_id).await?;

    let turn = tokio::spawn(async move {
        let engine = state.engine()?;
        let mut view = handle.lock().await;
        if view.submit(engine, &form.prompt).await.is_some() {
            tracing::debug!("View {}: {} messages", id, view.message_count());
        }
        Ok::<(), AppError>(())
    });

    turn.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Chat turn aborted: {}", e)))??;

    Ok(Redirect::to(&view_location(id)))
}

/// POST /views/:view_id/clear - Reset the view onto a new session
///
/// An unregistered view has nothing to reset.
async fn clear_view(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> std::result::Result<Redirect, AppError> {
    state.engine()?;
    let id = parse_view_id(&view_id)?;
    if let Some(handle) = state.inner.views.get(id).await {
        handle.lock().await.clear();
    }
    Ok(Redirect::to(&view_location(id)))
}

/// GET /api/views/:view_id - View contents as JSON
async fn view_json(
    State(state): State<AppState>,
    Path(view_id): Path<String>,
) -> std::result::Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.snapshot(&view_id).await?;
    Ok(Json(serde_json::to_value(snapshot).map_err(ThreadchatError::from)?))
}

/// GET /health - Engine availability
async fn health(State(state): State<AppState>) -> Response {
    match &state.inner.engine {
        EngineStatus::Available(engine) => {
            let sessions = engine.session_count().await;
            let views = state.inner.views.len().await;
            Json(serde_json::json!({
                "status": "ok",
                "provider": engine.provider_name(),
                "model": engine.model(),
                "sessions": sessions,
                "views": views,
            }))
            .into_response()
        }
        EngineStatus::Unavailable(detail) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unavailable",
                "detail": detail,
            })),
        )
            .into_response(),
    }
}

/// Error type for HTTP handlers
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unavailable(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ThreadchatError>() {
            Ok(ThreadchatError::ViewNotFound(id)) => AppError::NotFound(id),
            Ok(other) => AppError::Internal(other.into()),
            Err(err) => AppError::Internal(err),
        }
    }
}

impl From<ThreadchatError> for AppError {
    fn from(err: ThreadchatError) -> Self {
        AppError::from(anyhow::Error::from(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(id) => (StatusCode::NOT_FOUND, format!("View not found: {}", id)),
            AppError::Unavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Chatbot unavailable: {}", detail),
            ),
            AppError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
