//! Browser chat surface for threadchat
//!
//! This module contains the view state machine, the page renderer, the
//! axum routes and the HTTP server that ties them together.

pub mod render;
pub mod routes;
pub mod server;
pub mod view;

pub use render::{Renderer, UNAVAILABLE_BANNER, WELCOME_NOTICE};
pub use routes::{create_router, AppError, AppState, EngineStatus};
pub use server::{create_app, run_server};
pub use view::{ChatView, ViewHandle, ViewId, ViewRegistry, ViewSnapshot, ViewState};
