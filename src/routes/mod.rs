//! Router assembly.

mod common;
mod console;

pub use common::common_routes;
pub use console::console_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Form bodies are small; anything larger is rejected with 413.
pub const BODY_LIMIT: usize = 64 * 1024;

/// The complete application: operational and console routes with a body cap.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(console_routes())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .with_state(state)
}
