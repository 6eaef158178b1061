use super::{handlers, state::AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/sessions", post(handlers::create_session_handler))
        .route(
            "/sessions/{id}",
            get(handlers::get_session_handler).delete(handlers::delete_session_handler),
        )
        .route("/sessions/{id}/question", put(handlers::set_question_handler))
        .route("/sessions/{id}/analyze", post(handlers::analyze_handler))
        .route(
            "/sessions/{id}/quick_generate",
            post(handlers::quick_generate_handler),
        )
        .route("/sessions/{id}/options", put(handlers::select_option_handler))
        .route("/sessions/{id}/generate", post(handlers::generate_handler))
        .route("/sessions/{id}/back", post(handlers::back_handler))
        .route("/sessions/{id}/edit", post(handlers::edit_handler))
        .route("/sessions/{id}/reset", post(handlers::reset_handler))
        .route("/sessions/{id}/copy", post(handlers::copy_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
