use axum::{
    Router,
    body::Body,
    http::Request,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handlers::{AppState, auth, feedback, user};

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::home))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/users/{username}", get(user::show_user))
        .route("/users/{username}/delete", post(user::delete_user))
        .route(
            "/users/{username}/feedback/add",
            get(feedback::add_feedback_form).post(feedback::add_feedback),
        )
        .route("/feedback", get(feedback::list_feedback))
        .route(
            "/feedback/{id}/update",
            get(feedback::edit_feedback_form).post(feedback::update_feedback),
        )
        .route("/feedback/{id}/delete", post(feedback::delete_feedback))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %Uuid::new_v4()
                )
            }),
        )
        .with_state(state)
}
