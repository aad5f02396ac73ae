pub mod admin;
pub mod error;
pub mod polls;
pub mod state;
pub mod voting;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{delete, get, post},
};

pub use error::PollError;
pub use state::{AppState, AppStateInner};

/// All public and admin routes, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/polls", get(polls::index))
        .route("/polls/", get(polls::index))
        .route("/polls/specifics/{id}/", get(polls::detail))
        .route("/polls/{id}/results/", get(polls::results))
        .route("/polls/{id}/vote/", post(polls::vote))
        .route("/admin/questions", post(admin::create_question))
        .route("/admin/questions/{id}", delete(admin::delete_question))
        .route("/admin/questions/{id}/choices", post(admin::add_choice))
        .route("/health", get(health))
        .with_state(state)
}

/// Path of the results page for a question; where a successful vote lands.
pub fn results_path(question_id: i64) -> String {
    format!("/polls/{}/results/", question_id)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
