use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use polls_types::api::{ChoiceOption, DetailResponse, ErrorResponse};
use polls_types::models::{Choice, Question};

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The vote named no choice, or one that is not part of the question.
    /// Recovered by showing the question again.
    #[error("You didn't select a choice.")]
    NoSelection {
        question: Box<Question>,
        choices: Vec<Choice>,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl PollError {
    pub fn question_not_found(id: i64) -> Self {
        Self::NotFound { entity: "question", id }
    }
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            PollError::NoSelection { question, choices } => Json(DetailResponse {
                question: *question,
                choices: choices.iter().map(ChoiceOption::from).collect(),
                error_message: Some(message),
            })
            .into_response(),
            PollError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })).into_response()
            }
            PollError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
            }
            PollError::Storage(e) => {
                error!("Storage error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error: "internal error".into() }),
                )
                    .into_response()
            }
        }
    }
}
