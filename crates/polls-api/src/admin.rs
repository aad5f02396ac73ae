//! Out-of-band data entry: questions and choices are created here, never by
//! the public voting flow.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use polls_types::api::{AddChoiceRequest, CreateQuestionRequest};
use polls_types::models::{Choice, MAX_TEXT_LEN, Question};

use crate::error::PollError;
use crate::state::{AppState, run_blocking};

fn validate_text(field: &str, text: &str) -> Result<(), PollError> {
    if text.trim().is_empty() {
        return Err(PollError::InvalidInput(format!("{} must not be empty", field)));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(PollError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

/// POST /admin/questions
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, PollError> {
    validate_text("question_text", &req.question_text)?;
    let pub_date = req.pub_date.unwrap_or_else(Utc::now);

    let question = run_blocking(&state, move |db| {
        let row = db.create_question(&req.question_text, &pub_date)?;
        Ok(Question::try_from(row)?)
    })
    .await?;

    info!("Question {} created", question.id);
    Ok((StatusCode::CREATED, Json(question)))
}

/// POST /admin/questions/{id}/choices
pub async fn add_choice(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<AddChoiceRequest>,
) -> Result<impl IntoResponse, PollError> {
    validate_text("choice_text", &req.choice_text)?;

    let choice = run_blocking(&state, move |db| {
        db.add_choice(question_id, &req.choice_text)?
            .map(Choice::from)
            .ok_or_else(|| PollError::question_not_found(question_id))
    })
    .await?;

    info!("Choice {} added to question {}", choice.id, question_id);
    Ok((StatusCode::CREATED, Json(choice)))
}

/// DELETE /admin/questions/{id} — removes the question and all its choices.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<StatusCode, PollError> {
    let removed = run_blocking(&state, move |db| Ok(db.delete_question(question_id)?)).await?;
    if !removed {
        return Err(PollError::question_not_found(question_id));
    }

    info!("Question {} deleted", question_id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_validation() {
        assert!(validate_text("question_text", "What's new?").is_ok());
        assert!(validate_text("question_text", &"é".repeat(MAX_TEXT_LEN)).is_ok());

        let err = validate_text("question_text", "   ").unwrap_err();
        assert_eq!(err.to_string(), "question_text must not be empty");

        let err = validate_text("choice_text", &"x".repeat(MAX_TEXT_LEN + 1)).unwrap_err();
        assert!(matches!(err, PollError::InvalidInput(_)));
    }
}
