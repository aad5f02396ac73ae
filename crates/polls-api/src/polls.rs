use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    response::Redirect,
};
use tracing::debug;

use polls_db::{ChoiceRepository, QuestionQuery, QuestionRepository};
use polls_types::api::{
    ChoiceOption, DetailResponse, QuestionListResponse, ResultsResponse, VoteForm,
};
use polls_types::models::{Choice, Question};

use crate::error::PollError;
use crate::state::{AppState, run_blocking};
use crate::voting::cast_vote;

/// How many questions the index shows.
pub const LATEST_LIMIT: u32 = 5;

// -- Read projections --

pub fn latest_questions<R>(repo: &R) -> Result<Vec<Question>, PollError>
where
    R: QuestionRepository + ?Sized,
{
    Ok(repo.questions(&QuestionQuery::latest(LATEST_LIMIT))?)
}

pub fn question_with_choices<R>(repo: &R, id: i64) -> Result<(Question, Vec<Choice>), PollError>
where
    R: QuestionRepository + ChoiceRepository + ?Sized,
{
    let question = repo.question(id)?.ok_or_else(|| PollError::question_not_found(id))?;
    let choices = repo.choices(question.id)?;
    Ok((question, choices))
}

// -- Handlers --

/// GET /polls/ — the latest five questions, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<QuestionListResponse>, PollError> {
    let latest_question_list = run_blocking(&state, |db| latest_questions(db)).await?;
    Ok(Json(QuestionListResponse { latest_question_list }))
}

/// GET /polls/specifics/{id}/ — the voting form for one question.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DetailResponse>, PollError> {
    let (question, choices) = run_blocking(&state, move |db| question_with_choices(db, id)).await?;
    Ok(Json(DetailResponse {
        question,
        choices: choices.iter().map(ChoiceOption::from).collect(),
        error_message: None,
    }))
}

/// GET /polls/{id}/results/ — tallies for one question.
pub async fn results(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResultsResponse>, PollError> {
    let (question, choices) = run_blocking(&state, move |db| question_with_choices(db, id)).await?;
    Ok(Json(ResultsResponse { question, choices }))
}

/// POST /polls/{id}/vote/ — on success redirect to the results page so a
/// reload does not submit the vote twice.
pub async fn vote(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<Redirect, PollError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            // An unreadable body is treated like an empty submission
            debug!("Vote form rejected: {}", rejection);
            VoteForm::default()
        }
    };
    let selected = form.selected();

    let receipt = run_blocking(&state, move |db| cast_vote(db, question_id, selected)).await?;
    Ok(Redirect::to(&crate::results_path(receipt.question_id)))
}
