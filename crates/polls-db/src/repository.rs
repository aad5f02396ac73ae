//! Per-entity repository interfaces. Handlers depend on these traits rather
//! than on `Database`, so the vote path can be exercised against any store
//! that provides an atomic relative increment.

use anyhow::Result;
use polls_types::models::{Choice, Question};

use crate::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    /// `pub_date` descending, newest id first on ties.
    NewestFirst,
    OldestFirst,
}

/// Describes which questions a listing wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionQuery {
    pub order: QuestionOrder,
    /// `None` returns every question.
    pub limit: Option<u32>,
}

impl QuestionQuery {
    /// The `limit` most recently published questions.
    pub fn latest(limit: u32) -> Self {
        Self {
            order: QuestionOrder::NewestFirst,
            limit: Some(limit),
        }
    }
}

pub trait QuestionRepository {
    fn question(&self, id: i64) -> Result<Option<Question>>;

    fn questions(&self, query: &QuestionQuery) -> Result<Vec<Question>>;
}

pub trait ChoiceRepository {
    /// All choices of a question, in creation order.
    fn choices(&self, question_id: i64) -> Result<Vec<Choice>>;

    /// The choice with `choice_id`, only if it belongs to `question_id`.
    fn choice_in_question(&self, question_id: i64, choice_id: i64) -> Result<Option<Choice>>;

    /// Atomically add one vote. Must be a relative update performed by the
    /// store, never a write of a value read earlier. False if the choice is gone.
    fn increment_votes(&self, choice_id: i64) -> Result<bool>;
}

impl QuestionRepository for Database {
    fn question(&self, id: i64) -> Result<Option<Question>> {
        self.get_question(id)?.map(Question::try_from).transpose()
    }

    fn questions(&self, query: &QuestionQuery) -> Result<Vec<Question>> {
        self.list_questions(query)?
            .into_iter()
            .map(Question::try_from)
            .collect()
    }
}

impl ChoiceRepository for Database {
    fn choices(&self, question_id: i64) -> Result<Vec<Choice>> {
        Ok(self
            .get_choices(question_id)?
            .into_iter()
            .map(Choice::from)
            .collect())
    }

    fn choice_in_question(&self, question_id: i64, choice_id: i64) -> Result<Option<Choice>> {
        Ok(self.get_choice_in_question(question_id, choice_id)?.map(Choice::from))
    }

    fn increment_votes(&self, choice_id: i64) -> Result<bool> {
        Database::increment_votes(self, choice_id)
    }
}
