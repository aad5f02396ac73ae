//! The vote operation: the only public flow that changes state.

use tracing::{debug, info};

use polls_db::{ChoiceRepository, QuestionRepository};
use polls_types::models::Question;

use crate::error::PollError;

/// What a successful vote touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub question_id: i64,
    pub choice_id: i64,
}

/// Record one vote for `selected` on question `question_id`.
///
/// - unknown question: [`PollError::NotFound`], nothing written.
/// - no selector, an unknown choice, or a choice owned by another question:
///   [`PollError::NoSelection`] carrying the question and its choices so the
///   form can be shown again. Nothing written.
/// - otherwise the choice's tally goes up by exactly one.
///
/// The increment is delegated to the repository as a relative update; the
/// tally read during lookup is never written back.
pub fn cast_vote<R>(
    repo: &R,
    question_id: i64,
    selected: Option<i64>,
) -> Result<VoteReceipt, PollError>
where
    R: QuestionRepository + ChoiceRepository + ?Sized,
{
    let question = repo
        .question(question_id)?
        .ok_or_else(|| PollError::question_not_found(question_id))?;

    let choice = match selected {
        Some(choice_id) => repo.choice_in_question(question.id, choice_id)?,
        None => None,
    };

    let Some(choice) = choice else {
        debug!(
            "Vote on question {} rejected: selection {:?} is not one of its choices",
            question.id, selected
        );
        return Err(no_selection(repo, question)?);
    };

    if !repo.increment_votes(choice.id)? {
        // Removed between lookup and update
        debug!(
            "Vote on question {} rejected: choice {} disappeared",
            question.id, choice.id
        );
        return Err(no_selection(repo, question)?);
    }

    info!("Vote recorded: question {} choice {}", question.id, choice.id);
    Ok(VoteReceipt {
        question_id: question.id,
        choice_id: choice.id,
    })
}

fn no_selection<R>(repo: &R, question: Question) -> Result<PollError, PollError>
where
    R: ChoiceRepository + ?Sized,
{
    let choices = repo.choices(question.id)?;
    Ok(PollError::NoSelection {
        question: Box::new(question),
        choices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use polls_db::Database;
    use std::thread;

    struct Fixture {
        db: Database,
        q1: i64,
        q2: i64,
        a: i64,
        b: i64,
    }

    /// Question 1 with A (3 votes) and B (0 votes); question 2 with no choices.
    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let q1 = db.create_question("Favourite colour?", &Utc::now()).unwrap().id;
        let q2 = db.create_question("Favourite number?", &Utc::now()).unwrap().id;
        let a = db.add_choice(q1, "A").unwrap().unwrap().id;
        let b = db.add_choice(q1, "B").unwrap().unwrap().id;
        for _ in 0..3 {
            db.increment_votes(a).unwrap();
        }
        Fixture { db, q1, q2, a, b }
    }

    fn tallies(db: &Database, question_id: i64) -> Vec<i64> {
        db.choices(question_id).unwrap().iter().map(|c| c.votes).collect()
    }

    #[test]
    fn vote_increments_selected_choice_only() {
        let f = fixture();
        let receipt = cast_vote(&f.db, f.q1, Some(f.a)).unwrap();
        assert_eq!(receipt, VoteReceipt { question_id: f.q1, choice_id: f.a });
        assert_eq!(tallies(&f.db, f.q1), [4, 0]);

        cast_vote(&f.db, f.q1, Some(f.b)).unwrap();
        assert_eq!(tallies(&f.db, f.q1), [4, 1]);
    }

    #[test]
    fn unknown_choice_is_no_selection() {
        let f = fixture();
        let err = cast_vote(&f.db, f.q1, Some(999)).unwrap_err();
        match err {
            PollError::NoSelection { question, choices } => {
                assert_eq!(question.id, f.q1);
                assert_eq!(choices.len(), 2);
            }
            other => panic!("expected NoSelection, got {:?}", other),
        }
        assert_eq!(tallies(&f.db, f.q1), [3, 0]);
    }

    #[test]
    fn choice_from_other_question_is_no_selection() {
        let f = fixture();
        let err = cast_vote(&f.db, f.q2, Some(f.a)).unwrap_err();
        assert!(matches!(err, PollError::NoSelection { ref question, .. } if question.id == f.q2));
        assert_eq!(tallies(&f.db, f.q1), [3, 0]);
    }

    #[test]
    fn missing_selector_carries_message() {
        let f = fixture();
        let err = cast_vote(&f.db, f.q1, None).unwrap_err();
        assert!(matches!(err, PollError::NoSelection { .. }));
        assert_eq!(err.to_string(), "You didn't select a choice.");
        assert_eq!(tallies(&f.db, f.q1), [3, 0]);
    }

    #[test]
    fn unknown_question_is_not_found() {
        let f = fixture();
        let err = cast_vote(&f.db, 999, Some(f.a)).unwrap_err();
        assert!(matches!(err, PollError::NotFound { entity: "question", id: 999 }));
        assert_eq!(tallies(&f.db, f.q1), [3, 0]);
    }

    #[test]
    fn concurrent_votes_are_all_counted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polls.db");

        let setup = Database::open(&path).unwrap();
        let question_id = setup.create_question("race", &Utc::now()).unwrap().id;
        let choice_id = setup.add_choice(question_id, "only").unwrap().unwrap().id;

        const VOTERS: usize = 16;
        let voters: Vec<_> = (0..VOTERS).map(|_| Database::open(&path).unwrap()).collect();
        let handles: Vec<_> = voters
            .into_iter()
            .map(|db| {
                thread::spawn(move || {
                    for _ in 0..10 {
                        cast_vote(&db, question_id, Some(choice_id)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(tallies(&setup, question_id), [(VOTERS * 10) as i64]);
    }
}
