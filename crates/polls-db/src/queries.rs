use crate::Database;
use crate::models::{ChoiceRow, QuestionRow, format_timestamp};
use crate::repository::{QuestionOrder, QuestionQuery};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

impl Database {
    // -- Questions --

    pub fn create_question(
        &self,
        question_text: &str,
        pub_date: &DateTime<Utc>,
    ) -> Result<QuestionRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO questions (question_text, pub_date) VALUES (?1, ?2)",
                (question_text, format_timestamp(pub_date)),
            )?;
            let id = conn.last_insert_rowid();
            query_question(conn, id)?
                .ok_or_else(|| anyhow::anyhow!("Question {} vanished after insert", id))
        })
    }

    pub fn get_question(&self, id: i64) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| query_question(conn, id))
    }

    pub fn list_questions(&self, query: &QuestionQuery) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| query_questions(conn, query))
    }

    /// Delete a question; its choices go with it. Returns false if it did not exist.
    pub fn delete_question(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM questions WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    // -- Choices --

    /// Attach a new choice with zero votes. `None` if the question does not exist.
    pub fn add_choice(&self, question_id: i64, choice_text: &str) -> Result<Option<ChoiceRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if query_question(&tx, question_id)?.is_none() {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO choices (question_id, choice_text) VALUES (?1, ?2)",
                (question_id, choice_text),
            )?;
            let id = tx.last_insert_rowid();
            let row = query_choice_in_question(&tx, question_id, id)?;
            tx.commit()?;
            Ok(row)
        })
    }

    pub fn get_choices(&self, question_id: i64) -> Result<Vec<ChoiceRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question_id, choice_text, votes
                 FROM choices
                 WHERE question_id = ?1
                 ORDER BY id ASC",
            )?;
            let rows = stmt
                .query_map([question_id], choice_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_choice_in_question(
        &self,
        question_id: i64,
        choice_id: i64,
    ) -> Result<Option<ChoiceRow>> {
        self.with_conn(|conn| query_choice_in_question(conn, question_id, choice_id))
    }

    /// Add one vote to a choice. The increment is evaluated by SQLite against
    /// the committed value, so concurrent callers never overwrite each other.
    /// Returns false if no such choice exists.
    pub fn increment_votes(&self, choice_id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE choices SET votes = votes + 1 WHERE id = ?1",
                [choice_id],
            )?;
            Ok(updated == 1)
        })
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        question_text: row.get(1)?,
        pub_date: row.get(2)?,
    })
}

fn choice_from_row(row: &Row<'_>) -> rusqlite::Result<ChoiceRow> {
    Ok(ChoiceRow {
        id: row.get(0)?,
        question_id: row.get(1)?,
        choice_text: row.get(2)?,
        votes: row.get(3)?,
    })
}

fn query_question(conn: &Connection, id: i64) -> Result<Option<QuestionRow>> {
    let row = conn
        .query_row(
            "SELECT id, question_text, pub_date FROM questions WHERE id = ?1",
            [id],
            question_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_questions(conn: &Connection, query: &QuestionQuery) -> Result<Vec<QuestionRow>> {
    let order = match query.order {
        QuestionOrder::NewestFirst => "pub_date DESC, id DESC",
        QuestionOrder::OldestFirst => "pub_date ASC, id ASC",
    };
    // LIMIT -1 means no limit in SQLite
    let limit = query.limit.map_or(-1, i64::from);

    let sql = format!(
        "SELECT id, question_text, pub_date FROM questions ORDER BY {} LIMIT ?1",
        order
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([limit], question_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_choice_in_question(
    conn: &Connection,
    question_id: i64,
    choice_id: i64,
) -> Result<Option<ChoiceRow>> {
    let row = conn
        .query_row(
            "SELECT id, question_id, choice_text, votes
             FROM choices
             WHERE id = ?1 AND question_id = ?2",
            [choice_id, question_id],
            choice_from_row,
        )
        .optional()?;
    Ok(row)
}
