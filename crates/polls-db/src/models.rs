//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the polls-types models so the storage layout can change
//! independently.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use polls_types::models::{Choice, Question};

pub struct QuestionRow {
    pub id: i64,
    pub question_text: String,
    pub pub_date: String,
}

pub struct ChoiceRow {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i64,
}

/// Fixed-width UTC timestamp, so text order in SQLite is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Corrupt timestamp '{}'", s))?;
    Ok(ts.with_timezone(&Utc))
}

impl TryFrom<QuestionRow> for Question {
    type Error = anyhow::Error;

    fn try_from(row: QuestionRow) -> Result<Self> {
        let pub_date = parse_timestamp(&row.pub_date)
            .with_context(|| format!("question {}", row.id))?;
        Ok(Question {
            id: row.id,
            question_text: row.question_text,
            pub_date,
        })
    }
}

impl From<ChoiceRow> for Choice {
    fn from(row: ChoiceRow) -> Self {
        Choice {
            id: row.id,
            question_id: row.question_id,
            choice_text: row.choice_text,
            votes: row.votes,
        }
    }
}
