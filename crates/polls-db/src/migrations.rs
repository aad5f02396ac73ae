use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

/// Bring the schema up to date. The version check and the upgrade share one
/// IMMEDIATE transaction, so handles opening a fresh file at the same time
/// wait on each other and only the first one creates the tables.
pub fn run(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Polls DB: running migration v1 (questions, choices)");
        tx.execute_batch(
            "
            CREATE TABLE questions (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                question_text   TEXT NOT NULL CHECK (length(question_text) <= 200),
                pub_date        TEXT NOT NULL
            );

            CREATE INDEX idx_questions_pub_date
                ON questions(pub_date);

            CREATE TABLE choices (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                question_id     INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
                choice_text     TEXT NOT NULL CHECK (length(choice_text) <= 200),
                votes           INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
            );

            CREATE INDEX idx_choices_question
                ON choices(question_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    tx.commit()?;

    info!("Database migrations complete");
    Ok(())
}
