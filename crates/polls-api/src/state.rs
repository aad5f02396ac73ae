use std::sync::Arc;

use tracing::error;

use polls_db::Database;

use crate::error::PollError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// Run blocking DB work off the async runtime.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, PollError>
where
    F: FnOnce(&Database) -> Result<T, PollError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            PollError::Storage(anyhow::anyhow!("blocking task failed: {}", e))
        })?
}
