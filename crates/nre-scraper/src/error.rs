use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to run scraper: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("scraper timed out after {0:?}")]
    Timeout(Duration),

    #[error("scraper exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("scraper output is not a JSON list of strings: {0}")]
    Parse(#[from] serde_json::Error),
}
