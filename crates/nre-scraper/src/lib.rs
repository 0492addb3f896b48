//! Out-of-process scraper collaborator.
//!
//! Runs `{program} [script] {company} {topic}` and expects a JSON array of
//! strings on stdout. Any failure yields an empty sample list: scraping is an
//! unreliable data source and never fails a scoring request.

mod error;

pub use error::ScrapeError;

use std::process::Stdio;
use std::time::Duration;

use nre_core::AppConfig;

/// How to invoke the external scraper.
#[derive(Debug, Clone)]
pub struct ScraperCommand {
    program: String,
    script: Option<String>,
    timeout: Duration,
}

impl ScraperCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, script: Option<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            script,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.scraper_program.clone(),
            config.scraper_script.clone(),
            Duration::from_secs(config.scraper_timeout_secs),
        )
    }

    /// Collect text samples for `company` and `topic`.
    ///
    /// Returns an empty `Vec` when the scraper cannot be spawned, exits
    /// non-zero, exceeds the timeout or prints anything other than a JSON
    /// array of strings. Failures are logged at WARN.
    pub async fn scrape(&self, company: &str, topic: &str) -> Vec<String> {
        match self.try_scrape(company, topic).await {
            Ok(samples) => {
                tracing::debug!(
                    company,
                    topic,
                    count = samples.len(),
                    "scraper returned samples"
                );
                samples
            }
            Err(e) => {
                tracing::warn!(
                    company,
                    topic,
                    program = %self.program,
                    error = %e,
                    "scrape failed; treating as no samples"
                );
                Vec::new()
            }
        }
    }

    /// Run the scraper and surface the failure reason.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] describing why no samples could be produced.
    pub async fn try_scrape(&self, company: &str, topic: &str) -> Result<Vec<String>, ScrapeError> {
        let mut command = tokio::process::Command::new(&self.program);
        if let Some(script) = &self.script {
            command.arg(script);
        }
        command
            .args([company, topic])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(ScrapeError::Spawn)?;
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScrapeError::Timeout(self.timeout))?
            .map_err(ScrapeError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScrapeError::ExitStatus {
                code: output.status.code(),
                stderr: stderr.trim().chars().take(500).collect(),
            });
        }

        parse_samples(&output.stdout)
    }
}

/// Parse scraper stdout as a JSON array of strings.
fn parse_samples(stdout: &[u8]) -> Result<Vec<String>, ScrapeError> {
    let samples: Vec<String> = serde_json::from_slice(stdout)?;
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_samples_accepts_string_array() {
        let samples = parse_samples(br#"["one", "two"]"#).unwrap();
        assert_eq!(samples, ["one", "two"]);
    }

    #[test]
    fn parse_samples_accepts_trailing_newline() {
        let samples = parse_samples(b"[\"one\"]\n").unwrap();
        assert_eq!(samples, ["one"]);
    }

    #[test]
    fn parse_samples_rejects_objects() {
        let err = parse_samples(br#"{"texts": ["one"]}"#).unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }

    #[test]
    fn parse_samples_rejects_empty_output() {
        assert!(parse_samples(b"").is_err());
    }
}
