use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{ExtractionError, Result};
use crate::remote::request::ExtractionRequest;
use crate::utils::cancel::CancelToken;
use crate::utils::constants::{DEFAULT_POLL_INITIAL_SECS, DEFAULT_POLL_MAX_SECS};

/// Opaque handle to a submitted remote job. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Processing,
    Complete,
    Failed,
}

impl JobStatus {
    /// Remote status strings collapse onto four states. Unknown strings map
    /// to Processing so the poll loop keeps waiting until its timeout.
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "accepted" | "submitted" => JobStatus::Submitted,
            "running" | "previewing" | "processing" => JobStatus::Processing,
            "successful" | "complete" | "succeeded" => JobStatus::Complete,
            "failed" | "canceled" | "cancelled" => JobStatus::Failed,
            _ => JobStatus::Processing,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Seam between the extraction pipeline and the remote processing service.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a subset job, returning its handle.
    async fn submit(&self, request: &ExtractionRequest) -> Result<JobId>;

    /// Block until the job reaches a terminal state, the timeout elapses or
    /// the token is cancelled.
    async fn await_completion(
        &self,
        job: &JobId,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<()>;

    /// Download all result files into `dest`, in the order the remote
    /// service lists them.
    async fn download_results(&self, job: &JobId, dest: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    #[serde(rename = "jobId")]
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    files: Vec<String>,
}

/// Authenticated client for the Harmony-style job API. Constructed once per
/// process and shared by reference; not assumed safe for concurrent use.
pub struct HarmonyClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    poll_initial: Duration,
    poll_max: Duration,
}

impl HarmonyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: None,
            password: None,
            poll_initial: Duration::from_secs(DEFAULT_POLL_INITIAL_SECS),
            poll_max: Duration::from_secs(DEFAULT_POLL_MAX_SECS),
        })
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.poll_initial = initial;
        self.poll_max = max;
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut client = Self::new(&settings.harmony.base_url)?.with_backoff(
            Duration::from_secs(settings.extraction.poll_initial_secs),
            Duration::from_secs(settings.extraction.poll_max_secs),
        );

        if let (Some(user), Some(pass)) = (
            settings.harmony.username.as_deref(),
            settings.harmony.password.as_deref(),
        ) {
            client = client.with_credentials(user, pass);
        }

        Ok(client)
    }

    fn authenticated(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        }
    }

    async fn fetch_status(&self, job: &JobId) -> Result<StatusResponse> {
        let url = format!("{}/jobs/{}", self.base_url, job);
        let response = self
            .authenticated(self.http.get(&url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<StatusResponse>().await?)
    }
}

#[async_trait]
impl JobService for HarmonyClient {
    async fn submit(&self, request: &ExtractionRequest) -> Result<JobId> {
        let url = format!("{}/jobs", self.base_url);
        let response = self
            .authenticated(self.http.post(&url))
            .json(&request.to_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(ExtractionError::AuthRejected);
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Submission {
                collection_id: request.collection_id.clone(),
                message: format!("{}: {}", status, body),
            });
        }

        let job: JobResponse = response.json().await?;
        info!(job_id = %job.job_id, collection = %request.collection_id, "job submitted");
        Ok(JobId(job.job_id))
    }

    async fn await_completion(
        &self,
        job: &JobId,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut delay = self.poll_initial;

        loop {
            if cancel.is_cancelled() {
                return Err(ExtractionError::Cancelled);
            }

            let status = self.fetch_status(job).await?;
            match JobStatus::parse(&status.status) {
                JobStatus::Complete => {
                    debug!(job_id = %job, "job complete");
                    return Ok(());
                }
                JobStatus::Failed => {
                    return Err(ExtractionError::JobFailed {
                        job_id: job.to_string(),
                        message: status.message.unwrap_or_else(|| status.status.clone()),
                    });
                }
                JobStatus::Submitted | JobStatus::Processing => {
                    let now = Instant::now();
                    if now + delay >= deadline {
                        return Err(ExtractionError::JobTimeout {
                            job_id: job.to_string(),
                            timeout_secs: timeout.as_secs(),
                        });
                    }
                    debug!(job_id = %job, delay_secs = delay.as_secs(), "job still processing");
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, self.poll_max);
                }
            }
        }
    }

    async fn download_results(&self, job: &JobId, dest: &Path) -> Result<Vec<PathBuf>> {
        let url = format!("{}/jobs/{}/results", self.base_url, job);
        let response = self
            .authenticated(self.http.get(&url))
            .send()
            .await?
            .error_for_status()?;
        let results: ResultsResponse = response.json().await?;

        if results.files.is_empty() {
            return Err(ExtractionError::Download {
                job_id: job.to_string(),
            });
        }

        let mut paths = Vec::with_capacity(results.files.len());
        for (index, file_url) in results.files.iter().enumerate() {
            let name = filename_from_url(file_url)
                .unwrap_or_else(|| format!("result_{:03}.nc", index));
            let path = dest.join(name);

            let bytes = self
                .authenticated(self.http.get(file_url))
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            tokio::fs::write(&path, &bytes).await?;

            debug!(job_id = %job, file = %path.display(), size = bytes.len(), "result downloaded");
            paths.push(path);
        }

        info!(job_id = %job, files = paths.len(), "job results downloaded");
        Ok(paths)
    }
}

/// Exponential backoff with a cap.
fn next_delay(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

fn filename_from_url(url: &str) -> Option<String> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let name = trimmed.rsplit('/').next()?;
    if name.is_empty() {
        warn!(url = %url, "result URL has no file name");
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(JobStatus::parse("accepted"), JobStatus::Submitted);
        assert_eq!(JobStatus::parse("Running"), JobStatus::Processing);
        assert_eq!(JobStatus::parse("successful"), JobStatus::Complete);
        assert_eq!(JobStatus::parse("FAILED"), JobStatus::Failed);
        // Unknown strings keep the poll loop alive.
        assert_eq!(JobStatus::parse("rebalancing"), JobStatus::Processing);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Submitted.is_terminal());
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let max = Duration::from_secs(60);
        let mut delay = Duration::from_secs(5);

        delay = next_delay(delay, max);
        assert_eq!(delay, Duration::from_secs(10));
        delay = next_delay(delay, max);
        assert_eq!(delay, Duration::from_secs(20));
        delay = next_delay(delay, max);
        assert_eq!(delay, Duration::from_secs(40));
        delay = next_delay(delay, max);
        assert_eq!(delay, Duration::from_secs(60));
        delay = next_delay(delay, max);
        assert_eq!(delay, Duration::from_secs(60));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/results/TEMPO_NO2_L3.nc").as_deref(),
            Some("TEMPO_NO2_L3.nc")
        );
        assert_eq!(
            filename_from_url("https://example.com/results/file.nc?token=abc").as_deref(),
            Some("file.nc")
        );
        assert_eq!(filename_from_url("https://example.com/results/"), None);
    }
}
