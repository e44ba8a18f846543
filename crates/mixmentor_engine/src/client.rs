use std::sync::Arc;
use std::time::Duration;

use mentor_logging::{mentor_debug, mentor_info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::upload::build_multipart;
use crate::{ApiError, FailureKind, JobCreated, StatusReport, UploadForm};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests unbounded; a slow status fetch then only delays the next tick.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5005".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_upload_bytes: 500 * 1024 * 1024,
        }
    }
}

/// Receives engine events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: crate::EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<crate::EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<crate::EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: crate::EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The backend job API.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `GET /api/genres`. A missing or null list yields an empty vector.
    async fn genres(&self) -> Result<Vec<String>, ApiError>;

    /// `POST /api/jobs`, reporting file bytes sent through `sink`.
    async fn create_job(
        &self,
        submission: u64,
        form: UploadForm,
        sink: Arc<dyn EventSink>,
    ) -> Result<JobCreated, ApiError>;

    /// `GET /api/jobs/{job_id}`.
    async fn job_status(&self, job_id: &str) -> Result<StatusReport, ApiError>;

    /// `GET /api/results/{job_id}`.
    async fn job_result(&self, job_id: &str) -> Result<Value, ApiError>;

    /// `GET /api/health`.
    async fn health(&self) -> Result<bool, ApiError>;
}

#[derive(Debug, Deserialize)]
struct GenresBody {
    #[serde(default)]
    genres: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        mentor_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn genres(&self) -> Result<Vec<String>, ApiError> {
        let body: GenresBody = self.get_json(self.endpoint(&["api", "genres"])?).await?;
        Ok(body.genres.unwrap_or_default())
    }

    async fn create_job(
        &self,
        submission: u64,
        form: UploadForm,
        sink: Arc<dyn EventSink>,
    ) -> Result<JobCreated, ApiError> {
        let total = form.total_bytes();
        if total > self.settings.max_upload_bytes {
            return Err(ApiError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_upload_bytes,
                    actual: total,
                },
                "upload exceeds configured limit",
            ));
        }

        let url = self.endpoint(&["api", "jobs"])?;
        let multipart = build_multipart(submission, form, sink);
        mentor_info!("POST {} ({} file bytes)", url, total);

        let response = self
            .client
            .post(url)
            .multipart(multipart)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: JobCreated = read_json(response).await?;
        if created.job_id.trim().is_empty() {
            return Err(ApiError::new(FailureKind::Decode, "empty job_id"));
        }
        Ok(created)
    }

    async fn job_status(&self, job_id: &str) -> Result<StatusReport, ApiError> {
        self.get_json(self.endpoint(&["api", "jobs", job_id])?).await
    }

    async fn job_result(&self, job_id: &str) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(&["api", "results", job_id])?).await
    }

    async fn health(&self) -> Result<bool, ApiError> {
        let body: HealthBody = self.get_json(self.endpoint(&["api", "health"])?).await?;
        Ok(body.status.as_deref() == Some("ok"))
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
