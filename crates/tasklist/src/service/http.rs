//! HTTP task service backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::{TaskService, TASKS_PATH};
use crate::config::ClientConfig;
use crate::error::{ConfigError, ErrorBody, ServiceError};
use crate::models::{CreateTaskRequest, Task, TaskResponse, UpdateTaskRequest};

/// Task service talking to the REST backend.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    base_url: Url,
}

impl HttpTaskService {
    /// Create a service from configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidBaseUrl(config.base_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a service from `TASKLIST_*` environment variables.
    ///
    /// # Errors
    /// Returns error if the environment holds invalid values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// URL of the collection, or of one task when `id` is given.
    fn url(&self, id: Option<&str>) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ServiceError::InvalidRequest(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(TASKS_PATH.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                if id.trim().is_empty() {
                    return Err(ServiceError::InvalidRequest(
                        "task id must not be empty".to_string(),
                    ));
                }
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "HTTP request");
        self.client.request(method, url)
    }

    /// Send a request and return the body of a successful response.
    ///
    /// Every failure is logged here and handed back unchanged.
    async fn execute(&self, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(log_failure(ServiceError::Transport(e))),
        };

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(log_failure(ServiceError::Status {
                status: status.as_u16(),
                body: ErrorBody::from_text(text),
            }));
        }

        response
            .text()
            .await
            .map_err(|e| log_failure(ServiceError::Transport(e)))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let text = self.execute(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, body = %text, "Failed to parse response");
            log_failure(ServiceError::Decode(e))
        })
    }
}

/// Log a failed call and pass it through untouched.
fn log_failure(err: ServiceError) -> ServiceError {
    match &err {
        ServiceError::Status { status, body } => {
            error!(status = *status, body = %body, "HTTP error");
        }
        other => error!(error = %other, "HTTP error"),
    }
    err
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn get_all(&self) -> Result<Vec<Task>, ServiceError> {
        let url = self.url(None)?;
        let tasks: Vec<TaskResponse> = self.fetch(self.request(Method::GET, url)).await?;
        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Task, ServiceError> {
        let url = self.url(Some(id))?;
        let task: TaskResponse = self.fetch(self.request(Method::GET, url)).await?;
        Ok(task.into())
    }

    async fn create(&self, payload: &CreateTaskRequest) -> Result<Task, ServiceError> {
        let url = self.url(None)?;
        let request = self.request(Method::POST, url).json(payload);
        let task: TaskResponse = self.fetch(request).await?;
        Ok(task.into())
    }

    async fn update(&self, id: &str, payload: &UpdateTaskRequest) -> Result<Task, ServiceError> {
        let url = self.url(Some(id))?;
        let request = self.request(Method::PUT, url).json(payload);
        let task: TaskResponse = self.fetch(request).await?;
        Ok(task.into())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.url(Some(id))?;
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
