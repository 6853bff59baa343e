//! Task service client implementations.

pub mod http;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};

/// Base path of the task resource.
pub const TASKS_PATH: &str = "/api/v1/tasks";

/// Network access to the task resource.
///
/// Implementations return tasks in normalized [`Task`] form and report
/// failures without translating them.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// List every task.
    async fn get_all(&self) -> Result<Vec<Task>, ServiceError>;

    /// Fetch one task by id.
    async fn get_by_id(&self, id: &str) -> Result<Task, ServiceError>;

    /// Create a task; the server assigns id, status and timestamps.
    async fn create(&self, payload: &CreateTaskRequest) -> Result<Task, ServiceError>;

    /// Update a task.
    async fn update(&self, id: &str, payload: &UpdateTaskRequest) -> Result<Task, ServiceError>;

    /// Delete a task.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}
