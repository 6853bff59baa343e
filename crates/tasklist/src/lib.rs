//! Client for the tasklist REST API.
//!
//! This crate keeps a local, observable mirror of the tasks held by the
//! backend and talks to it through a pluggable service client.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist::{CreateTaskRequest, HttpTaskService, TaskStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = HttpTaskService::from_env()?;
//! let store = TaskStore::new(Arc::new(service));
//!
//! store.load_tasks().await?;
//! let created = store
//!     .create_task(CreateTaskRequest::new(" Buy milk ", None))
//!     .await?;
//! assert_eq!(store.tasks()[0].id, created.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The HTTP client is configured via environment variables:
//!
//! - `TASKLIST_API_URL`: backend base URL (default `http://localhost:8080`)
//! - `TASKLIST_TIMEOUT_SECS`: request timeout in seconds (default 15)
//!
//! # Architecture
//!
//! - [`TaskService`] defines network access to `/api/v1/tasks`
//! - [`HttpTaskService`] implements it over HTTP
//! - [`TaskStore`] caches tasks, reconciles responses, and records errors
//! - [`StoreObserver`] receives a [`StoreEvent`] for every state change
//! - [`Route`] maps view paths to views

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod router;
pub mod service;
pub mod store;
pub mod views;

pub use config::ClientConfig;
pub use error::{ConfigError, ErrorBody, ServiceError};
pub use events::{StoreEvent, StoreObserver};
pub use models::{CreateTaskRequest, Task, TaskResponse, TaskStatus, UpdateTaskRequest};
pub use router::{Resolution, Route};
pub use service::http::HttpTaskService;
pub use service::TaskService;
pub use store::{extract_error_message, StoreState, TaskStore};
