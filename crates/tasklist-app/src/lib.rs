//! Application layer logic for tasklist.
//!
//! This crate provides the task services, configuration, and query helpers
//! shared by the command-line front end.

pub mod config;
pub mod filter_util;
pub mod service;
pub mod task_writer;

// Re-exports for convenience
pub use config::{CONFIG_DIR, ProjectConfig, StoreConfig, ViewConfig, discover_root};
pub use filter_util::{QueryBuildError, QueryBuildResult, ViewQueryBuilder};
pub use service::{CreateTaskInput, TaskEdit, TaskService, TaskSnapshot};
pub use task_writer::{TaskStore, TaskWriteError, TaskWriter};
