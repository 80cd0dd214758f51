//! Rate-limited Tempo Cloud REST client used by the MCP server.

pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod models;
pub mod rate_limiter;

pub use client::TempoClient;
pub use config::TempoConfig;
pub use error::{Result, TempoError};
pub use models::{
    results, Account, ApiResult, WorkAttribute, Worklog, WorklogAuthor, WorklogIssue,
    WorklogQuery, WorklogRequest, WorklogUpdate,
};
pub use rate_limiter::RateLimiter;
