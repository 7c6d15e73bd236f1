//! Daemon protocol: request/response types for CLI-daemon communication.
//!
//! One JSON object per line, one request per connection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::query::SummaryMap;

/// Request from CLI to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Request {
    /// Instant fingerprint lookup
    #[serde(rename = "detect")]
    Detect { text: String },

    /// Decide which context accompanies a message
    #[serde(rename = "context")]
    Context {
        message: String,
        #[serde(default)]
        full: bool,
    },

    /// Full graph export
    #[serde(rename = "graph")]
    Graph,

    /// Graph restricted to the neighborhood of one file
    #[serde(rename = "focus")]
    Focus {
        file: PathBuf,
        #[serde(default)]
        depth: Option<usize>,
    },

    /// Dependencies and dependents of one file
    #[serde(rename = "deps")]
    Deps {
        file: PathBuf,
        #[serde(default)]
        depth: Option<usize>,
    },

    /// Graph statistics
    #[serde(rename = "stats")]
    Stats,

    /// Elementary cycles
    #[serde(rename = "cycles")]
    Cycles,

    /// Instant index statistics
    #[serde(rename = "index_stats")]
    IndexStats,

    /// Replace the file summaries used for context
    #[serde(rename = "summaries")]
    Summaries { summaries: SummaryMap },

    /// Rediscover files and rebuild everything
    #[serde(rename = "rebuild")]
    Rebuild,

    /// Check if daemon is alive
    #[serde(rename = "ping")]
    Ping,

    /// Shutdown the daemon
    #[serde(rename = "shutdown")]
    Shutdown,
}

/// Response from daemon to CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Response {
    /// Successful response with JSON data
    #[serde(rename = "ok")]
    Ok { data: serde_json::Value },

    /// Error response
    #[serde(rename = "error")]
    Error { message: String },

    /// Pong response (daemon is alive)
    #[serde(rename = "pong")]
    Pong,

    /// Shutdown acknowledgment
    #[serde(rename = "goodbye")]
    Goodbye,
}

impl Response {
    pub fn ok<T: Serialize>(data: T) -> Self {
        Response::Ok {
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Response::Error { message: msg.into() }
    }
}
