//! Daemon module: background process serving one linked project.
//!
//! The daemon holds a [`Session`](crate::session::Session) in memory, watches
//! the project for file changes, and answers queries over a Unix socket.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           lumen daemon                  │
//! │  - session (graph + indexes) in memory  │
//! │  - file watcher (debounced rebuilds)    │
//! │  - Unix socket server                   │
//! └─────────────────────────────────────────┘
//!           ▲
//!           │ .lumen/lumen.sock
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │           lumen CLI                     │
//! │  - connects to daemon                   │
//! │  - sends JSON requests                  │
//! │  - receives JSON responses              │
//! └─────────────────────────────────────────┘
//! ```

pub mod protocol;
pub mod server;

pub use protocol::{Request, Response};
pub use server::{is_daemon_running, pid_path, process_request, send_request, socket_path, start_daemon};
