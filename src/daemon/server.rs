//! Daemon server: Unix socket server that handles CLI requests.

use anyhow::{Context as _, Result};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::STATE_DIR;
use crate::error::LumenError;
use crate::session::Session;
use crate::watcher::{start_watching, WatcherHandle};

use super::protocol::{Request, Response};

/// Socket path (in the project's state directory)
pub fn socket_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("lumen.sock")
}

/// PID file path
pub fn pid_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("daemon.pid")
}

/// Start the daemon server. Blocks until a `shutdown` request arrives.
pub fn start_daemon(root: &Path, name: Option<&str>) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot open project root {}", root.display()))?;
    let sock_path = socket_path(&root);
    let pid_file = pid_path(&root);

    std::fs::create_dir_all(root.join(STATE_DIR))?;

    if sock_path.exists() {
        std::fs::remove_file(&sock_path)?;
    }

    info!(root = %root.display(), "building initial session");
    let session = Arc::new(Session::open(&root, name)?);

    std::fs::write(&pid_file, std::process::id().to_string())?;

    let debounce_ms = session.config().daemon.debounce_ms;
    let _watcher: Option<WatcherHandle> = match start_watching(&root, Arc::clone(&session), debounce_ms) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "file watcher failed to start");
            None
        }
    };

    let listener = UnixListener::bind(&sock_path)?;
    info!(socket = %sock_path.display(), "daemon listening");

    let shutdown = Arc::new(AtomicBool::new(false));

    for stream in listener.incoming() {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match stream {
            Ok(stream) => {
                let session = Arc::clone(&session);
                let shutdown = Arc::clone(&shutdown);
                let sock_path = sock_path.clone();

                thread::spawn(move || {
                    if let Err(e) = handle_client(stream, &session, &shutdown) {
                        debug!(error = %e, "client handler error");
                    }
                    if shutdown.load(Ordering::Relaxed) {
                        // Wake the accept loop so it sees the flag.
                        let _ = UnixStream::connect(&sock_path);
                    }
                });
            }
            Err(e) => {
                error!(error = %e, "accept error");
            }
        }
    }

    info!("daemon shutting down");
    let _ = std::fs::remove_file(&sock_path);
    let _ = std::fs::remove_file(&pid_file);

    Ok(())
}

/// Handle a single client connection.
fn handle_client(stream: UnixStream, session: &Session, shutdown: &AtomicBool) -> Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(());
    }

    let response = match serde_json::from_str::<Request>(&line) {
        Ok(request) => {
            debug!(?request, "received request");
            process_request(request, session, shutdown)
        }
        Err(e) => Response::error(format!("invalid request: {}", e)),
    };

    let response_json = serde_json::to_string(&response)?;
    writeln!(writer, "{}", response_json)?;

    Ok(())
}

/// Process a request and return a response.
pub fn process_request(request: Request, session: &Session, shutdown: &AtomicBool) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Shutdown => {
            shutdown.store(true, Ordering::Relaxed);
            Response::Goodbye
        }

        // ─── Lookups ───────────────────────────────────────────
        Request::Detect { text } => respond(session.detect(&text)),

        Request::Context { message, full } => respond(session.decide_context(&message, full)),

        Request::Graph => respond(session.graph_export()),

        Request::Focus { file, depth } => respond(session.focused_graph(&file, depth)),

        Request::Deps { file, depth } => respond(session.dependencies_of(&file, depth)),

        Request::Stats => respond(session.stats()),

        Request::Cycles => respond(session.cycles()),

        Request::IndexStats => respond(session.index_stats()),

        // ─── Updates ───────────────────────────────────────────
        Request::Summaries { summaries } => {
            let count = summaries.len();
            respond(session.set_summaries(summaries).map(|()| serde_json::json!({ "summaries": count })))
        }

        Request::Rebuild => respond(session.refresh()),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, LumenError>) -> Response {
    match result {
        Ok(data) => Response::ok(data),
        Err(e) => Response::error(e.to_string()),
    }
}

/// Check if daemon is running by checking PID file and process.
pub fn is_daemon_running(root: &Path) -> bool {
    let pid_file = pid_path(root);

    if !pid_file.exists() {
        return false;
    }

    if let Ok(pid_str) = std::fs::read_to_string(&pid_file) {
        if let Ok(pid) = pid_str.trim().parse::<i32>() {
            // Signal 0 only checks that the process exists.
            unsafe {
                return libc::kill(pid, 0) == 0;
            }
        }
    }

    false
}

/// Send a request to the daemon and get a response.
pub fn send_request(root: &Path, request: &Request) -> Result<Response> {
    let sock_path = socket_path(root);
    let mut stream = UnixStream::connect(&sock_path)
        .with_context(|| format!("no daemon listening on {}", sock_path.display()))?;

    let request_json = serde_json::to_string(request)?;
    writeln!(stream, "{}", request_json)?;

    let mut reader = BufReader::new(stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line)?;

    let response: Response = serde_json::from_str(&response_line)?;
    Ok(response)
}
