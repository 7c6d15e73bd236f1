//! Lumen CLI - dependency graphs and source attribution for a project.
//!
//! Usage:
//!   lumen analyze                 # Build everything, print a summary
//!   lumen stats                   # Graph statistics
//!   lumen cycles                  # Circular dependencies
//!   lumen deps <file>             # Dependencies and dependents
//!   lumen focus <file>            # Neighborhood graph export
//!   lumen graph                   # Full graph export
//!   lumen detect <text>           # Which file does this text come from?
//!   lumen context <message>       # Context to attach to a message
//!   lumen daemon                  # Serve queries over .lumen/lumen.sock
//!   lumen send <json>             # Raw request to the daemon
//!
//! Query commands go through the daemon when one is running for the root,
//! and build a local session otherwise. All results are JSON on stdout.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use lumen::daemon::{is_daemon_running, process_request, send_request, start_daemon, Request, Response};
use lumen::query::SummaryMap;
use lumen::Session;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Lumen - dependency graphs and instant source attribution", long_about = None)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Project name (default: the root directory's name)
    #[arg(short, long, global = true)]
    name: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link the project, build graph and indexes, print a summary
    Analyze,

    /// Show graph statistics
    Stats,

    /// List circular dependencies
    Cycles,

    /// Show what a file depends on and what depends on it
    Deps {
        /// File path (relative to the root or absolute)
        file: PathBuf,

        /// How many hops to follow
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Export the graph around one file
    Focus {
        /// File path (relative to the root or absolute)
        file: PathBuf,

        /// How many hops to follow
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Export the whole graph
    Graph,

    /// Attribute a snippet of text to project files
    Detect {
        /// Text to look up (omit with --stdin)
        text: Option<String>,

        /// Read the text from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Decide which project context accompanies a message
    Context {
        /// The message
        message: String,

        /// Ask for the full project context
        #[arg(long)]
        full: bool,

        /// JSON object mapping file paths to summaries
        #[arg(long)]
        summaries: Option<PathBuf>,
    },

    /// Show instant index statistics
    IndexStats,

    /// Rediscover files and rebuild
    Rebuild,

    /// Run the daemon in the foreground
    Daemon,

    /// Check whether a daemon is running for the root
    Status,

    /// Stop a running daemon
    Stop,

    /// Send a raw JSON request to the running daemon
    Send {
        /// e.g. '{"command":"deps","file":"src/app.py"}'
        request: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays pure JSON.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("lumen=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lumen=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("project root not found: {}", cli.root.display()))?;
    let name = cli.name.as_deref();

    let request = match cli.command {
        Commands::Daemon => return start_daemon(&root, name),

        Commands::Status => {
            print_json(&serde_json::json!({
                "root": root,
                "running": is_daemon_running(&root),
            }))?;
            return Ok(());
        }

        Commands::Stop => {
            if !is_daemon_running(&root) {
                bail!("no daemon running for {}", root.display());
            }
            return print_response(send_request(&root, &Request::Shutdown)?);
        }

        Commands::Send { request } => {
            let request: Request = serde_json::from_str(&request).context("invalid request JSON")?;
            return print_response(send_request(&root, &request)?);
        }

        Commands::Analyze => {
            let session = Session::open(&root, name)?;
            let project = session.active_project()?;
            print_json(&serde_json::json!({
                "project": project.as_ref().map(|p| &p.name),
                "root": root,
                "files": project.as_ref().map_or(0, |p| p.files.len()),
                "stats": session.stats()?,
                "index": session.index_stats()?,
            }))?;
            return Ok(());
        }

        Commands::Context {
            message,
            full,
            summaries: Some(path),
        } => {
            let summaries = read_summaries(&root, &path)?;
            let context = Request::Context { message, full };
            return dispatch(&root, name, vec![Request::Summaries { summaries }, context]);
        }

        Commands::Context { message, full, .. } => Request::Context { message, full },
        Commands::Stats => Request::Stats,
        Commands::Cycles => Request::Cycles,
        Commands::Deps { file, depth } => Request::Deps { file, depth },
        Commands::Focus { file, depth } => Request::Focus { file, depth },
        Commands::Graph => Request::Graph,
        Commands::IndexStats => Request::IndexStats,
        Commands::Rebuild => Request::Rebuild,
        Commands::Detect { text, stdin } => {
            let text = match (text, stdin) {
                (_, true) => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
                (Some(text), false) => text,
                (None, false) => bail!("pass the text to detect or use --stdin"),
            };
            Request::Detect { text }
        }
    };

    dispatch(&root, name, vec![request])
}

/// Run requests against the daemon if one is up, otherwise against a fresh
/// local session. Only the last response is printed.
fn dispatch(root: &Path, name: Option<&str>, requests: Vec<Request>) -> Result<()> {
    let mut last = None;

    if is_daemon_running(root) {
        for request in &requests {
            last = Some(send_request(root, request)?);
        }
    } else {
        let session = Session::open(root, name)?;
        let shutdown = AtomicBool::new(false);
        for request in requests {
            last = Some(process_request(request, &session, &shutdown));
        }
    }

    match last {
        Some(response) => print_response(response),
        None => Ok(()),
    }
}

fn print_response(response: Response) -> Result<()> {
    match response {
        Response::Ok { data } => print_json(&data),
        Response::Error { message } => bail!(message),
        Response::Pong => print_json(&serde_json::json!({ "status": "pong" })),
        Response::Goodbye => print_json(&serde_json::json!({ "status": "goodbye" })),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Relative keys are taken from the project root.
fn read_summaries(root: &Path, path: &Path) -> Result<SummaryMap> {
    let text = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let raw: SummaryMap = serde_json::from_str(&text).with_context(|| format!("invalid summaries in {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|(file, summary)| (if file.is_absolute() { file } else { root.join(file) }, summary))
        .collect())
}
