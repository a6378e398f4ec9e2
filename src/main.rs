// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Configure logging and colour from the global flags
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = findings, 2 = error)
//
// "Findings" means missing tags for validate, or at least one failed
// fetch for inspect - partial success never short-circuits a batch.
//
// Rust concepts:
// - async/await: Because we need to make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; //      src/cli.rs - command-line parsing
mod fetch; //    src/fetch/ - HTTP layer and the worker pool
mod monitor; //  src/monitor/ - the periodic watch loop
mod og; //       src/og/ - tag extraction and diffing
mod render; //   src/render/ - tables, reports and diff output
mod validate; // src/validate/ - required-tag and semantic checks

// Import items we need from our modules
use cli::{Cli, Commands};
use fetch::FetchResult;
use render::DiffMode;

use clap::Parser; // Parser trait enables the parse() method
use colored::Colorize;
use std::collections::HashMap;
use std::io::{BufRead, IsTerminal};
use std::time::Duration;
use tokio::sync::watch;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::{bail, Result};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = success
//   Ok(1) = findings (missing tags / failed fetches)
//   Err = unexpected error, reported as exit code 2
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Logging and colour are configured once, up front, from the parsed
    // flags; no component carries its own logger state
    init_logging(&cli);
    configure_color(&cli);

    // Match on which subcommand was used
    match cli.command {
        Commands::Inspect { urls, json, timeout, workers } => {
            handle_inspect(urls, json, timeout, workers).await
        }
        Commands::Validate { url, essentials, semantic, timeout } => {
            handle_validate(&url, essentials, semantic, timeout).await
        }
        Commands::Monitor { url, interval, timeout, json_diff, unified } => {
            let mode = if json_diff {
                DiffMode::Json
            } else if unified {
                DiffMode::Unified
            } else {
                DiffMode::Colored
            };
            handle_monitor(url, interval, timeout, mode).await
        }
    }
}

// Installs the tracing subscriber built from the --log-level/--log-json
// flags; RUST_LOG still wins when set so CI can override verbosity
fn init_logging(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// Disables colour when asked to, when NO_COLOR is set, or when stdout is
// not a terminal (so piped output stays clean)
fn configure_color(cli: &Cli) {
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

// Handles the 'inspect' subcommand
//
// Fetches every URL through the bounded worker pool and prints each
// result as it is aggregated. The exit code is decided only after all
// results are in: 1 if at least one fetch failed, 0 otherwise.
async fn handle_inspect(
    args: Vec<String>,
    json: bool,
    timeout: u64,
    workers: Option<usize>,
) -> Result<i32> {
    // Collect URLs from args / STDIN
    let urls = collect_urls(args)?;
    if urls.is_empty() {
        // The only fatal input error; rejected before any concurrent work
        bail!("no URLs provided");
    }

    let workers = fetch::resolve_workers(workers, urls.len());
    tracing::info!(urls = urls.len(), workers, "inspect.start");

    let results = fetch::inspect_urls(urls, workers, timeout).await?;

    let mut exit_code = 0;
    let mut aggregated: HashMap<String, og::Snapshot> = HashMap::new();

    for result in results {
        match result {
            FetchResult::Success { url, snapshot } => {
                if json {
                    aggregated.insert(url, snapshot);
                } else {
                    println!("\n{}", format!("[{}]", url).magenta().bold());
                    render::print_table(&snapshot);
                    println!();
                    render::print_missing(&validate::missing_tags(&snapshot, false));
                }
            }
            FetchResult::Failure { url, error } => {
                eprintln!("{}", format!("Error fetching {}: {}", url, error).red());
                exit_code = 1;
            }
        }
    }

    if json {
        render::print_inspect_json(&aggregated)?;
    }

    Ok(exit_code)
}

// Expands the URL arguments, reading one URL per line from STDIN for
// every "-" argument (blank lines are skipped)
fn collect_urls(args: Vec<String>) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    for arg in args {
        if arg == "-" {
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                let line = line.trim();
                if !line.is_empty() {
                    urls.push(line.to_string());
                }
            }
        } else {
            urls.push(arg);
        }
    }

    Ok(urls)
}

// Handles the 'validate' subcommand
//
// A single sequential fetch; missing required tags are findings (exit 1),
// semantic warnings are informational only
async fn handle_validate(url: &str, essentials: bool, semantic: bool, timeout: u64) -> Result<i32> {
    let client = fetch::build_client(timeout)?;

    let html = fetch::fetch_html(&client, url).await?;
    let snapshot = og::extract_og(&html);

    if semantic {
        let warnings = validate::semantic_validate(&client, &snapshot).await;
        render::print_warnings(&warnings);
    }

    let missing = validate::missing_tags(&snapshot, essentials);
    render::print_missing(&missing);

    Ok(if missing.is_empty() { 0 } else { 1 })
}

// Handles the 'monitor' subcommand
//
// The control task ticks and dispatches fetches; this function runs the
// render loop, which is the event channel's sole consumer and the only
// owner of the baseline snapshot. Ctrl+C stops the ticker; the loop ends
// once in-flight work has settled and the channel closes.
async fn handle_monitor(url: String, interval: u64, timeout: u64, mode: DiffMode) -> Result<i32> {
    let client = fetch::build_client(timeout)?;

    println!(
        "{}",
        format!("Monitoring {} every {} seconds… (Ctrl+C to stop)", url, interval)
            .yellow()
            .bold()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("monitor.cancelled");
            let _ = shutdown_tx.send(true);
        }
    });

    let fetch_url = url.clone();
    let mut events = monitor::spawn_ticker(
        Duration::from_secs(interval),
        move || {
            let client = client.clone();
            let url = fetch_url.clone();
            async move {
                let html = fetch::fetch_html(&client, &url).await?;
                Ok(og::extract_og(&html))
            }
        },
        shutdown_rx,
    );

    let mut state = monitor::MonitorState::new();
    while let Some(event) = events.recv().await {
        let timestamp = event.timestamp;
        if let Some(diff) = state.apply(event) {
            // An empty change set renders nothing in every mode
            if !diff.is_empty() {
                render::print_diff(mode, timestamp, &diff)?;
            }
        }
    }

    tracing::info!(%url, "monitor.stopped");
    Ok(0)
}
