//! HAR capture scanning demonstration.
//!
//! This example replays a browser HAR export through the discoverer:
//! 1. Load every entry of the HAR log into a `ReplaySource`
//! 2. Start a `JwtDiscoverer` that writes to a `JsonLinesStore` on stdout
//! 3. Print one JSON line per exchange that carried a token
//!
//! Logs go to stderr; pass `--verbose` for debug-level output.
//!
//! Run with: `cargo run --example scan_har -- capture.har [--verbose]`

use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;
use std::rc::Rc;

use jwt_discovery::{JsonLinesStore, JwtDiscoverer, ReplaySource};
use tracing::Level;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: scan_har <capture.har> [--verbose]");
        return ExitCode::FAILURE;
    };
    let verbose = args.any(|arg| arg == "--verbose");

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("cannot read {}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };

    let mut source = match ReplaySource::from_har_str(&content) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };
    let queued = source.pending();

    let store = Rc::new(JsonLinesStore::new(io::stdout()));
    let discoverer = JwtDiscoverer::new(store).start(&mut source);
    let _stopped = discoverer.stop(&mut source);

    eprintln!(
        "scanned {} exchange(s), {} store failure(s)",
        queued,
        source.failures()
    );

    if source.failures() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
