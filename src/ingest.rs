//! # Input Ingestion
//!
//! Feeds files or other readers through the lexer or parser. Several files
//! are handled concurrently by a small pool of worker threads, with results
//! funnelled back over a channel.
//!
//! Parsing recurses once per nesting level, so every worker gets a stack
//! sized for the configured [`ParseOptions::max_depth`].
use std::fs::File;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};

use crate::parser::{self, ParseOptions, Parsed};
use crate::tokenizer::{self, JToken};

/// What to produce for each input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Diagnostic mode: the raw token sequence
    Tokens,
    /// The parsed value tree
    Parse(ParseOptions),
}

/// The result of ingesting one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Every token before end of input
    Tokens(Vec<JToken>),
    /// The value tree and any tolerated structural issues
    Value(Parsed),
}

/// The outcome for one named input.
#[derive(Debug)]
pub struct Report {
    /// Where the input came from
    pub path: PathBuf,
    /// The output, or why the input could not be read or parsed
    pub outcome: Result<Output>,
}

/// Lex or parse everything `reader` yields.
///
/// # Errors
///
/// Returns the lexer or parser error for malformed input.
pub fn ingest<R: Read>(reader: R, mode: Mode) -> Result<Output> {
    let output = match mode {
        Mode::Tokens => Output::Tokens(tokenizer::tokenize(reader)?),
        Mode::Parse(options) => {
            Output::Value(parser::parse_with_options(reader, options)?)
        }
    };
    Ok(output)
}

/// Lex or parse a single file, logging tolerated structural issues.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its contents are
/// malformed.
pub fn ingest_file(path: &Path, mode: Mode) -> Result<Output> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let started = Instant::now();
    let output = ingest(file, mode)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!("{}: done in {:?}", path.display(), started.elapsed());

    if let Output::Value(parsed) = &output {
        for issue in &parsed.warnings {
            warn!("{}: {issue}", path.display());
        }
    }
    Ok(output)
}

/// Stack reserved for everything but the parser's recursion.
const BASE_STACK: usize = 1024 * 1024;
/// Stack reserved per nesting level, enough for unoptimized builds.
const STACK_PER_LEVEL: usize = 16 * 1024;
/// Upper bound on a worker stack, whatever depth is configured.
const MAX_STACK: usize = 1024 * 1024 * 1024;

/// Stack size for a thread that ingests in `mode`.
#[must_use]
pub const fn stack_size(mode: Mode) -> usize {
    let levels = match mode {
        Mode::Tokens => 0,
        Mode::Parse(options) => options.max_depth,
    };
    let size = BASE_STACK.saturating_add(levels.saturating_mul(STACK_PER_LEVEL));
    if size > MAX_STACK { MAX_STACK } else { size }
}

fn worker(name: String, mode: Mode) -> thread::Builder {
    thread::Builder::new().name(name).stack_size(stack_size(mode))
}

/// Like [`ingest`], but on a thread whose stack fits `mode`'s nesting limit.
///
/// # Errors
///
/// Returns an error if the thread cannot be started, or the lexer or parser
/// error for malformed input.
pub fn ingest_on_worker<R: Read + Send>(reader: R, mode: Mode) -> Result<Output> {
    thread::scope(|scope| {
        let handle = worker("ingest".to_string(), mode)
            .spawn_scoped(scope, move || ingest(reader, mode))
            .context("Failed to start a parser thread")?;
        handle
            .join()
            .map_err(|_| anyhow!("Parser thread panicked"))?
    })
}

/// Hands out unclaimed inputs until none are left.
fn drain(
    paths: &[PathBuf],
    next: &AtomicUsize,
    mode: Mode,
    tx: &mpsc::Sender<(usize, Result<Output>)>,
) {
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(path) = paths.get(index) else {
            break;
        };
        // the receiver lives until every sender is gone
        let _ = tx.send((index, ingest_file(path, mode)));
    }
}

/// Ingest every file in `paths` concurrently.
///
/// At most one worker per available CPU is started. Reports come back in the
/// same order as `paths`, whatever order the workers finish in.
#[must_use]
pub fn ingest_files(paths: &[PathBuf], mode: Mode) -> Vec<Report> {
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(paths.len());
    info!("ingesting {} input(s) on {workers} worker(s)", paths.len());

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for id in 0..workers {
            let tx = tx.clone();
            let next = &next;
            if let Err(err) = worker(format!("ingest-{id}"), mode)
                .spawn_scoped(scope, move || drain(paths, next, mode, &tx))
            {
                warn!("could not start worker {id}: {err}");
            }
        }
    });
    // picks up everything if no worker could be started
    drain(paths, &next, mode, &tx);
    drop(tx);

    let mut results: Vec<(usize, Result<Output>)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results
        .into_iter()
        .map(|(index, outcome)| Report {
            path: paths[index].clone(),
            outcome,
        })
        .collect()
}
