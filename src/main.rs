/*!
Main binary for minijson.
*/

use anyhow::{Context, Result, bail};
use clap::{ArgAction, CommandFactory, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use minijson::ingest::{self, Mode, Output};
use minijson::{ParseOptions, utils};

/// Lex or parse JSON documents.
#[derive(Parser)]
#[command(name = "mj", version, about, long_about = None)]
struct Args {
    #[arg(value_name = "FILE")]
    /// JSON files to read. If omitted, reads from STDIN
    inputs: Vec<PathBuf>,
    /// Print the token stream instead of the parsed value
    #[arg(short, long, action = ArgAction::SetTrue)]
    tokens: bool,
    /// Treat structural problems (missing colons, unclosed brackets, ...) as
    /// errors instead of warnings
    #[arg(short, long, action = ArgAction::SetTrue)]
    strict: bool,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(short, long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Maximum nesting depth of arrays and objects
    #[arg(long, value_name = "N", default_value_t = ParseOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

impl Args {
    const fn mode(&self) -> Mode {
        if self.tokens {
            return Mode::Tokens;
        }
        let options = if self.strict {
            ParseOptions::strict()
        } else {
            ParseOptions::lenient()
        };
        Mode::Parse(options.with_max_depth(self.max_depth))
    }
}

/// Write one input's output to `out`.
fn emit<W: Write>(out: &mut W, output: &Output, pretty: bool) -> Result<()> {
    match output {
        Output::Tokens(tokens) => utils::write_tokens(out, tokens),
        Output::Value(parsed) => utils::write_value(out, &parsed.value, pretty),
    }
}

/// Entry point for main binary.
///
/// Reads every FILE (concurrently when there are several) or STDIN, and
/// prints either the token stream or the parsed value of each.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .format_timestamp(None)
        .init();

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let mode = args.mode();
    let pretty = !args.compact;
    let mut out = io::stdout().lock();

    if args.inputs.is_empty() {
        if io::stdin().is_terminal() {
            // No piped input and no file specified
            let mut cmd = Args::command();
            return Ok(cmd.print_help()?);
        }
        let output = ingest::ingest_on_worker(io::stdin(), mode)
            .context("Failed to parse STDIN")?;
        if let Output::Value(parsed) = &output {
            for issue in &parsed.warnings {
                log::warn!("<stdin>: {issue}");
            }
        }
        return emit(&mut out, &output, pretty);
    }

    let reports = ingest::ingest_files(&args.inputs, mode);
    let with_headers = reports.len() > 1;
    let mut failures = 0;

    for report in &reports {
        match &report.outcome {
            Ok(output) => {
                if with_headers {
                    utils::write_header(&mut out, &report.path)?;
                }
                emit(&mut out, output, pretty)?;
            }
            Err(err) => {
                failures += 1;
                eprintln!("Error: {err:#}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} input(s) could not be processed", reports.len());
    }
    Ok(())
}
