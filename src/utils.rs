//! Output helpers for the `mj` binary.

use anyhow::Context as _;
use colored::Colorize;
use std::io::Write;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::tokenizer::JToken;
use crate::value::Value;

/// Runs `render` against `writer`, treating a broken pipe as success so that
/// piping to tools like `less` or `head` exits cleanly.
fn tolerate_broken_pipe<W: Write>(
    writer: &mut W,
    render: impl FnOnce(&mut W) -> io::Result<()>,
) -> anyhow::Result<()> {
    match render(writer) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write output to stdout"),
    }
}

/// Write a `path:` header line introducing one input's output.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_header<W: Write>(writer: &mut W, path: &Path) -> anyhow::Result<()> {
    tolerate_broken_pipe(writer, |w| {
        writeln!(w, "{}:", path.display().to_string().bold().magenta())
    })
}

/// Write one line per token: its position, its kind and, for strings and
/// numbers, its text.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_tokens<W: Write>(
    writer: &mut W,
    tokens: &[JToken],
) -> anyhow::Result<()> {
    tolerate_broken_pipe(writer, |w| {
        for (i, token) in tokens.iter().enumerate() {
            let kind = token.kind();
            match token {
                JToken::JString(_) => {
                    writeln!(w, "{i}: {} {}", kind.cyan(), token.to_string().green())?;
                }
                JToken::JNumber(_) => {
                    writeln!(w, "{i}: {} {}", kind.cyan(), token.to_string().yellow())?;
                }
                JToken::Null | JToken::Bool(_) => {
                    writeln!(w, "{i}: {}", kind.yellow().bold())?;
                }
                _ => writeln!(w, "{i}: {}", kind.dimmed())?,
            }
        }
        Ok(())
    })
}

/// Write a value as JSON, pretty-printed or on a single line.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_value<W: Write>(
    writer: &mut W,
    value: &Value,
    pretty: bool,
) -> anyhow::Result<()> {
    tolerate_broken_pipe(writer, |w| {
        if pretty {
            serde_json::to_writer_pretty(&mut *w, value)?;
        } else {
            serde_json::to_writer(&mut *w, value)?;
        }
        writeln!(w)
    })
}
