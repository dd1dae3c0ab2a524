//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: readable text for humans, stable JSON for scripts.

use datebook_core::error::StoreError;
use serde::Serialize;
use std::io::{self, Write};

/// The output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
    /// Human mode with stdout suppressed; errors still render to stderr.
    Quiet,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns `true` if stdout output is suppressed.
    pub fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// A rendered CLI error with a stable machine code and optional hint.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    /// Build a CLI error from a core [`StoreError`].
    pub fn from_store(err: &StoreError) -> Self {
        let code = err.code();
        Self {
            code: code.code(),
            message: err.to_string(),
            hint: code.hint(),
        }
    }

    pub fn with_details(message: &str, hint: &'static str, code: &'static str) -> Self {
        Self {
            code,
            message: message.to_string(),
            hint: Some(hint),
        }
    }
}

/// Render a success message (human mode only; JSON callers render their
/// own payload, quiet mode prints nothing).
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn render_success(mode: OutputMode, message: &str) -> io::Result<()> {
    if mode.is_json() || mode.is_quiet() {
        return Ok(());
    }
    writeln!(io::stdout(), "{message}")
}

/// Render a serializable payload as pretty JSON (JSON mode only).
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_json<T: Serialize>(mode: OutputMode, value: &T) -> anyhow::Result<()> {
    if !mode.is_json() {
        return Ok(());
    }
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Render an error to stderr in the requested mode.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let mut stderr = io::stderr();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut stderr, &serde_json::json!({ "error": error }))?;
        writeln!(stderr)?;
    } else {
        writeln!(stderr, "Error [{}]: {}", error.code, error.message)?;
        if let Some(hint) = error.hint {
            writeln!(stderr, "Hint: {hint}")?;
        }
    }
    Ok(())
}
