//! Text or JSON output.

use serde::Serialize;

/// How results are printed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Prints command results in the selected mode.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    /// Create an output; `json` selects JSON mode.
    #[must_use]
    pub const fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    /// The selected mode.
    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print `text` in text mode, or `value` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` can't be serialized.
    pub fn emit<T: Serialize>(&self, text: &str, value: &T) -> anyhow::Result<()> {
        match self.mode {
            OutputMode::Text => println!("{text}"),
            OutputMode::Json => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }

    /// Print one line per item in text mode, or the whole value as JSON.
    ///
    /// `empty` is printed instead when there are no lines.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` can't be serialized.
    pub fn emit_lines<T: Serialize>(
        &self,
        lines: &[String],
        empty: &str,
        value: &T,
    ) -> anyhow::Result<()> {
        if lines.is_empty() {
            return self.emit(empty, value);
        }
        self.emit(&lines.join("\n"), value)
    }
}
