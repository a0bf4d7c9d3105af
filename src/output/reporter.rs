//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`, or becomes the spinner message when
///   a spinner is attached
/// - `success()` prints `"  ✓ {message}"`
///
/// All output is suppressed when `ctx.quiet`, or when the reporter is
/// silenced to keep stdout parseable in JSON mode.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<&'a ProgressBar>,
    silent: bool,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: None,
            silent: false,
        }
    }

    /// Route finished lines through `spinner` so they persist above it while
    /// it keeps ticking.
    #[must_use]
    pub fn with_spinner(mut self, spinner: &'a ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }

    /// Swallow all progress output.
    #[must_use]
    pub fn silenced(mut self) -> Self {
        self.silent = true;
        self
    }

    fn suppressed(&self) -> bool {
        self.silent || self.ctx.quiet
    }

    fn emit(&self, line: String) {
        match self.spinner {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.suppressed() {
            return;
        }
        if let Some(pb) = self.spinner {
            pb.set_message(message.to_string());
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if !self.suppressed() {
            self.emit(format!("  {} {message}", "✓".style(self.ctx.styles.success)));
        }
    }
}
