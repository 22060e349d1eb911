//! Interactive removal of the containers and images bubbles left behind.

use std::io::{BufRead, Write};

use bubbles_common::error::{BubblesError, Result};

use crate::backend::BubbleInventory;

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Asks `question` on `out` and returns `true` if the user agreed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the question cannot be asked or answered.
    fn confirm(&mut self, question: &str, out: &mut dyn Write) -> Result<bool>;
}

/// [`Confirm`] reading answers line by line, e.g. from a terminal.
pub struct LinePrompt<R> {
    input: R,
}

impl<R: BufRead> LinePrompt<R> {
    /// Creates a prompt reading answers from `input`.
    pub const fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Confirm for LinePrompt<R> {
    fn confirm(&mut self, question: &str, out: &mut dyn Write) -> Result<bool> {
        write!(out, "{question} (y/N): ")
            .and_then(|()| out.flush())
            .map_err(|e| terminal_error("<stdout>", e))?;
        let mut answer = String::new();
        let _ = self
            .input
            .read_line(&mut answer)
            .map_err(|e| terminal_error("<stdin>", e))?;
        Ok(is_yes(&answer))
    }
}

/// Whether `answer` is `y` or `yes`, ignoring case and surrounding space.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// What happened to each proposed command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Commands that ran successfully.
    pub executed: Vec<String>,
    /// Commands the user declined.
    pub skipped: Vec<String>,
    /// Commands that ran and exited unsuccessfully.
    pub failed: Vec<String>,
}

/// Walks the bubble containers and images, confirming each removal.
pub struct Cleanup<'a> {
    inventory: &'a dyn BubbleInventory,
    prefix: String,
}

impl<'a> Cleanup<'a> {
    /// Cleans up objects whose names start with `prefix`.
    #[must_use]
    pub fn new(inventory: &'a dyn BubbleInventory, prefix: impl Into<String>) -> Self {
        Self {
            inventory,
            prefix: prefix.into(),
        }
    }

    /// Stops and removes every matching container, then removes every
    /// matching image. Progress goes to `out`, failures to `err`; a failed
    /// or declined command never stops the walk.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails, the prompt fails, or a command
    /// cannot be started at all.
    pub fn run(
        &self,
        confirm: &mut dyn Confirm,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<CleanupReport> {
        let mut report = CleanupReport::default();

        let containers = self.inventory.containers(&self.prefix)?;
        announce(out, "containers", &containers)?;
        for container in &containers {
            let container = container.as_str();
            let stop = format!("Stop container {container}");
            let step = self.step(&["stop", container], &stop, confirm, out)?;
            report.record(step, out, err)?;
            let remove = format!("Remove container {container}");
            let step = self.step(&["rm", container], &remove, confirm, out)?;
            report.record(step, out, err)?;
        }

        let images = self.inventory.images(&self.prefix)?;
        announce(out, "images", &images)?;
        for image in &images {
            let image = image.as_str();
            let remove = format!("Remove image {image}");
            let step = self.step(&["rmi", image], &remove, confirm, out)?;
            report.record(step, out, err)?;
        }

        tracing::info!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "cleanup finished"
        );
        Ok(report)
    }

    fn step(
        &self,
        args: &[&str],
        description: &str,
        confirm: &mut dyn Confirm,
        out: &mut dyn Write,
    ) -> Result<Step> {
        let line = format!("docker {}", args.join(" "));
        if !confirm.confirm(&format!("{description}?"), out)? {
            return Ok(Step::Skipped(line));
        }

        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        let code = self.inventory.execute(&args)?;
        if code == 0 {
            Ok(Step::Executed(line))
        } else {
            tracing::warn!(command = %line, code, "cleanup command failed");
            Ok(Step::Failed(line))
        }
    }
}

enum Step {
    Executed(String),
    Skipped(String),
    Failed(String),
}

impl CleanupReport {
    fn record(&mut self, step: Step, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        match step {
            Step::Executed(line) => self.executed.push(line),
            Step::Skipped(line) => {
                writeln!(out, "Skipped: {line}").map_err(|e| terminal_error("<stdout>", e))?;
                self.skipped.push(line);
            }
            Step::Failed(line) => {
                writeln!(err, "Failed to execute: {line}")
                    .map_err(|e| terminal_error("<stderr>", e))?;
                self.failed.push(line);
            }
        }
        Ok(())
    }
}

fn announce(out: &mut dyn Write, kind: &str, names: &[String]) -> Result<()> {
    let message = if names.is_empty() {
        format!("No bubble {kind} found")
    } else {
        format!("Found {} bubble {kind}: {}", names.len(), names.join(", "))
    };
    writeln!(out, "{message}").map_err(|e| terminal_error("<stdout>", e))
}

fn terminal_error(path: &str, source: std::io::Error) -> BubblesError {
    BubblesError::Io {
        path: path.into(),
        source,
    }
}
