//! `bubble-burst`: remove bubble containers and images.

use std::io::{BufRead, Write};

use clap::Parser;

use bubbles_common::error::Result;
use bubbles_common::types::ExitCode;
use bubbles_runtime::backend::{self, BubbleInventory};
use bubbles_runtime::cleanup::{Cleanup, CleanupReport, Confirm, LinePrompt};

use super::load_environment;

/// Arguments for `bubble-burst`.
#[derive(Parser, Debug)]
#[command(name = "bubble-burst", version, about, long_about = None)]
pub struct BurstArgs {
    /// Name prefix identifying bubble containers and images.
    #[arg(long, env = "BUBBLES_PREFIX")]
    pub prefix: Option<String>,

    /// Answer yes to every prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// [`Confirm`] that agrees to everything.
struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str, _out: &mut dyn Write) -> Result<bool> {
        tracing::debug!(question, "assuming yes");
        Ok(true)
    }
}

/// Runs the cleanup against the local Docker daemon.
///
/// # Errors
///
/// Returns an error if the docker client is missing or listing fails.
pub fn execute(args: &BurstArgs) -> anyhow::Result<ExitCode> {
    let (_, config) = load_environment()?;
    let docker = backend::detect_backend(&config)?;
    let prefix = args.prefix.as_deref().unwrap_or(config.name_prefix.as_str());
    let stdin = std::io::stdin().lock();
    let (mut out, mut err) = (std::io::stdout(), std::io::stderr());
    burst(&docker, prefix, args.yes, stdin, &mut out, &mut err)
}

fn burst(
    inventory: &dyn BubbleInventory,
    prefix: &str,
    yes: bool,
    input: impl BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let cleanup = Cleanup::new(inventory, prefix);
    let report = if yes {
        cleanup.run(&mut AssumeYes, out, err)?
    } else {
        cleanup.run(&mut LinePrompt::new(input), out, err)?
    };
    Ok(exit_code(&report))
}

/// Nonzero when any confirmed command failed.
fn exit_code(report: &CleanupReport) -> ExitCode {
    i32::from(!report.failed.is_empty())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Inventory {
        failing: bool,
        executed: RefCell<Vec<String>>,
    }

    impl BubbleInventory for Inventory {
        fn containers(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(vec![format!("{prefix}sandbox")])
        }

        fn images(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(vec![format!("{prefix}sandbox-image")])
        }

        fn execute(&self, args: &[String]) -> Result<ExitCode> {
            self.executed.borrow_mut().push(args.join(" "));
            Ok(i32::from(self.failing))
        }
    }

    fn run(inventory: &Inventory, yes: bool, answers: &str) -> (ExitCode, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = burst(inventory, "bubble-", yes, answers.as_bytes(), &mut out, &mut err)
            .unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn args_parse() {
        let args =
            BurstArgs::try_parse_from(["bubble-burst", "-y", "--prefix", "dev-"]).unwrap();
        assert!(args.yes);
        assert_eq!(args.prefix.as_deref(), Some("dev-"));
    }

    #[test]
    fn yes_removes_everything() {
        let inventory = Inventory::default();
        let (code, _) = run(&inventory, true, "");
        assert_eq!(code, 0);
        assert_eq!(
            *inventory.executed.borrow(),
            vec!["stop bubble-sandbox", "rm bubble-sandbox", "rmi bubble-sandbox-image"]
        );
    }

    #[test]
    fn answers_are_read_line_by_line() {
        let inventory = Inventory::default();
        let (code, out) = run(&inventory, false, "n\nyes\nN\n");
        assert_eq!(code, 0);
        assert_eq!(*inventory.executed.borrow(), vec!["rm bubble-sandbox"]);
        assert!(out.contains("Skipped: docker stop bubble-sandbox"), "got: {out}");
        assert!(out.contains("Skipped: docker rmi bubble-sandbox-image"), "got: {out}");
    }

    #[test]
    fn prompts_are_written_to_the_given_output() {
        let inventory = Inventory::default();
        let (_, out) = run(&inventory, false, "n\nn\nn\n");
        assert!(
            out.contains("Stop container bubble-sandbox? (y/N): "),
            "got: {out}"
        );
        assert!(
            out.contains("Remove image bubble-sandbox-image? (y/N): "),
            "got: {out}"
        );
        assert!(inventory.executed.borrow().is_empty());
    }

    #[test]
    fn assume_yes_writes_no_prompts() {
        let inventory = Inventory::default();
        let (_, out) = run(&inventory, true, "");
        assert!(!out.contains("(y/N)"), "got: {out}");
    }

    #[test]
    fn failures_give_nonzero_exit() {
        let inventory = Inventory {
            failing: true,
            ..Inventory::default()
        };
        let (code, _) = run(&inventory, true, "");
        assert_eq!(code, 1);
        assert_eq!(inventory.executed.borrow().len(), 3);
    }
}
