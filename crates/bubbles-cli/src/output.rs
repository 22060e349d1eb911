//! Terminal output and process exit status.

use std::io::Write;
use std::process::ExitCode;

use bubbles_common::error::BubblesError;

/// Turns the outcome of a command into the process exit status.
///
/// Errors are printed on stderr and exit with status 1. A container exit
/// code is passed through unchanged when it fits in a byte.
pub fn finish(result: anyhow::Result<i32>) -> ExitCode {
    match result {
        Ok(code) => ExitCode::from(status_byte(code)),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let _ = writeln!(std::io::stderr().lock(), "{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

/// Maps an exit code into the 0..=255 range the OS reports, using 1 for
/// anything outside it.
#[must_use]
pub fn status_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Renders an error and its causes on one line each.
#[must_use]
pub fn render_error(err: &anyhow::Error) -> String {
    let mut lines = vec![format!("error: {err}")];
    lines.extend(err.chain().skip(1).map(|cause| format!("  caused by: {cause}")));
    if err
        .downcast_ref::<BubblesError>()
        .is_some_and(BubblesError::is_composition)
    {
        lines.push("  hint: the bubble definition is inconsistent".to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn exit_codes_pass_through() {
        assert_eq!(status_byte(0), 0);
        assert_eq!(status_byte(42), 42);
        assert_eq!(status_byte(130), 130);
    }

    #[test]
    fn out_of_range_codes_become_failure() {
        assert_eq!(status_byte(-1), 1);
        assert_eq!(status_byte(256), 1);
    }

    #[test]
    fn causes_are_listed() {
        let err = Err::<(), _>(BubblesError::Config {
            message: "dockerBinary must not be empty".into(),
        })
        .context("failed to load configuration")
        .unwrap_err();
        let rendered = render_error(&err);
        assert!(rendered.starts_with("error: failed to load configuration"));
        assert!(rendered.contains("caused by: "), "got: {rendered}");
        assert!(rendered.contains("dockerBinary"), "got: {rendered}");
    }

    #[test]
    fn composition_errors_carry_a_hint() {
        let err = anyhow::Error::new(BubblesError::ConflictingDirective {
            directive: "CMD".into(),
            first: "cmd".into(),
            second: "cmd".into(),
        });
        assert!(render_error(&err).contains("hint:"));
    }
}
