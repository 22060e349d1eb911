//! Non-strict command-line parsing against the options a composition declares.
//!
//! Tokens naming a declared option (and the value of a string option) go to
//! `clap`; everything else passes through untouched, in order, so it can be
//! forwarded to the container.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use bubbles_common::constants::{DRY_RUN_ALIAS, DRY_RUN_OPTION, HELP_OPTION, REBUILD_OPTION};
use bubbles_common::error::{BubblesError, Result};

use crate::option::{BubbleOption, OptionKind, OptionValue, ParsedValues};

/// Parsed option values plus the arguments left for the container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Values of declared options.
    pub values: ParsedValues,
    /// Unknown flags and positional arguments, in original order.
    pub positionals: Vec<String>,
}

impl ParsedArgs {
    /// Whether `--rebuild` was given.
    #[must_use]
    pub fn rebuild(&self) -> bool {
        self.values.flag(REBUILD_OPTION)
    }

    /// Whether `--dryRun` (or `--dry-run`) was given.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.values.flag(DRY_RUN_OPTION)
    }

    /// The registry-level flags steering execution.
    #[must_use]
    pub fn flags(&self) -> RunFlags {
        RunFlags {
            rebuild: self.rebuild(),
            dry_run: self.dry_run(),
        }
    }
}

/// Registry-level flags consumed by the execution driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Build the image even if it already exists.
    pub rebuild: bool,
    /// Print the plan instead of executing it.
    pub dry_run: bool,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Arguments were parsed; carry on.
    Parsed(ParsedArgs),
    /// Help was requested; the rendered usage text.
    Help(String),
}

/// Parses raw process arguments against a set of declared options.
pub trait ArgParser {
    /// Parses `args` (without the program name).
    ///
    /// # Errors
    ///
    /// Returns a parse error naming the offending flag when a declared
    /// option receives a malformed value.
    fn parse(&self, options: &[BubbleOption], args: &[String]) -> Result<ParseOutcome>;
}

/// [`ArgParser`] backed by a `clap` command generated at runtime.
#[derive(Debug, Clone)]
pub struct ClapArgParser {
    bin_name: String,
    about: Option<String>,
}

impl ClapArgParser {
    /// Creates a parser reporting usage under `bin_name`.
    #[must_use]
    pub fn new(bin_name: impl Into<String>) -> Self {
        Self {
            bin_name: bin_name.into(),
            about: None,
        }
    }

    /// Sets the one-line description shown in help output.
    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    fn command(&self, options: &[BubbleOption]) -> Command {
        let mut command = Command::new(self.bin_name.clone())
            .color(ColorChoice::Never)
            .disable_version_flag(true)
            .disable_help_flag(true)
            .args_override_self(true)
            .override_usage(format!("{} [OPTIONS] [ARGS]...", self.bin_name))
            .arg(
                Arg::new(HELP_OPTION)
                    .long(HELP_OPTION)
                    .action(ArgAction::Help)
                    .help("Print help"),
            );
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        options.iter().fold(command, |cmd, option| cmd.arg(to_arg(option)))
    }
}

impl ArgParser for ClapArgParser {
    fn parse(&self, options: &[BubbleOption], args: &[String]) -> Result<ParseOutcome> {
        let (known, positionals) = split_arguments(options, args);
        tracing::debug!(?known, ?positionals, "split command-line arguments");

        let argv = std::iter::once(self.bin_name.clone()).chain(known);
        match self.command(options).try_get_matches_from(argv) {
            Ok(matches) => Ok(ParseOutcome::Parsed(ParsedArgs {
                values: collect_values(options, &matches),
                positionals,
            })),
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                Ok(ParseOutcome::Help(err.render().to_string()))
            }
            Err(err) => Err(BubblesError::Parse {
                message: first_line(&err.to_string()),
            }),
        }
    }
}

fn to_arg(option: &BubbleOption) -> Arg {
    let arg = Arg::new(option.name.clone())
        .long(option.name.clone())
        .help(option.description.clone());
    let arg = if option.name == DRY_RUN_OPTION {
        arg.visible_alias(DRY_RUN_ALIAS)
    } else {
        arg
    };
    match option.kind {
        OptionKind::Boolean => arg.action(ArgAction::SetTrue),
        OptionKind::String => arg.action(ArgAction::Set).value_name("VALUE"),
    }
}

fn collect_values(options: &[BubbleOption], matches: &ArgMatches) -> ParsedValues {
    let mut values = ParsedValues::new();
    for option in options {
        match option.kind {
            OptionKind::Boolean => {
                let set = matches.get_flag(&option.name);
                values.insert(option.name.clone(), OptionValue::Flag(set));
            }
            OptionKind::String => {
                if let Some(value) = matches.get_one::<String>(&option.name) {
                    values.insert(option.name.clone(), OptionValue::Text(value.clone()));
                }
            }
        }
    }
    values
}

enum Token<'a> {
    Help,
    Declared(&'a BubbleOption),
}

fn classify<'a>(options: &'a [BubbleOption], arg: &str) -> Option<Token<'a>> {
    let body = arg.strip_prefix("--")?;
    let name = body.split_once('=').map_or(body, |(name, _)| name);
    if name == HELP_OPTION {
        return Some(Token::Help);
    }
    options
        .iter()
        .find(|o| o.name == name || (o.name == DRY_RUN_OPTION && name == DRY_RUN_ALIAS))
        .map(Token::Declared)
}

/// Splits `args` into tokens for the declared options and pass-through
/// arguments. Everything after a bare `--` passes through.
fn split_arguments(options: &[BubbleOption], args: &[String]) -> (Vec<String>, Vec<String>) {
    let mut known = Vec::new();
    let mut passthrough = Vec::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            passthrough.extend(iter.cloned());
            break;
        }
        match classify(options, arg) {
            Some(Token::Help) => known.push(arg.clone()),
            Some(Token::Declared(option)) => {
                known.push(arg.clone());
                if option.kind == OptionKind::String && !arg.contains('=') {
                    if let Some(value) = iter.next_if(|next| !next.starts_with('-')) {
                        known.push(value.clone());
                    }
                }
            }
            None => passthrough.push(arg.clone()),
        }
    }
    (known, passthrough)
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or(message).trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
