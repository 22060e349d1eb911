//! Built-in components.
//!
//! Each function returns a fresh [`Component`]. Package installation lines
//! are prepended so they run as root before any user switch; mounts,
//! directives, and network flags are appended.

use bubbles_common::error::{BubblesError, Result};

use crate::component::{Component, HandlerInput, PartialConfig};
use crate::option::{split_list, BubbleOption};
use crate::transform::{Directive, ImageTransform, RunArgsTransform};

/// Component ids, used with [`Composition::without`](crate::composition::Composition::without).
pub mod ids {
    /// [`with_defaults`](super::with_defaults).
    pub const DEFAULTS: &str = "defaults";
    /// [`with_interactive`](super::with_interactive).
    pub const INTERACTIVE: &str = "interactive";
    /// [`with_detached`](super::with_detached).
    pub const DETACHED: &str = "detached";
    /// [`with_mountpoint`](super::with_mountpoint).
    pub const MOUNTPOINT: &str = "mountpoint";
    /// [`with_offline_option`](super::with_offline_option).
    pub const OFFLINE_OPTION: &str = "offline-option";
    /// [`with_packages_option`](super::with_packages_option).
    pub const PACKAGES_OPTION: &str = "packages-option";
    /// [`with_npm_packages_option`](super::with_npm_packages_option).
    pub const NPM_PACKAGES_OPTION: &str = "npm-packages-option";
    /// [`with_packages`](super::with_packages).
    pub const PACKAGES: &str = "packages";
    /// [`with_npm_packages`](super::with_npm_packages).
    pub const NPM_PACKAGES: &str = "npm-packages";
    /// [`with_runs`](super::with_runs).
    pub const RUNS: &str = "runs";
    /// [`with_cmd`](super::with_cmd).
    pub const CMD: &str = "cmd";
    /// [`with_user`](super::with_user).
    pub const USER: &str = "user";
    /// [`with_port`](super::with_port).
    pub const PORT: &str = "port";
    /// [`with_ports_option`](super::with_ports_option).
    pub const PORTS_OPTION: &str = "ports-option";
}

/// Scalar defaults contributed by [`with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Base image.
    pub from: Option<String>,
    /// Bubble name.
    pub name: Option<String>,
}

impl Defaults {
    /// Creates empty defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base image.
    #[must_use]
    pub fn base_image(mut self, image: impl Into<String>) -> Self {
        self.from = Some(image.into());
        self
    }

    /// Sets the bubble name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Contributes a base image and/or bubble name.
#[must_use]
pub fn with_defaults(defaults: Defaults) -> Component {
    Component::new(ids::DEFAULTS, Vec::new(), move |_| {
        let mut partial = PartialConfig::new();
        if let Some(from) = &defaults.from {
            partial = partial.with_base_image(from.clone());
        }
        if let Some(name) = &defaults.name {
            partial = partial.with_name(name.clone());
        }
        Ok(partial)
    })
}

/// Attaches a terminal: `-it`.
#[must_use]
pub fn with_interactive() -> Component {
    Component::new(ids::INTERACTIVE, Vec::new(), |_| {
        Ok(PartialConfig::new().run_args(RunArgsTransform::prepend(["-it"])))
    })
}

/// Runs the container in the background: `-d`.
#[must_use]
pub fn with_detached() -> Component {
    Component::new(ids::DETACHED, Vec::new(), |_| {
        Ok(PartialConfig::new().run_args(RunArgsTransform::prepend(["-d"])))
    })
}

/// Mounts the current directory at `path` and makes it the working directory.
///
/// When `user` is given the mountpoint is handed over to that user.
#[must_use]
pub fn with_mountpoint(path: &str, user: Option<&str>) -> Component {
    let path = path.to_string();
    let user = user.map(String::from);
    Component::new(ids::MOUNTPOINT, Vec::new(), move |input| {
        let mut lines = vec![format!("RUN mkdir {path}")];
        if let Some(user) = &user {
            lines.push(format!("RUN chown -R {user}:{user} {path}"));
        }
        lines.push(format!("WORKDIR {path}"));

        let volume = format!("{}:{path}", input.context.cwd.display());
        Ok(PartialConfig::new()
            .image(ImageTransform::append(lines))
            .run_args(RunArgsTransform::prepend(["-v".to_string(), volume])))
    })
}

/// Adds `--offline`, which disables container networking.
#[must_use]
pub fn with_offline_option() -> Component {
    Component::new(
        ids::OFFLINE_OPTION,
        vec![BubbleOption::flag(
            "offline",
            "Run container with network access disabled",
        )],
        |input| {
            let partial = PartialConfig::new();
            Ok(if input.values.flag("offline") {
                partial.run_args(RunArgsTransform::append(["--network", "none"]))
            } else {
                partial
            })
        },
    )
}

/// Adds `--packages`, a comma-separated list installed with apt.
#[must_use]
pub fn with_packages_option() -> Component {
    Component::new(
        ids::PACKAGES_OPTION,
        vec![BubbleOption::text(
            "packages",
            "Comma-separated list of packages to install with apt",
        )],
        |input| Ok(install_from_option(input, "packages", apt_install)),
    )
}

/// Adds `--npm`, a comma-separated list installed with `npm install -g`.
#[must_use]
pub fn with_npm_packages_option() -> Component {
    Component::new(
        ids::NPM_PACKAGES_OPTION,
        vec![BubbleOption::text(
            "npm",
            "Comma-separated list of packages to install with npm -g",
        )],
        |input| Ok(install_from_option(input, "npm", npm_install)),
    )
}

/// Always installs `packages` with apt.
#[must_use]
pub fn with_packages<I, S>(packages: I) -> Component
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
    Component::new(ids::PACKAGES, Vec::new(), move |_| Ok(install(&packages, apt_install)))
}

/// Always installs `packages` with `npm install -g`.
#[must_use]
pub fn with_npm_packages<I, S>(packages: I) -> Component
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let packages: Vec<String> = packages.into_iter().map(Into::into).collect();
    Component::new(ids::NPM_PACKAGES, Vec::new(), move |_| Ok(install(&packages, npm_install)))
}

/// Adds a `RUN` line per command, ahead of the lines built so far.
#[must_use]
pub fn with_runs<I, S>(runs: I) -> Component
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let lines: Vec<String> = runs
        .into_iter()
        .map(|run| format!("RUN {}", Into::<String>::into(run)))
        .collect();
    Component::new(ids::RUNS, Vec::new(), move |_| {
        Ok(PartialConfig::new().image(ImageTransform::prepend(lines.clone())))
    })
}

/// Sets the image's final command. At most one per composition.
#[must_use]
pub fn with_cmd(cmd: &str) -> Component {
    let cmd = cmd.to_string();
    Component::new(ids::CMD, Vec::new(), move |_| {
        Ok(PartialConfig::new().image(ImageTransform::directive(Directive::Cmd, cmd.clone())))
    })
}

/// Switches to `user`. At most one per composition.
///
/// Also adds `--history`, which mounts the host's bash history into the
/// user's home directory.
#[must_use]
pub fn with_user(user: &str) -> Component {
    let user = user.to_string();
    Component::new(
        ids::USER,
        vec![BubbleOption::flag(
            "history",
            "Mount local bash history into container",
        )],
        move |input| {
            let partial = PartialConfig::new()
                .image(ImageTransform::directive(Directive::User, user.clone()));
            if !input.values.flag("history") {
                return Ok(partial);
            }
            let home = input.context.home().ok_or_else(|| BubblesError::Config {
                message: "--history needs a home directory, but HOME is not set".into(),
            })?;
            let mount = format!(
                "{}:/home/{user}/.bash_history",
                home.join(".bash_history").display()
            );
            Ok(partial.run_args(RunArgsTransform::append(["-v".to_string(), mount])))
        },
    )
}

/// Publishes `port` on the same host port.
#[must_use]
pub fn with_port(port: u16) -> Component {
    Component::new(ids::PORT, Vec::new(), move |_| {
        Ok(PartialConfig::new().run_args(RunArgsTransform::append(publish(port))))
    })
}

/// Adds `--portforward`, a comma-separated list of ports to publish.
#[must_use]
pub fn with_ports_option() -> Component {
    Component::new(
        ids::PORTS_OPTION,
        vec![BubbleOption::text(
            "portforward",
            "Comma-separated port numbers to expose from the container",
        )],
        |input| {
            let Some(raw) = input.values.text("portforward") else {
                return Ok(PartialConfig::new());
            };
            let ports = parse_ports(raw)?;
            let args: Vec<String> = ports.into_iter().flat_map(publish).collect();
            Ok(PartialConfig::new().run_args(RunArgsTransform::append(args)))
        },
    )
}

fn publish(port: u16) -> [String; 2] {
    ["-p".to_string(), format!("{port}:{port}")]
}

fn parse_ports(raw: &str) -> Result<Vec<u16>> {
    let items = split_list(raw);
    if items.is_empty() {
        return Err(invalid_port(raw, "no port given"));
    }
    items
        .iter()
        .map(|item| match item.parse::<u16>() {
            Ok(0) => Err(invalid_port(raw, "port 0 cannot be published")),
            Ok(port) => Ok(port),
            Err(e) => Err(invalid_port(raw, &format!("\"{item}\": {e}"))),
        })
        .collect()
}

fn invalid_port(raw: &str, reason: &str) -> BubblesError {
    BubblesError::InvalidValue {
        option: "portforward".into(),
        value: raw.into(),
        reason: reason.into(),
    }
}

fn apt_install(packages: &[String]) -> String {
    format!("RUN apt update && apt install -y {}", packages.join(" "))
}

fn npm_install(packages: &[String]) -> String {
    format!("RUN npm install -g {}", packages.join(" "))
}

fn install(packages: &[String], line: fn(&[String]) -> String) -> PartialConfig {
    if packages.is_empty() {
        return PartialConfig::new();
    }
    PartialConfig::new().image(ImageTransform::prepend([line(packages)]))
}

fn install_from_option(
    input: &HandlerInput<'_>,
    option: &str,
    line: fn(&[String]) -> String,
) -> PartialConfig {
    input
        .values
        .text(option)
        .map_or_else(PartialConfig::new, |raw| install(&split_list(raw), line))
}
