//! Compiling a merged configuration into a Dockerfile and run arguments.
//!
//! Everything here is a pure function of the merged configuration, the
//! pass-through arguments, and the configured defaults.

use bubbles_common::config::BubblesConfig;
use bubbles_common::types::{ContainerName, ImageName};

use crate::merge::MergedConfig;

/// Everything needed to build the image and run the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Name given to the container.
    pub container: ContainerName,
    /// Tag of the image built for it.
    pub image: ImageName,
    /// Dockerfile text, lines joined with `\n`.
    pub dockerfile: String,
    /// Arguments following `docker run`.
    pub run_args: Vec<String>,
}

impl BuildPlan {
    /// Compiles `merged` into a plan.
    #[must_use]
    pub fn compile(merged: &MergedConfig, positionals: &[String], config: &BubblesConfig) -> Self {
        let container = config.container_name(merged.name());
        let image = container.image(&config.image_suffix);
        let dockerfile = compile_dockerfile(merged, config);
        let run_args = compile_run_args(merged, &container, &image, positionals, config);
        tracing::debug!(
            container = %container,
            image = %image,
            lines = dockerfile.lines().count(),
            args = run_args.len(),
            "compiled build plan"
        );
        Self {
            container,
            image,
            dockerfile,
            run_args,
        }
    }

    /// Renders the run invocation as a copy-pasteable shell command.
    #[must_use]
    pub fn run_command_line(&self, docker: &str) -> String {
        std::iter::once(docker.to_string())
            .chain(std::iter::once("run".to_string()))
            .chain(self.run_args.iter().map(String::as_str).map(shell_quote))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Applies the image transforms to an empty sequence and prefixes `FROM`.
#[must_use]
pub fn compile_dockerfile(merged: &MergedConfig, config: &BubblesConfig) -> String {
    let base = merged
        .base_image()
        .unwrap_or(config.default_base_image.as_str());
    let lines = merged
        .image_transforms()
        .iter()
        .fold(Vec::new(), |lines, transform| transform.apply(lines));
    std::iter::once(format!("FROM {base}"))
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Applies the run-argument transforms to the baseline arguments, then
/// appends the image and the pass-through arguments.
#[must_use]
pub fn compile_run_args(
    merged: &MergedConfig,
    container: &ContainerName,
    image: &ImageName,
    positionals: &[String],
    config: &BubblesConfig,
) -> Vec<String> {
    let baseline = vec![
        "--rm".to_string(),
        "--name".to_string(),
        container.to_string(),
        "--entrypoint".to_string(),
        config.entrypoint.clone(),
    ];
    let mut args = merged
        .run_args_transforms()
        .iter()
        .fold(baseline, |args, transform| transform.apply(args));
    args.push(image.to_string());
    args.extend(positionals.iter().cloned());
    args
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@%+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::PartialConfig;
    use crate::transform::{ImageTransform, RunArgsTransform};

    fn merged(partials: Vec<(&str, PartialConfig)>) -> MergedConfig {
        let mut merged = MergedConfig::new();
        for (id, partial) in partials {
            merged.absorb(id, partial).expect("absorb");
        }
        merged
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = BubblesConfig::default();
        let plan = BuildPlan::compile(&MergedConfig::new(), &[], &config);
        assert_eq!(plan.dockerfile, "FROM node:lts");
        assert_eq!(plan.container.as_str(), "bubble-sandbox");
        assert_eq!(plan.image.as_str(), "bubble-sandbox-image");
        assert_eq!(
            plan.run_args,
            vec![
                "--rm",
                "--name",
                "bubble-sandbox",
                "--entrypoint",
                "bash",
                "bubble-sandbox-image"
            ]
        );
    }

    #[test]
    fn lines_follow_component_order() {
        let m = merged(vec![
            ("a", PartialConfig::new().image(ImageTransform::append(["X"]))),
            ("b", PartialConfig::new().image(ImageTransform::append(["Y"]))),
        ]);
        let dockerfile = compile_dockerfile(&m, &BubblesConfig::default());
        assert!(dockerfile.ends_with("\nX\nY"), "got: {dockerfile}");
    }

    #[test]
    fn prepend_lands_right_after_from() {
        let m = merged(vec![
            ("mount", PartialConfig::new().image(ImageTransform::append(["WORKDIR /w"]))),
            (
                "apt",
                PartialConfig::new().image(ImageTransform::prepend(["RUN apt update"])),
            ),
        ]);
        let dockerfile = compile_dockerfile(&m, &BubblesConfig::default());
        assert_eq!(dockerfile, "FROM node:lts\nRUN apt update\nWORKDIR /w");
    }

    #[test]
    fn compiling_twice_is_identical() {
        let m = merged(vec![(
            "a",
            PartialConfig::new()
                .with_base_image("debian:bookworm")
                .image(ImageTransform::append(["RUN true"]))
                .run_args(RunArgsTransform::prepend(["-it"])),
        )]);
        let config = BubblesConfig::default();
        let positionals = vec!["-c".to_string(), "ls".to_string()];
        assert_eq!(
            BuildPlan::compile(&m, &positionals, &config),
            BuildPlan::compile(&m, &positionals, &config)
        );
    }

    #[test]
    fn image_and_positionals_come_after_transforms() {
        let m = merged(vec![
            ("name", PartialConfig::new().with_name("work")),
            (
                "offline",
                PartialConfig::new().run_args(RunArgsTransform::append(["--network", "none"])),
            ),
        ]);
        let config = BubblesConfig::default();
        let plan = BuildPlan::compile(&m, &["-c".to_string(), "make".to_string()], &config);
        assert_eq!(
            plan.run_args,
            vec![
                "--rm",
                "--name",
                "bubble-work",
                "--entrypoint",
                "bash",
                "--network",
                "none",
                "bubble-work-image",
                "-c",
                "make"
            ]
        );
    }

    #[test]
    fn configured_defaults_are_respected() {
        let config = BubblesConfig {
            default_base_image: "alpine:3".into(),
            entrypoint: "sh".into(),
            ..BubblesConfig::default()
        };
        let plan = BuildPlan::compile(&MergedConfig::new(), &[], &config);
        assert_eq!(plan.dockerfile, "FROM alpine:3");
        assert_eq!(plan.run_args[4], "sh");
    }

    #[test]
    fn run_command_line_quotes_when_needed() {
        let plan = BuildPlan {
            container: ContainerName::new("bubble-x"),
            image: ImageName::new("bubble-x-image"),
            dockerfile: String::new(),
            run_args: vec!["-v".into(), "/my dir:/m".into(), "it's".into()],
        };
        assert_eq!(
            plan.run_command_line("docker"),
            r"docker run -v '/my dir:/m' 'it'\''s'"
        );
    }
}
