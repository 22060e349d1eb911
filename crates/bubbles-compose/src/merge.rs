//! Folding component contributions into one configuration.
//!
//! Transform lists concatenate in component order. The bubble name and base
//! image follow last-writer-wins, ignoring empty values. Single-use
//! directives (`CMD`, `USER`) may be contributed once per composition.

use std::collections::BTreeMap;

use bubbles_common::error::{BubblesError, Result};

use crate::component::{HandlerInput, PartialConfig};
use crate::composition::Composition;
use crate::context::ExecutionContext;
use crate::option::BubbleOption;
use crate::parser::ParsedArgs;
use crate::transform::{Directive, ImageTransform, RunArgsTransform};

/// The fold of every component's [`PartialConfig`].
#[derive(Debug, Default)]
pub struct MergedConfig {
    base_image: Option<String>,
    name: Option<String>,
    image_transforms: Vec<ImageTransform>,
    run_args_transforms: Vec<RunArgsTransform>,
    directives: BTreeMap<Directive, String>,
}

impl MergedConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one component's contribution into the configuration.
    ///
    /// # Errors
    ///
    /// Returns a conflict if `partial` sets a directive that an earlier
    /// contribution (or `partial` itself) already set.
    pub fn absorb(&mut self, component: &str, partial: PartialConfig) -> Result<()> {
        let PartialConfig {
            base_image,
            name,
            image_transforms,
            run_args_transforms,
        } = partial;

        for directive in image_transforms.iter().filter_map(ImageTransform::sets) {
            if let Some(first) = self.directives.get(&directive) {
                return Err(BubblesError::ConflictingDirective {
                    directive: directive.keyword().to_string(),
                    first: first.clone(),
                    second: component.to_string(),
                });
            }
            let _ = self.directives.insert(directive, component.to_string());
        }

        if let Some(image) = base_image.filter(|v| !v.is_empty()) {
            self.base_image = Some(image);
        }
        if let Some(name) = name.filter(|v| !v.is_empty()) {
            self.name = Some(name);
        }
        self.image_transforms.extend(image_transforms);
        self.run_args_transforms.extend(run_args_transforms);
        Ok(())
    }

    /// Base image set by the last component that set one.
    #[must_use]
    pub fn base_image(&self) -> Option<&str> {
        self.base_image.as_deref()
    }

    /// Bubble name set by the last component that set one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Dockerfile transforms in application order.
    #[must_use]
    pub fn image_transforms(&self) -> &[ImageTransform] {
        &self.image_transforms
    }

    /// Run-argument transforms in application order.
    #[must_use]
    pub fn run_args_transforms(&self) -> &[RunArgsTransform] {
        &self.run_args_transforms
    }
}

/// Invokes every handler in order and folds the results.
///
/// # Errors
///
/// Returns the first handler error or directive conflict encountered.
pub fn merge(
    composition: &Composition,
    parsed: &ParsedArgs,
    options: &[BubbleOption],
    context: &ExecutionContext,
) -> Result<MergedConfig> {
    let input = HandlerInput {
        values: &parsed.values,
        positionals: &parsed.positionals,
        options,
        context,
    };

    let mut merged = MergedConfig::new();
    for component in composition {
        let partial = component.handle(&input)?;
        tracing::debug!(
            component = component.id(),
            empty = partial.is_empty(),
            image_transforms = partial.image_transforms.len(),
            run_args_transforms = partial.run_args_transforms.len(),
            "component handled"
        );
        merged.absorb(component.id(), partial)?;
    }
    tracing::info!(
        components = composition.len(),
        name = merged.name().unwrap_or_default(),
        "merged composition"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    fn fixed(id: &str, make: fn() -> PartialConfig) -> Component {
        Component::new(id, Vec::new(), move |_| Ok(make()))
    }

    fn run(composition: &Composition) -> Result<MergedConfig> {
        let options = composition.options()?;
        merge(
            composition,
            &ParsedArgs::default(),
            &options,
            &ExecutionContext::default(),
        )
    }

    #[test]
    fn empty_composition_merges_to_empty_config() {
        let merged = run(&Composition::default()).expect("merge");
        assert!(merged.name().is_none());
        assert!(merged.base_image().is_none());
        assert!(merged.image_transforms().is_empty());
    }

    #[test]
    fn last_name_wins() {
        let composition = Composition::new(vec![
            fixed("a", || PartialConfig::new().with_name("a")),
            fixed("b", || PartialConfig::new().with_name("b")),
        ]);
        assert_eq!(run(&composition).expect("merge").name(), Some("b"));
    }

    #[test]
    fn empty_scalar_does_not_override() {
        let composition = Composition::new(vec![
            fixed("a", || PartialConfig::new().with_base_image("debian")),
            fixed("b", || PartialConfig::new().with_base_image("")),
            fixed("c", PartialConfig::new),
        ]);
        assert_eq!(run(&composition).expect("merge").base_image(), Some("debian"));
    }

    #[test]
    fn transform_lists_concatenate_in_component_order() {
        let composition = Composition::new(vec![
            fixed("a", || {
                PartialConfig::new()
                    .image(ImageTransform::append(["X"]))
                    .run_args(RunArgsTransform::append(["-a"]))
            }),
            fixed("b", || {
                PartialConfig::new()
                    .image(ImageTransform::append(["Y"]))
                    .run_args(RunArgsTransform::append(["-b"]))
            }),
        ]);
        let merged = run(&composition).expect("merge");
        let lines = merged
            .image_transforms()
            .iter()
            .fold(Vec::new(), |acc, t| t.apply(acc));
        assert_eq!(lines, vec!["X", "Y"]);
        assert_eq!(merged.run_args_transforms().len(), 2);
    }

    #[test]
    fn second_cmd_is_a_conflict() {
        let composition = Composition::new(vec![
            fixed("first", || {
                PartialConfig::new().image(ImageTransform::directive(Directive::Cmd, "bash"))
            }),
            fixed("middle", || PartialConfig::new().image(ImageTransform::append(["RUN x"]))),
            fixed("second", || {
                PartialConfig::new().image(ImageTransform::directive(Directive::Cmd, "sh"))
            }),
        ]);
        let err = run(&composition).unwrap_err();
        assert!(err.is_composition());
        let msg = err.to_string();
        assert!(msg.contains("CMD"), "got: {msg}");
        assert!(msg.contains("first") && msg.contains("second"), "got: {msg}");
    }

    #[test]
    fn same_component_setting_user_twice_conflicts() {
        let composition = Composition::new(vec![fixed("double", || {
            PartialConfig::new()
                .image(ImageTransform::directive(Directive::User, "a"))
                .image(ImageTransform::directive(Directive::User, "b"))
        })]);
        assert!(matches!(
            run(&composition).unwrap_err(),
            BubblesError::ConflictingDirective { .. }
        ));
    }

    #[test]
    fn different_directives_coexist() {
        let composition = Composition::new(vec![
            fixed("user", || {
                PartialConfig::new().image(ImageTransform::directive(Directive::User, "node"))
            }),
            fixed("cmd", || {
                PartialConfig::new().image(ImageTransform::directive(Directive::Cmd, "bash"))
            }),
        ]);
        let merged = run(&composition).expect("merge");
        let lines = merged
            .image_transforms()
            .iter()
            .fold(Vec::new(), |lines, t| t.apply(lines));
        assert_eq!(lines, vec!["USER node".to_string(), "CMD bash".to_string()]);
    }

    #[test]
    fn handler_error_stops_the_merge() {
        let composition = Composition::new(vec![Component::new("broken", Vec::new(), |_| {
            Err(BubblesError::InvalidValue {
                option: "portforward".into(),
                value: "abc".into(),
                reason: "not a port".into(),
            })
        })]);
        let msg = run(&composition).unwrap_err().to_string();
        assert!(msg.contains("--portforward"), "got: {msg}");
    }
}
