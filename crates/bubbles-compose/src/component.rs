//! Component definitions and the partial configuration they produce.
//!
//! A component bundles the options it declares with a handler that turns
//! parsed values into a [`PartialConfig`]. Components are immutable and
//! cheap to clone, so variant profiles can be derived from a base list.

use std::fmt;
use std::sync::Arc;

use bubbles_common::error::Result;

use crate::context::ExecutionContext;
use crate::option::{BubbleOption, ParsedValues};
use crate::transform::{ImageTransform, RunArgsTransform};

/// Everything a handler may look at.
#[derive(Debug, Clone, Copy)]
pub struct HandlerInput<'a> {
    /// Parsed option values.
    pub values: &'a ParsedValues,
    /// Arguments that were not consumed by any declared option.
    pub positionals: &'a [String],
    /// Every option in the composition, including registry-level ones.
    pub options: &'a [BubbleOption],
    /// Host state captured at startup.
    pub context: &'a ExecutionContext,
}

type HandlerFn = dyn Fn(&HandlerInput<'_>) -> Result<PartialConfig> + Send + Sync;

/// Configuration contributed by one component.
#[derive(Debug, Default)]
pub struct PartialConfig {
    /// Image the Dockerfile starts `FROM`.
    pub base_image: Option<String>,
    /// Bubble name used to derive container and image names.
    pub name: Option<String>,
    /// Dockerfile line transforms, in application order.
    pub image_transforms: Vec<ImageTransform>,
    /// Run-argument transforms, in application order.
    pub run_args_transforms: Vec<RunArgsTransform>,
}

impl PartialConfig {
    /// Creates an empty contribution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base image.
    #[must_use]
    pub fn with_base_image(mut self, image: impl Into<String>) -> Self {
        self.base_image = Some(image.into());
        self
    }

    /// Sets the bubble name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a Dockerfile transform.
    #[must_use]
    pub fn image(mut self, transform: ImageTransform) -> Self {
        self.image_transforms.push(transform);
        self
    }

    /// Adds a run-argument transform.
    #[must_use]
    pub fn run_args(mut self, transform: RunArgsTransform) -> Self {
        self.run_args_transforms.push(transform);
        self
    }

    /// Returns whether the contribution changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_image.is_none()
            && self.name.is_none()
            && self.image_transforms.is_empty()
            && self.run_args_transforms.is_empty()
    }
}

/// A reusable unit contributing options and configuration to a bubble.
#[derive(Clone)]
pub struct Component {
    id: String,
    options: Vec<BubbleOption>,
    handler: Arc<HandlerFn>,
}

impl Component {
    /// Creates a component from its id, declared options, and handler.
    pub fn new<F>(id: impl Into<String>, options: Vec<BubbleOption>, handler: F) -> Self
    where
        F: Fn(&HandlerInput<'_>) -> Result<PartialConfig> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            options,
            handler: Arc::new(handler),
        }
    }

    /// Component identity used for exclusion and error reports.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Options the component declares.
    #[must_use]
    pub fn options(&self) -> &[BubbleOption] {
        &self.options
    }

    /// Invokes the handler.
    ///
    /// # Errors
    ///
    /// Returns whatever error the handler reports, typically a rejected
    /// option value.
    pub fn handle(&self, input: &HandlerInput<'_>) -> Result<PartialConfig> {
        (self.handler)(input)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
