//! Ordered component lists defining one bubble profile.
//!
//! Order is significant: handlers run and their transforms apply in list
//! order. Deriving a variant never reorders the surviving components.

use std::collections::HashMap;

use bubbles_common::constants::{DRY_RUN_ALIAS, DRY_RUN_OPTION, HELP_OPTION, REBUILD_OPTION};
use bubbles_common::error::{BubblesError, Result};

use crate::component::Component;
use crate::option::BubbleOption;

/// Owner reported for options the framework itself declares.
pub const REGISTRY_OWNER: &str = "bubbles";

/// Options every bubble accepts regardless of its components.
#[must_use]
pub fn registry_options() -> Vec<BubbleOption> {
    vec![
        BubbleOption::flag(
            REBUILD_OPTION,
            "Rebuild the Docker image even if it already exists",
        ),
        BubbleOption::flag(
            DRY_RUN_OPTION,
            "Print the Dockerfile and docker run arguments without executing",
        ),
    ]
}

/// An ordered list of components.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    components: Vec<Component>,
}

impl Composition {
    /// Creates a composition from components in application order.
    #[must_use]
    pub const fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Returns a copy with `component` appended.
    #[must_use]
    pub fn with(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Returns a copy without the components whose id is in `ids`.
    ///
    /// Unknown ids are ignored.
    #[must_use]
    pub fn without(&self, ids: &[&str]) -> Self {
        self.components
            .iter()
            .filter(|c| !ids.contains(&c.id()))
            .cloned()
            .collect()
    }

    /// Derives a variant: drops `exclude`, then appends `append` in order.
    #[must_use]
    pub fn compose(&self, exclude: &[&str], append: impl IntoIterator<Item = Component>) -> Self {
        let mut derived = self.without(exclude);
        derived.components.extend(append);
        derived
    }

    /// Iterates over components in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether the composition has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component ids in application order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.components.iter().map(Component::id).collect()
    }

    /// Collects the registry-level options followed by every component's
    /// options, in composition order.
    ///
    /// # Errors
    ///
    /// Returns an error if two components declare the same option, a
    /// component reuses a framework option, or an option name is malformed.
    pub fn options(&self) -> Result<Vec<BubbleOption>> {
        let mut all = registry_options();
        let mut owners: HashMap<String, &str> = all
            .iter()
            .map(|o| (o.name.clone(), REGISTRY_OWNER))
            .collect();

        for component in &self.components {
            for option in component.options() {
                check_option_name(component.id(), &option.name)?;
                if let Some(first) = owners.insert(option.name.clone(), component.id()) {
                    if first == REGISTRY_OWNER {
                        return Err(reserved(component, option));
                    }
                    return Err(BubblesError::DuplicateOption {
                        name: option.name.clone(),
                        first: first.to_string(),
                        second: component.id().to_string(),
                    });
                }
                all.push(option.clone());
            }
        }
        tracing::debug!(count = all.len(), "collected options");
        Ok(all)
    }
}

fn reserved(component: &Component, option: &BubbleOption) -> BubblesError {
    BubblesError::ReservedOption {
        name: option.name.clone(),
        component: component.id().to_string(),
    }
}

fn check_option_name(component: &str, name: &str) -> Result<()> {
    if name == HELP_OPTION || name == DRY_RUN_ALIAS {
        return Err(BubblesError::ReservedOption {
            name: name.to_string(),
            component: component.to_string(),
        });
    }
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BubblesError::Config {
            message: format!("component \"{component}\" declares invalid option name \"{name}\""),
        })
    }
}

impl FromIterator<Component> for Composition {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Composition {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
