//! Global configuration model for the bubbles tools.
//!
//! Every field has a default, so a missing or partial configuration file is
//! fine. The file is JSON, found through `BUBBLES_CONFIG` or the per-user
//! default location.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{BubblesError, Result};
use crate::types::ContainerName;

/// Root configuration for the bubbles tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BubblesConfig {
    /// Docker binary name or path.
    pub docker_binary: String,
    /// Base image used when no component sets one.
    pub default_base_image: String,
    /// Bubble name used when no component sets one.
    pub default_name: String,
    /// Prefix for container and image names.
    pub name_prefix: String,
    /// Suffix turning a container name into an image name.
    pub image_suffix: String,
    /// Entrypoint forced on every container.
    pub entrypoint: String,
}

impl Default for BubblesConfig {
    fn default() -> Self {
        Self {
            docker_binary: constants::DEFAULT_DOCKER_BINARY.to_string(),
            default_base_image: constants::DEFAULT_BASE_IMAGE.to_string(),
            default_name: constants::DEFAULT_BUBBLE_NAME.to_string(),
            name_prefix: constants::NAME_PREFIX.to_string(),
            image_suffix: constants::IMAGE_SUFFIX.to_string(),
            entrypoint: constants::DEFAULT_ENTRYPOINT.to_string(),
        }
    }
}

impl BubblesConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BubblesError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Resolves the configuration from an environment snapshot.
    ///
    /// An explicit `BUBBLES_CONFIG` file must exist; the per-user default
    /// file is optional. `BUBBLES_DOCKER` overrides the docker binary.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be loaded.
    pub fn load(env: &BTreeMap<String, String>, home: Option<&Path>) -> Result<Self> {
        let explicit = env.get(constants::CONFIG_ENV).map(PathBuf::from);
        let mut config = match (explicit, home) {
            (Some(path), _) => Self::from_file(&path)?,
            (None, Some(home)) => {
                let path = constants::default_config_path(home);
                if path.is_file() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
            (None, None) => Self::default(),
        };

        if let Some(docker) = env.get(constants::DOCKER_ENV).filter(|v| !v.is_empty()) {
            config.docker_binary.clone_from(docker);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that every name used to build commands is non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("dockerBinary", &self.docker_binary),
            ("defaultBaseImage", &self.default_base_image),
            ("defaultName", &self.default_name),
            ("entrypoint", &self.entrypoint),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(BubblesError::Config {
                    message: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// Returns the container name for a bubble, falling back to the default.
    #[must_use]
    pub fn container_name(&self, bubble: Option<&str>) -> ContainerName {
        let bubble = bubble
            .filter(|b| !b.is_empty())
            .unwrap_or(self.default_name.as_str());
        ContainerName::for_bubble(&self.name_prefix, bubble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = BubblesConfig::default();
        assert_eq!(config.docker_binary, "docker");
        assert_eq!(config.default_base_image, "node:lts");
        assert_eq!(config.container_name(None).as_str(), "bubble-sandbox");
    }

    #[test]
    fn container_name_ignores_empty_bubble() {
        let config = BubblesConfig::default();
        assert_eq!(config.container_name(Some("")).as_str(), "bubble-sandbox");
        assert_eq!(
            config.container_name(Some("background")).as_str(),
            "bubble-background"
        );
    }

    #[test]
    fn load_without_files_uses_defaults() {
        let home = tempfile::tempdir().expect("tempdir");
        let config = BubblesConfig::load(&BTreeMap::new(), Some(home.path())).expect("load");
        assert_eq!(config, BubblesConfig::default());
    }

    #[test]
    fn load_reads_default_location() {
        let home = tempfile::tempdir().expect("tempdir");
        let path = constants::default_config_path(home.path());
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, r#"{"defaultBaseImage": "debian:bookworm"}"#).expect("write");

        let config = BubblesConfig::load(&BTreeMap::new(), Some(home.path())).expect("load");
        assert_eq!(config.default_base_image, "debian:bookworm");
        assert_eq!(config.default_name, "sandbox");
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let mut env = BTreeMap::new();
        let _ = env.insert(
            constants::CONFIG_ENV.to_string(),
            "/nonexistent/bubbles.json".to_string(),
        );
        let err = BubblesConfig::load(&env, None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bubbles.json"));
    }

    #[test]
    fn docker_env_overrides_binary() {
        let mut env = BTreeMap::new();
        let _ = env.insert(constants::DOCKER_ENV.to_string(), "podman".to_string());
        let config = BubblesConfig::load(&env, None).expect("load");
        assert_eq!(config.docker_binary, "podman");
    }

    #[test]
    fn invalid_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");
        let err = BubblesConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BubblesError::Serialization { .. }));
    }

    #[test]
    fn validate_rejects_empty_entrypoint() {
        let config = BubblesConfig {
            entrypoint: "  ".into(),
            ..BubblesConfig::default()
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("entrypoint"), "got: {msg}");
    }
}
