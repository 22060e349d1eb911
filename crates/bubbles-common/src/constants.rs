//! System-wide constants and default names.

use std::path::{Path, PathBuf};

/// Base image used when no component sets one.
pub const DEFAULT_BASE_IMAGE: &str = "node:lts";

/// Bubble name used when no component sets one.
pub const DEFAULT_BUBBLE_NAME: &str = "sandbox";

/// Prefix shared by every container and image this tool creates.
pub const NAME_PREFIX: &str = "bubble-";

/// Suffix appended to the container name to form the image name.
pub const IMAGE_SUFFIX: &str = "-image";

/// Entrypoint forced on every bubble container.
pub const DEFAULT_ENTRYPOINT: &str = "bash";

/// Docker binary looked up on `PATH` by default.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// Registry-level option forcing an image rebuild.
pub const REBUILD_OPTION: &str = "rebuild";

/// Registry-level option printing the compiled artifacts without acting.
pub const DRY_RUN_OPTION: &str = "dryRun";

/// Kebab-case alias accepted for [`DRY_RUN_OPTION`].
pub const DRY_RUN_ALIAS: &str = "dry-run";

/// Option name owned by the argument parser itself.
pub const HELP_OPTION: &str = "help";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "BUBBLES_CONFIG";

/// Environment variable overriding the docker binary.
pub const DOCKER_ENV: &str = "BUBBLES_DOCKER";

/// Returns the default configuration file location under `home`.
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(".config").join("bubbles").join("config.json")
}
