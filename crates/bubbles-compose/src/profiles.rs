//! Ready-made bubble profiles.

use crate::components::{
    ids, with_defaults, with_detached, with_interactive, with_mountpoint,
    with_npm_packages_option, with_offline_option, with_packages_option, with_user, Defaults,
};
use crate::composition::Composition;

/// Directory the working tree is mounted at inside the container.
pub const MOUNTPOINT: &str = "/mountpoint";

/// User the Node images ship with.
pub const NODE_USER: &str = "node";

/// Interactive Node sandbox with the current directory mounted.
#[must_use]
pub fn sandbox() -> Composition {
    Composition::new(vec![
        with_defaults(Defaults::new().base_image("node:lts").name("sandbox")),
        with_interactive(),
        with_packages_option(),
        with_npm_packages_option(),
        with_offline_option(),
        with_mountpoint(MOUNTPOINT, Some(NODE_USER)),
        with_user(NODE_USER),
    ])
}

/// The sandbox running detached under its own name.
#[must_use]
pub fn background() -> Composition {
    sandbox().compose(
        &[ids::INTERACTIVE],
        [
            with_defaults(Defaults::new().name("background")),
            with_detached(),
        ],
    )
}
