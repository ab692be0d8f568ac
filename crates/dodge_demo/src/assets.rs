//! Bundled game assets

use std::path::PathBuf;

/// Directory holding the bundled scene descriptions
pub const SCENE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes");

/// Scene played when no other is configured
pub const DEFAULT_SCENE: &str = "dodge.json";

/// Path of a bundled scene file
pub fn scene_path(name: &str) -> PathBuf {
    PathBuf::from(SCENE_DIR).join(name)
}

/// Path of the default scene, as a string for configuration files
pub fn default_scene() -> String {
    scene_path(DEFAULT_SCENE).display().to_string()
}
