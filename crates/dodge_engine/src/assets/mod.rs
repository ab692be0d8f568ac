//! Resource loading
//!
//! Loads are synchronous; a failed load aborts whatever construction step
//! asked for it and is not retried.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::scene::error::{SceneError, SceneResult};

/// Read a UTF-8 text resource
pub fn load_text(path: impl AsRef<Path>) -> SceneResult<String> {
    let path = path.as_ref();
    log::debug!("Loading text resource {}", path.display());

    std::fs::read_to_string(path).map_err(|source| {
        log::error!("Failed to load {}: {}", path.display(), source);
        SceneError::ResourceLoad { path: path.display().to_string(), source }
    })
}

/// Read and decode a JSON resource
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> SceneResult<T> {
    let path = path.as_ref();
    let text = load_text(path)?;

    serde_json::from_str(&text).map_err(|source| {
        log::error!("Failed to parse {}: {}", path.display(), source);
        SceneError::Parse { path: path.display().to_string(), source }
    })
}
