//! Stylesheet loading for rendered pages.

use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Built-in stylesheet used when no custom CSS is supplied.
pub const DEFAULT_CSS: &str = include_str!("assets/default.css");

/// Loads CSS from `path`, falling back to [`DEFAULT_CSS`].
///
/// A path that does not exist falls back with a warning; a path that exists
/// but cannot be read is an error.
pub fn load_css(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(DEFAULT_CSS.to_string());
    };

    if !path.exists() {
        tracing::warn!(path = %path.display(), "stylesheet not found, using default");
        return Ok(DEFAULT_CSS.to_string());
    }

    fs::read_to_string(path).map_err(|source| Error::Css {
        path: path.to_path_buf(),
        source,
    })
}
