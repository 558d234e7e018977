//! Site configuration.
//!
//! A site is described by one YAML document. Every key is optional:
//!
//! ```yaml
//! base_url: https://example.com/app
//! form:
//!   auto_id: true
//!   form_method: get
//! views:
//!   root_dir: /srv/app
//!   theme: dark
//! ```

use std::path::{Path, PathBuf};

use pagekit_form::FormConfig;
use pagekit_view::ViewPaths;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading a [`SiteConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Everything a [`Site`](crate::Site) is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for form actions that are not full URLs.
    pub base_url: String,
    pub form: FormConfig,
    pub views: ViewPaths,
}

impl SiteConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading site config");
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }
}
