//! The asset manifest: a cache name plus the fixed application-shell paths.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cache name used by [`Manifest::default`].
pub const DEFAULT_CACHE_NAME: &str = "app-shell-v1";

/// Asset paths used by [`Manifest::default`].
pub const DEFAULT_ASSETS: &[&str] = &[
    "/",
    "/dashboard",
    "/add_member",
    "/fees",
    "/static/manifest.json",
    "/static/style.css",
    "/static/icon.png",
];

/// The fixed set of assets precached at install time, together with the
/// name of the store they live in.
///
/// The cache name doubles as a version tag: changing the deployed assets
/// requires bumping it, which leaves the old store behind untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Version-tagged store name.
    pub cache_name: String,
    /// Root-relative paths precached at install time, in install order.
    pub assets: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            assets: DEFAULT_ASSETS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Manifest {
    /// Creates a validated manifest from a cache name and asset paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestInvalid`] if the cache name is empty, any
    /// path is not root-relative, or a path appears twice.
    pub fn new<I, S>(cache_name: impl Into<String>, assets: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let manifest = Self {
            cache_name: cache_name.into(),
            assets: assets.into_iter().map(Into::into).collect(),
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parses and validates a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed TOML, or
    /// [`Error::ManifestInvalid`] if the content fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads and validates a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&text)
    }

    /// Checks the invariants every manifest must hold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestInvalid`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.cache_name.is_empty() {
            return Err(Error::ManifestInvalid("cache name is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for path in &self.assets {
            if !path.starts_with('/') {
                return Err(Error::ManifestInvalid(format!(
                    "asset path '{path}' is not root-relative"
                )));
            }
            if !seen.insert(path.as_str()) {
                return Err(Error::ManifestInvalid(format!(
                    "duplicate asset path '{path}'"
                )));
            }
        }
        Ok(())
    }
}
