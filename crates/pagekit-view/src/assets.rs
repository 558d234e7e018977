//! Script and stylesheet references collected for the page layout.
//!
//! References are grouped by kind under [`JS_FILES`](crate::JS_FILES) and
//! [`CSS_FILES`](crate::CSS_FILES), and within a kind by location. A
//! reference containing `://` is remote, anything else is local.

use serde::{Deserialize, Serialize};

/// The list a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    /// The store variable holding this kind's references.
    pub fn store_key(self) -> &'static str {
        match self {
            AssetKind::Script => crate::store::JS_FILES,
            AssetKind::Stylesheet => crate::store::CSS_FILES,
        }
    }
}

/// Where a reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetLocation {
    Local,
    Remote,
}

impl AssetLocation {
    /// Classifies a reference by the presence of a scheme separator.
    ///
    /// ```rust
    /// use pagekit_view::AssetLocation;
    ///
    /// assert_eq!(AssetLocation::of("https://cdn.test/app.js"), AssetLocation::Remote);
    /// assert_eq!(AssetLocation::of("//cdn.test/app.js"), AssetLocation::Local);
    /// assert_eq!(AssetLocation::of("js/app.js"), AssetLocation::Local);
    /// ```
    pub fn of(url: &str) -> Self {
        if url.contains("://") {
            AssetLocation::Remote
        } else {
            AssetLocation::Local
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetLocation::Local => "local",
            AssetLocation::Remote => "remote",
        }
    }
}
