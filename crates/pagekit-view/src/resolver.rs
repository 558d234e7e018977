//! View path resolution.
//!
//! A view id maps to a file under one of three roots:
//!
//! 1. Ids starting with a path separator are rooted at the application root.
//!    Only that location is tried.
//! 2. Other ids are tried under the active theme's directory, then under the
//!    default views directory. The first existing file wins.
//!
//! Relative `themes_dir` and `views_dir` are taken relative to `root_dir`,
//! and a relative `root_dir` relative to the current directory.
//!
//! ```rust
//! use std::path::Path;
//! use pagekit_view::{ViewOrigin, ViewPaths, ViewResolver};
//!
//! let paths = ViewPaths {
//!     root_dir: "/srv/app".into(),
//!     theme: Some("dark".into()),
//!     ..ViewPaths::default()
//! };
//! let resolver = ViewResolver::new(paths);
//!
//! let tried: Vec<_> = resolver.candidates("home.html").into_iter().map(|(o, _)| o).collect();
//! assert_eq!(tried, vec![ViewOrigin::Theme, ViewOrigin::Default]);
//!
//! let rooted = resolver.candidates("/emails/welcome.html");
//! assert_eq!(rooted[0].1, Path::new("/srv/app/emails/welcome.html"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{is_separator, Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ViewError};

/// Directory layout used for view lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPaths {
    /// Application root; rooted view ids resolve against it.
    pub root_dir: PathBuf,
    /// Directory holding one subdirectory per theme.
    pub themes_dir: PathBuf,
    /// Default views directory.
    pub views_dir: PathBuf,
    /// Active theme name, if any.
    pub theme: Option<String>,
}

impl Default for ViewPaths {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            themes_dir: PathBuf::from("themes"),
            views_dir: PathBuf::from("views"),
            theme: None,
        }
    }
}

impl ViewPaths {
    /// Layout with default directory names under `root_dir`.
    pub fn under(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// File access used by the resolver.
pub trait ViewFs: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl ViewFs for DiskFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory files keyed by path, for embedded views and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashMap<PathBuf, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl ViewFs for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

/// Which root a view was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewOrigin {
    Root,
    Theme,
    Default,
}

/// A view id resolved to an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    /// The id as requested.
    pub view: String,
    pub path: PathBuf,
    pub origin: ViewOrigin,
}

/// Maps view ids to files.
#[derive(Clone)]
pub struct ViewResolver {
    paths: ViewPaths,
    fs: Arc<dyn ViewFs>,
}

impl fmt::Debug for ViewResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewResolver")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ViewResolver {
    /// Resolver over the local filesystem.
    pub fn new(paths: ViewPaths) -> Self {
        Self::with_fs(paths, DiskFs)
    }

    /// Resolver over a custom file source.
    ///
    /// A relative `root_dir` is made absolute against the current directory,
    /// so every [`ResolvedView::path`] is absolute.
    pub fn with_fs(mut paths: ViewPaths, fs: impl ViewFs + 'static) -> Self {
        if paths.root_dir.is_relative() {
            match std::path::absolute(&paths.root_dir) {
                Ok(root) => paths.root_dir = root,
                Err(err) => {
                    warn!(root = %paths.root_dir.display(), %err, "cannot make view root absolute")
                }
            }
        }
        Self {
            paths,
            fs: Arc::new(fs),
        }
    }

    pub fn paths(&self) -> &ViewPaths {
        &self.paths
    }

    /// Candidate files for `view`, in lookup order.
    pub fn candidates(&self, view: &str) -> Vec<(ViewOrigin, PathBuf)> {
        let root = &self.paths.root_dir;

        if view.starts_with(is_separator) {
            let relative = view.trim_start_matches(is_separator);
            return vec![(ViewOrigin::Root, root.join(relative))];
        }

        let mut candidates = Vec::with_capacity(2);
        if let Some(theme) = &self.paths.theme {
            candidates.push((
                ViewOrigin::Theme,
                root.join(&self.paths.themes_dir).join(theme).join(view),
            ));
        }
        candidates.push((
            ViewOrigin::Default,
            root.join(&self.paths.views_dir).join(view),
        ));
        candidates
    }

    /// Finds the first existing candidate for `view`.
    ///
    /// # Errors
    ///
    /// [`ViewError::ViewNotFound`] naming the last candidate tried.
    pub fn resolve(&self, view: &str) -> Result<ResolvedView> {
        let mut last = PathBuf::new();
        for (origin, path) in self.candidates(view) {
            debug!(view, ?origin, path = %path.display(), "trying view candidate");
            if self.fs.is_file(&path) {
                debug!(view, ?origin, "view resolved");
                return Ok(ResolvedView {
                    view: view.to_string(),
                    path,
                    origin,
                });
            }
            last = path;
        }

        warn!(view, path = %last.display(), "view not found");
        Err(ViewError::ViewNotFound {
            view: view.to_string(),
            path: last,
        })
    }

    /// Reads the source of a resolved view.
    pub fn read(&self, resolved: &ResolvedView) -> Result<String> {
        self.fs
            .read_to_string(&resolved.path)
            .map_err(|source| ViewError::Io {
                path: resolved.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(fs: MemoryFs, theme: Option<&str>) -> ViewResolver {
        let mut paths = ViewPaths::under("/app");
        paths.theme = theme.map(String::from);
        ViewResolver::with_fs(paths, fs)
    }

    #[test]
    fn test_theme_wins_over_default() {
        let fs = MemoryFs::new()
            .with_file("/app/themes/dark/home.html", "themed")
            .with_file("/app/views/home.html", "plain");
        let resolved = resolver(fs, Some("dark")).resolve("home.html").unwrap();
        assert_eq!(resolved.origin, ViewOrigin::Theme);
        assert_eq!(resolved.path, PathBuf::from("/app/themes/dark/home.html"));
    }

    #[test]
    fn test_falls_back_to_default() {
        let fs = MemoryFs::new().with_file("/app/views/home.html", "plain");
        let resolved = resolver(fs, Some("dark")).resolve("home.html").unwrap();
        assert_eq!(resolved.origin, ViewOrigin::Default);
    }

    #[test]
    fn test_no_theme_skips_theme_root() {
        let fs = MemoryFs::new().with_file("/app/themes/dark/home.html", "themed");
        let err = resolver(fs, None).resolve("home.html").unwrap_err();
        assert!(matches!(
            err,
            ViewError::ViewNotFound { path, .. } if path == PathBuf::from("/app/views/home.html")
        ));
    }

    #[test]
    fn test_rooted_never_falls_through() {
        let fs = MemoryFs::new()
            .with_file("/app/views/mail.html", "default")
            .with_file("/app/themes/dark/mail.html", "themed");
        let err = resolver(fs, Some("dark")).resolve("/mail.html").unwrap_err();
        assert!(matches!(
            err,
            ViewError::ViewNotFound { path, .. } if path == PathBuf::from("/app/mail.html")
        ));
    }

    #[test]
    fn test_rooted_resolves_against_root() {
        let fs = MemoryFs::new().with_file("/app/mail/welcome.html", "hi");
        let r = resolver(fs, Some("dark"));
        let resolved = r.resolve("/mail/welcome.html").unwrap();
        assert_eq!(resolved.origin, ViewOrigin::Root);
        assert_eq!(r.read(&resolved).unwrap(), "hi");
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let resolver = ViewResolver::with_fs(ViewPaths::default(), MemoryFs::new());
        assert!(resolver.paths().root_dir.is_absolute());
        for (_, path) in resolver.candidates("home.html") {
            assert!(path.is_absolute());
        }

        let err = resolver.resolve("home.html").unwrap_err();
        assert!(matches!(err, ViewError::ViewNotFound { path, .. } if path.is_absolute()));
    }

    #[test]
    fn test_view_paths_from_json() {
        let paths: ViewPaths =
            serde_json::from_str(r#"{"root_dir": "/srv", "theme": "light"}"#).unwrap();
        assert_eq!(paths.views_dir, PathBuf::from("views"));
        assert_eq!(paths.theme.as_deref(), Some("light"));
    }
}
