//! # Pagekit View - Themed Views with Per-Request Variables
//!
//! `pagekit-view` resolves view ids to template files and renders them with
//! a request's variables in scope.
//!
//! ## Core Concepts
//!
//! - [`TemplateStore`]: Variable bindings; last-write-wins, except the
//!   append-only notification list and the reserved `view_template_file`
//! - [`ViewResolver`]: Rooted ids, then theme, then default views directory
//! - [`TemplateEngine`]: Executes a view; [`MiniJinjaEngine`] by default
//! - [`ViewRenderer`]: Shared resolver + engine
//! - [`View`]: One request's store bound to a shared renderer
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use pagekit_view::{View, ViewPaths, ViewRenderer, ViewResolver};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("views")).unwrap();
//! std::fs::write(dir.path().join("views/hello.html"), "<h1>{{ title }}</h1>").unwrap();
//!
//! let renderer = Arc::new(ViewRenderer::new(ViewResolver::new(ViewPaths::under(dir.path()))));
//! let mut view = View::new(renderer);
//! view.set("title", "Tom & Jerry").unwrap();
//!
//! assert_eq!(view.render("hello.html").unwrap(), "<h1>Tom &amp; Jerry</h1>");
//! ```
//!
//! Templates can write back to the store through the `store` object
//! (`store.set`, `store.noty`, `store.add_js_file`, `store.add_css_file`);
//! see [`engine`] for details.

mod assets;
pub mod engine;
mod error;
mod renderer;
mod resolver;
mod store;

pub use assets::{AssetKind, AssetLocation};
pub use engine::{MiniJinjaEngine, RenderedView, TemplateEngine};
pub use error::{Result, ViewError};
pub use renderer::{View, ViewRenderer};
pub use resolver::{DiskFs, MemoryFs, ResolvedView, ViewFs, ViewOrigin, ViewPaths, ViewResolver};
pub use store::{
    StoreWrite, TemplateStore, CSS_FILES, JS_FILES, NOTIFICATIONS, STORE_OBJECT, VIEW_TEMPLATE_FILE,
};
