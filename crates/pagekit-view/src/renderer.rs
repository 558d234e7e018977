//! Rendering views against a store.
//!
//! [`ViewRenderer`] is built once and shared. [`View`] pairs it with a fresh
//! [`TemplateStore`] for each request, so bindings never leak between
//! requests.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pagekit_view::{MemoryFs, View, ViewPaths, ViewRenderer, ViewResolver};
//!
//! let fs = MemoryFs::new()
//!     .with_file("/app/views/home.txt", "{{ title }}{{ store.noty('welcome') }}");
//! let renderer = Arc::new(ViewRenderer::new(ViewResolver::with_fs(ViewPaths::under("/app"), fs)));
//!
//! let mut view = View::new(renderer);
//! view.set("title", "Home").unwrap();
//! assert_eq!(view.render("home.txt").unwrap(), "Home");
//! assert_eq!(view.store().notifications(), vec!["welcome"]);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::{Result, ViewError};
use crate::resolver::ViewResolver;
use crate::store::{TemplateStore, VIEW_TEMPLATE_FILE};

/// Resolves and executes views.
pub struct ViewRenderer {
    resolver: ViewResolver,
    engine: Box<dyn TemplateEngine>,
}

impl fmt::Debug for ViewRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRenderer")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl ViewRenderer {
    /// Renderer backed by [`MiniJinjaEngine`].
    pub fn new(resolver: ViewResolver) -> Self {
        let engine = MiniJinjaEngine::new(resolver.clone());
        Self::with_engine(resolver, engine)
    }

    pub fn with_engine(resolver: ViewResolver, engine: impl TemplateEngine + 'static) -> Self {
        Self {
            resolver,
            engine: Box::new(engine),
        }
    }

    pub fn resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    /// Renders `view` with every binding of `store` in scope.
    ///
    /// Writes made by the template are applied to `store` once rendering
    /// succeeds. On any failure the store is left as it was.
    ///
    /// # Errors
    ///
    /// - [`ViewError::ReservedName`] when `store` already binds
    ///   [`VIEW_TEMPLATE_FILE`], or the template tries to set it
    /// - [`ViewError::ViewNotFound`] when no candidate file exists
    /// - [`ViewError::Io`] or [`ViewError::Template`] when reading or
    ///   executing the view fails
    pub fn render(&self, store: &mut TemplateStore, view: &str) -> Result<String> {
        if store.has(VIEW_TEMPLATE_FILE) {
            return Err(ViewError::ReservedName(VIEW_TEMPLATE_FILE.to_string()));
        }

        let resolved = self.resolver.resolve(view)?;
        let source = self.resolver.read(&resolved)?;
        let rendered = self.engine.render_view(&resolved, &source, store.vars())?;

        debug!(
            view,
            writes = rendered.writes.len(),
            bytes = rendered.output.len(),
            "view rendered"
        );
        store.apply(rendered.writes)?;
        Ok(rendered.output)
    }
}

/// A store and a shared renderer, for one request.
#[derive(Debug, Clone)]
pub struct View {
    store: TemplateStore,
    renderer: Arc<ViewRenderer>,
}

impl View {
    pub fn new(renderer: Arc<ViewRenderer>) -> Self {
        Self::with_store(renderer, TemplateStore::new())
    }

    pub fn with_store(renderer: Arc<ViewRenderer>, store: TemplateStore) -> Self {
        Self { store, renderer }
    }

    /// See [`TemplateStore::set`].
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        self.store.set(name, value)
    }

    /// See [`TemplateStore::get`].
    pub fn get(&self, name: &str) -> Result<&serde_json::Value> {
        self.store.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.store.has(name)
    }

    pub fn add_js_file(&mut self, url: &str) {
        self.store.add_js_file(url);
    }

    pub fn add_css_file(&mut self, url: &str) {
        self.store.add_css_file(url);
    }

    /// See [`ViewRenderer::render`].
    pub fn render(&mut self, view: &str) -> Result<String> {
        self.renderer.render(&mut self.store, view)
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TemplateStore {
        &mut self.store
    }

    pub fn into_store(self) -> TemplateStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::resolver::{MemoryFs, ViewFs, ViewPaths};
    use crate::store::NOTIFICATIONS;

    /// Files that can change between renders.
    #[derive(Clone, Default)]
    struct EditableFs(Arc<Mutex<HashMap<PathBuf, String>>>);

    impl EditableFs {
        fn write(&self, path: &str, body: &str) {
            self.0.lock().unwrap().insert(PathBuf::from(path), body.to_string());
        }
    }

    impl ViewFs for EditableFs {
        fn is_file(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains_key(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.0
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn renderer(files: &[(&str, &str)]) -> Arc<ViewRenderer> {
        let fs = files
            .iter()
            .fold(MemoryFs::new(), |fs, (path, body)| fs.with_file(*path, *body));
        Arc::new(ViewRenderer::new(ViewResolver::with_fs(
            ViewPaths::under("/app"),
            fs,
        )))
    }

    #[test]
    fn test_store_values_in_scope() {
        let mut view = View::new(renderer(&[("/app/views/a.txt", "{{ greeting }}, {{ who }}")]));
        view.set("greeting", "Hello").unwrap();
        view.set("who", "Ada").unwrap();
        assert_eq!(view.render("a.txt").unwrap(), "Hello, Ada");
    }

    #[test]
    fn test_preexisting_reserved_binding_fails() {
        let restored: TemplateStore =
            serde_json::from_value(serde_json::json!({ "view_template_file": "x" })).unwrap();
        let mut view = View::with_store(renderer(&[("/app/views/a.txt", "x")]), restored);
        assert!(matches!(
            view.render("a.txt"),
            Err(ViewError::ReservedName(name)) if name == VIEW_TEMPLATE_FILE
        ));
    }

    #[test]
    fn test_template_writes_applied_after_success() {
        let mut view = View::new(renderer(&[(
            "/app/views/a.txt",
            "{{ store.set('title', 'From view') }}{{ store.noty('hi') }}{{ store.add_css_file('css/a.css') }}",
        )]));
        view.set(NOTIFICATIONS, "before").unwrap();
        assert_eq!(view.render("a.txt").unwrap(), "");
        assert_eq!(view.get("title").unwrap(), "From view");
        assert_eq!(view.store().notifications(), vec!["before", "hi"]);
        assert!(view.has(crate::CSS_FILES));
    }

    #[test]
    fn test_failed_render_leaves_store_untouched() {
        let mut view = View::new(renderer(&[(
            "/app/views/a.txt",
            "{{ store.set('title', 'x') }}{{ missing_function() }}",
        )]));
        assert!(matches!(view.render("a.txt"), Err(ViewError::Template(_))));
        assert!(view.store().is_empty());
    }

    #[test]
    fn test_template_reserved_write_fails_render() {
        let mut view = View::new(renderer(&[(
            "/app/views/a.txt",
            "{{ store.set('title', 'x') }}{{ store.set('view_template_file', 'y') }}",
        )]));
        assert!(matches!(view.render("a.txt"), Err(ViewError::ReservedName(_))));
        assert!(!view.has("title"));
    }

    #[test]
    fn test_missing_view() {
        let mut view = View::new(renderer(&[]));
        assert!(matches!(
            view.render("nope.txt"),
            Err(ViewError::ViewNotFound { .. })
        ));
    }

    #[test]
    fn test_renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ViewRenderer>();
    }

    #[test]
    fn test_notifications_accumulate_across_renders() {
        let mut view = View::new(renderer(&[("/app/views/a.txt", "ok{{ store.noty('hi') }}")]));
        view.set(NOTIFICATIONS, "before").unwrap();
        assert_eq!(view.render("a.txt").unwrap(), "ok");
        assert_eq!(view.render("a.txt").unwrap(), "ok");
        assert_eq!(view.store().notifications(), vec!["before", "hi", "hi"]);
    }

    #[test]
    fn test_bindings_named_like_helpers_do_not_break_writes() {
        let mut view = View::new(renderer(&[(
            "/app/views/a.txt",
            "{{ set }}{{ store.set('title', 'T') }}{{ store.add_js_file('a.js') }}",
        )]));
        view.set("set", "value").unwrap();
        view.set("add_js_file", true).unwrap();
        assert_eq!(view.render("a.txt").unwrap(), "value");
        assert_eq!(view.get("title").unwrap(), "T");
    }

    #[test]
    fn test_includes_resolved_on_every_render() {
        let fs = EditableFs::default();
        fs.write("/app/views/page.txt", "page-v1[{% include 'nav.txt' %}]");
        fs.write("/app/views/nav.txt", "default-nav-v1");
        let paths = ViewPaths::under("/app").with_theme("dark");
        let mut view = View::new(Arc::new(ViewRenderer::new(ViewResolver::with_fs(
            paths,
            fs.clone(),
        ))));
        assert_eq!(view.render("page.txt").unwrap(), "page-v1[default-nav-v1]");

        fs.write("/app/views/page.txt", "page-v2[{% include 'nav.txt' %}]");
        fs.write("/app/views/nav.txt", "default-nav-v2");
        assert_eq!(view.render("page.txt").unwrap(), "page-v2[default-nav-v2]");

        fs.write("/app/themes/dark/nav.txt", "themed-nav");
        assert_eq!(view.render("page.txt").unwrap(), "page-v2[themed-nav]");
    }
}
