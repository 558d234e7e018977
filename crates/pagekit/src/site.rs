//! A configured site: one form builder and one renderer, shared by every
//! request.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use pagekit_form::{BaseUrl, Form};
use pagekit_view::{MiniJinjaEngine, View, ViewRenderer, ViewResolver};
use tracing::debug;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::functions;

/// Shared state for serving pages.
///
/// Views rendered through a [`Site`] can call the form functions listed in
/// [`functions::FUNCTIONS`].
///
/// ```rust
/// use pagekit::{MemoryFs, Site, SiteConfig, ViewResolver};
///
/// let config = SiteConfig::from_yaml("views:\n  root_dir: /app\n").unwrap();
/// let fs = MemoryFs::new().with_file(
///     "/app/views/login.html",
///     r#"{{ form_open("/login") }}{{ form_input("user") }}{{ form_close() }}"#,
/// );
/// let site = Site::with_resolver(config.clone(), ViewResolver::with_fs(config.views, fs));
///
/// let html = site.view().render("login.html").unwrap();
/// assert!(html.starts_with(r#"<form action="/login""#));
/// assert!(html.contains(r#"<input name="user" value="" type="text" />"#));
/// ```
pub struct Site {
    config: SiteConfig,
    form: Arc<Form>,
    renderer: Arc<ViewRenderer>,
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Site with views on the local filesystem.
    pub fn new(config: SiteConfig) -> Self {
        let resolver = ViewResolver::new(config.views.clone());
        Self::with_resolver(config, resolver)
    }

    /// Loads the configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SiteConfig::from_file(path)?))
    }

    /// Site with a custom resolver. Form actions are prefixed with
    /// `config.base_url`.
    pub fn with_resolver(config: SiteConfig, resolver: ViewResolver) -> Self {
        let form = Form::new(config.form.clone())
            .with_url_builder(BaseUrl::new(config.base_url.clone()));
        Self::with_form(config, form, resolver)
    }

    /// Site with a fully configured form builder, e.g. one with a translator.
    pub fn with_form(config: SiteConfig, form: Form, resolver: ViewResolver) -> Self {
        let form = Arc::new(form);
        let mut engine = MiniJinjaEngine::new(resolver.clone());
        functions::register(engine.environment_mut(), Arc::clone(&form));
        debug!(views = ?resolver.paths(), "site ready");

        Self {
            config,
            form,
            renderer: Arc::new(ViewRenderer::with_engine(resolver, engine)),
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn renderer(&self) -> &Arc<ViewRenderer> {
        &self.renderer
    }

    /// Starts a request with an empty store.
    pub fn view(&self) -> View {
        View::new(Arc::clone(&self.renderer))
    }
}
