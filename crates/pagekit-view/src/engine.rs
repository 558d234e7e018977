//! Template engine abstraction.
//!
//! [`TemplateEngine`] turns a resolved view and its source into output plus
//! the store writes the template asked for. [`MiniJinjaEngine`] is the
//! default backend.
//!
//! # Writing back to the store
//!
//! Templates rendered by [`MiniJinjaEngine`] see a `store` object with these
//! methods:
//!
//! | Method | Effect |
//! |--------|--------|
//! | `store.set(name, value)` | Binds a variable |
//! | `store.noty(message)` | Appends a notification |
//! | `store.add_js_file(url)` | Records a script reference |
//! | `store.add_css_file(url)` | Records a stylesheet reference |
//!
//! The `store` name is reserved, so no binding can hide it. Each call
//! renders as nothing. Calls are journaled and returned in
//! [`RenderedView::writes`]; they are not visible to the template that made
//! them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use minijinja::value::{from_args, Object};
use minijinja::{Environment, Error, ErrorKind, State, Value};

use crate::assets::AssetKind;
use crate::error::{Result, ViewError};
use crate::resolver::{ResolvedView, ViewResolver};
use crate::store::{StoreWrite, NOTIFICATIONS, STORE_OBJECT, VIEW_TEMPLATE_FILE};

/// Output of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub output: String,
    /// Store writes requested by the template, in call order.
    pub writes: Vec<StoreWrite>,
}

/// A template backend that can execute views.
pub trait TemplateEngine: Send + Sync {
    /// Renders `source` with `scope` bound as variables.
    ///
    /// Implementations bind [`VIEW_TEMPLATE_FILE`] to the requested view id.
    fn render_view(
        &self,
        view: &ResolvedView,
        source: &str,
        scope: &BTreeMap<String, serde_json::Value>,
    ) -> Result<RenderedView>;
}

/// MiniJinja-based template engine.
///
/// Includes (`{% include "nav.html" %}`) resolve through the same
/// [`ViewResolver`] as top-level views, on every render: nothing loaded by
/// one render is reused by the next. Auto-escaping follows the view's file
/// extension.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use pagekit_view::{
///     MemoryFs, MiniJinjaEngine, TemplateEngine, ViewPaths, ViewResolver,
/// };
///
/// let fs = MemoryFs::new().with_file("/app/views/hello.txt", "Hello, {{ name }}!");
/// let resolver = ViewResolver::with_fs(ViewPaths::under("/app"), fs);
/// let engine = MiniJinjaEngine::new(resolver.clone());
///
/// let view = resolver.resolve("hello.txt").unwrap();
/// let source = resolver.read(&view).unwrap();
/// let mut scope = BTreeMap::new();
/// scope.insert("name".to_string(), serde_json::json!("World"));
///
/// let rendered = engine.render_view(&view, &source, &scope).unwrap();
/// assert_eq!(rendered.output, "Hello, World!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine whose includes load through `resolver`.
    pub fn new(resolver: ViewResolver) -> Self {
        let mut env = Environment::new();
        env.set_loader(move |name| match resolver.resolve(name) {
            Ok(view) => resolver
                .read(&view)
                .map(Some)
                .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string())),
            Err(_) => Ok(None),
        });
        Self { env }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Use this to register extra filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl std::fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniJinjaEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_view(
        &self,
        view: &ResolvedView,
        source: &str,
        scope: &BTreeMap<String, serde_json::Value>,
    ) -> Result<RenderedView> {
        // Loaded includes are cached per environment; start from an empty cache.
        let mut env = self.env.clone();
        env.clear_templates();

        let journal = Value::from_object(WriteJournal::default());

        let mut ctx: BTreeMap<String, Value> = scope
            .iter()
            .map(|(name, value)| (name.clone(), Value::from_serialize(value)))
            .collect();
        ctx.insert(VIEW_TEMPLATE_FILE.to_string(), Value::from(view.view.as_str()));
        ctx.insert(STORE_OBJECT.to_string(), journal.clone());

        let output = env.render_named_str(&view.view, source, ctx)?;

        let writes = journal
            .downcast_object_ref::<WriteJournal>()
            .ok_or_else(|| ViewError::Template("write journal was replaced".to_string()))?
            .take()?;
        Ok(RenderedView { output, writes })
    }
}

/// Store writes recorded during one render, exposed to templates as `store`.
#[derive(Debug, Default)]
struct WriteJournal {
    writes: Mutex<Vec<StoreWrite>>,
}

impl WriteJournal {
    fn record(&self, write: StoreWrite) -> std::result::Result<(), Error> {
        let mut writes = self.writes.lock().map_err(|_| {
            Error::new(ErrorKind::InvalidOperation, "store write journal is poisoned")
        })?;
        writes.push(write);
        Ok(())
    }

    fn take(&self) -> Result<Vec<StoreWrite>> {
        self.writes
            .lock()
            .map(|mut writes| std::mem::take(&mut *writes))
            .map_err(|_| ViewError::Template("store write journal is poisoned".to_string()))
    }
}

impl Object for WriteJournal {
    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> std::result::Result<Value, Error> {
        let write = match method {
            "set" => {
                let (name, value): (String, Value) = from_args(args)?;
                StoreWrite::Set {
                    name,
                    value: to_json(&value)?,
                }
            }
            "noty" => {
                let (message,): (Value,) = from_args(args)?;
                StoreWrite::Set {
                    name: NOTIFICATIONS.to_string(),
                    value: to_json(&message)?,
                }
            }
            "add_js_file" => {
                let (url,): (String,) = from_args(args)?;
                StoreWrite::Asset {
                    kind: AssetKind::Script,
                    url,
                }
            }
            "add_css_file" => {
                let (url,): (String,) = from_args(args)?;
                StoreWrite::Asset {
                    kind: AssetKind::Stylesheet,
                    url,
                }
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::UnknownMethod,
                    format!("store has no method named {}", method),
                ))
            }
        };
        self.record(write)?;
        Ok(Value::from(""))
    }
}

fn to_json(value: &Value) -> std::result::Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::BadSerialization, "value cannot be stored").with_source(err)
    })
}
