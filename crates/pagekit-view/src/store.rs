//! Template variables for one request.
//!
//! A [`TemplateStore`] maps variable names to JSON values. Most names are
//! last-write-wins. Two kinds of names behave differently:
//!
//! - [`VIEW_TEMPLATE_FILE`] and [`STORE_OBJECT`] are reserved for the
//!   renderer and can never be set.
//! - [`NOTIFICATIONS`] is append-only: every write adds to an ordered list.
//!
//! Script and stylesheet references accumulate under [`JS_FILES`] and
//! [`CSS_FILES`], split into `local` and `remote` lists.
//!
//! ```rust
//! use pagekit_view::{TemplateStore, NOTIFICATIONS};
//!
//! let mut store = TemplateStore::new();
//! store.set("title", "Home").unwrap();
//! store.set(NOTIFICATIONS, "saved").unwrap();
//! store.set(NOTIFICATIONS, "sent").unwrap();
//!
//! assert_eq!(store.get("title").unwrap(), "Home");
//! assert_eq!(store.notifications(), vec!["saved", "sent"]);
//! assert!(store.set("view_template_file", "x").is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{trace, warn};

use crate::assets::{AssetKind, AssetLocation};
use crate::error::{Result, ViewError};

/// Name the renderer binds to the requested view id.
pub const VIEW_TEMPLATE_FILE: &str = "view_template_file";

/// Name of the object templates use to write back to the store.
pub const STORE_OBJECT: &str = "store";

/// Append-only list of user notifications.
pub const NOTIFICATIONS: &str = "noty";

/// Script references, as `{"local": [..], "remote": [..]}`.
pub const JS_FILES: &str = "jsFiles";

/// Stylesheet references, as `{"local": [..], "remote": [..]}`.
pub const CSS_FILES: &str = "cssFiles";

/// A deferred store mutation, recorded while a template executes.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Set { name: String, value: Value },
    Asset { kind: AssetKind, url: String },
}

/// Variable bindings visible to rendered views.
///
/// Serializes as a plain JSON object, so a store can be persisted and
/// restored between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateStore {
    vars: BTreeMap<String, Value>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`.
    ///
    /// # Errors
    ///
    /// [`ViewError::ReservedName`] for [`VIEW_TEMPLATE_FILE`] and
    /// [`STORE_OBJECT`], and
    /// [`ViewError::Serialization`] when `value` is not representable as JSON.
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(name, value)
    }

    /// Like [`set`](Self::set), for an already converted value.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<()> {
        check_name(name)?;
        trace!(name, "store write");
        if name == NOTIFICATIONS {
            append(self.vars.entry(name.to_string()).or_insert_with(|| json!([])), value);
        } else {
            self.vars.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Returns the value bound to `name`.
    ///
    /// Fails with [`ViewError::UnboundVariable`] when nothing is bound; no
    /// default is synthesized.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.vars
            .get(name)
            .ok_or_else(|| ViewError::UnboundVariable(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Records a script reference under [`JS_FILES`].
    pub fn add_js_file(&mut self, url: &str) {
        self.add_asset(AssetKind::Script, url);
    }

    /// Records a stylesheet reference under [`CSS_FILES`].
    pub fn add_css_file(&mut self, url: &str) {
        self.add_asset(AssetKind::Stylesheet, url);
    }

    fn add_asset(&mut self, kind: AssetKind, url: &str) {
        let location = AssetLocation::of(url);
        trace!(?kind, ?location, url, "asset recorded");

        let lists = self
            .vars
            .entry(kind.store_key().to_string())
            .or_insert_with(|| json!({ "local": [], "remote": [] }));
        if !lists.is_object() {
            warn!(
                name = kind.store_key(),
                "replacing non-object asset list binding"
            );
            *lists = json!({ "local": [], "remote": [] });
        }
        if let Value::Object(map) = lists {
            append(
                map.entry(location.as_str()).or_insert_with(|| json!([])),
                Value::String(url.to_string()),
            );
        }
    }

    /// Notification messages in the order they were added. Non-string
    /// entries are skipped.
    pub fn notifications(&self) -> Vec<&str> {
        match self.vars.get(NOTIFICATIONS) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Applies writes recorded during a render, in order.
    ///
    /// All writes are checked before any is applied, so a rejected batch
    /// leaves the store untouched.
    pub fn apply(&mut self, writes: Vec<StoreWrite>) -> Result<()> {
        for write in &writes {
            if let StoreWrite::Set { name, .. } = write {
                check_name(name)?;
            }
        }
        for write in writes {
            match write {
                StoreWrite::Set { name, value } => self.set_value(&name, value)?,
                StoreWrite::Asset { kind, url } => self.add_asset(kind, &url),
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The bindings as a map, for handing to a template engine.
    pub fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name == VIEW_TEMPLATE_FILE || name == STORE_OBJECT {
        warn!(name, "rejected write to reserved variable");
        return Err(ViewError::ReservedName(name.to_string()));
    }
    Ok(())
}

fn append(slot: &mut Value, value: Value) {
    match slot {
        Value::Array(items) => items.push(value),
        other => {
            let previous = other.take();
            *other = Value::Array(vec![previous, value]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut store = TemplateStore::new();
        store.set("title", "a").unwrap();
        store.set("title", "b").unwrap();
        assert_eq!(store.get("title").unwrap(), "b");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reserved_name_rejected() {
        let mut store = TemplateStore::new();
        let err = store.set(VIEW_TEMPLATE_FILE, "x").unwrap_err();
        assert!(matches!(err, ViewError::ReservedName(_)));
        assert!(!store.has(VIEW_TEMPLATE_FILE));
    }

    #[test]
    fn test_store_object_name_rejected() {
        let mut store = TemplateStore::new();
        assert!(matches!(
            store.set(STORE_OBJECT, 1),
            Err(ViewError::ReservedName(name)) if name == STORE_OBJECT
        ));
    }

    #[test]
    fn test_asset_list_replaces_scalar_binding() {
        let mut store = TemplateStore::new();
        store.set(JS_FILES, "oops").unwrap();
        store.add_js_file("js/app.js");
        assert_eq!(
            store.get(JS_FILES).unwrap(),
            &json!({ "local": ["js/app.js"], "remote": [] })
        );
    }

    #[test]
    fn test_notifications_append() {
        let mut store = TemplateStore::new();
        store.set(NOTIFICATIONS, "a").unwrap();
        store.set(NOTIFICATIONS, "b").unwrap();
        assert_eq!(store.get(NOTIFICATIONS).unwrap(), &json!(["a", "b"]));
    }

    #[test]
    fn test_get_unbound_fails() {
        let store = TemplateStore::new();
        assert!(matches!(
            store.get("missing"),
            Err(ViewError::UnboundVariable(name)) if name == "missing"
        ));
        assert!(!store.has("missing"));
    }

    #[test]
    fn test_assets_split_by_location() {
        let mut store = TemplateStore::new();
        store.add_js_file("js/app.js");
        store.add_js_file("https://cdn.test/lib.js");
        store.add_js_file("js/extra.js");
        store.add_css_file("css/site.css");

        assert_eq!(
            store.get(JS_FILES).unwrap(),
            &json!({
                "local": ["js/app.js", "js/extra.js"],
                "remote": ["https://cdn.test/lib.js"]
            })
        );
        assert_eq!(
            store.get(CSS_FILES).unwrap(),
            &json!({ "local": ["css/site.css"], "remote": [] })
        );
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut store = TemplateStore::new();
        let writes = vec![
            StoreWrite::Set {
                name: "title".into(),
                value: json!("x"),
            },
            StoreWrite::Set {
                name: VIEW_TEMPLATE_FILE.into(),
                value: json!("y"),
            },
        ];
        assert!(store.apply(writes).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_in_order() {
        let mut store = TemplateStore::new();
        store
            .apply(vec![
                StoreWrite::Set {
                    name: NOTIFICATIONS.into(),
                    value: json!("first"),
                },
                StoreWrite::Asset {
                    kind: AssetKind::Stylesheet,
                    url: "a.css".into(),
                },
                StoreWrite::Set {
                    name: NOTIFICATIONS.into(),
                    value: json!("second"),
                },
            ])
            .unwrap();
        assert_eq!(store.notifications(), vec!["first", "second"]);
        assert!(store.has(CSS_FILES));
    }

    #[test]
    fn test_set_structured_value() {
        #[derive(Serialize)]
        struct User {
            name: &'static str,
        }
        let mut store = TemplateStore::new();
        store.set("user", User { name: "ada" }).unwrap();
        assert_eq!(store.get("user").unwrap()["name"], "ada");
    }
}
