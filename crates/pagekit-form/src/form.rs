//! The form field builder.
//!
//! [`Form`] turns field descriptions into HTML control markup. Every
//! constructor resolves its calling convention once, forces or defaults the
//! control-specific attributes, and then runs the shared pipeline:
//!
//! 1. Default `type` to `text` when absent or empty
//! 2. Reject any `type` outside [`VALID_INPUT_TYPES`]
//! 3. Escape `value` unless disabled by config or by `dont_prep`
//! 4. Synthesize `id` from the configured prefix and the field name when
//!    auto-ids are enabled and no id is set
//! 5. Pick the element (`input`, unless the `tag` attribute overrides it)
//! 6. Hand the attributes to the markup collaborators
//!
//! # Example
//!
//! ```rust
//! use pagekit_form::{Form, FormConfig};
//!
//! let form = Form::new(FormConfig::default());
//!
//! let html = form.input(("email", "a@example.com")).unwrap();
//! assert_eq!(html, r#"<input name="email" value="a@example.com" type="text" />"#);
//!
//! let html = form.checkbox(("remember", "1"), true).unwrap();
//! assert_eq!(html, r#"<input name="remember" value="1" checked type="checkbox" />"#);
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::attributes::Attributes;
use crate::config::FormConfig;
use crate::error::{FormError, Result};
use crate::field::{Checked, FieldInput, LabelInput, SelectInput, DONT_PREP, TAG};
use crate::markup::{BaseUrl, HtmlMarkup, Markup, NoTranslation, Translator, UrlBuilder};
use crate::options::{render_options, SelectedSet};

/// Valid values of the `type` attribute, including the HTML5 additions.
pub const VALID_INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Whether `ty` is a member of [`VALID_INPUT_TYPES`].
pub fn is_valid_input_type(ty: &str) -> bool {
    VALID_INPUT_TYPES.contains(&ty)
}

/// Builder for form control markup.
///
/// A `Form` is immutable once configured and is `Send + Sync`, so one
/// instance can serve every request of a process.
pub struct Form {
    config: FormConfig,
    markup: Box<dyn Markup>,
    translator: Box<dyn Translator>,
    urls: Box<dyn UrlBuilder>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl Form {
    /// Creates a builder with plain HTML markup, no translations and
    /// root-relative URLs.
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            markup: Box::new(HtmlMarkup),
            translator: Box::new(NoTranslation),
            urls: Box::new(BaseUrl::default()),
        }
    }

    /// Replaces the markup backend.
    pub fn with_markup(mut self, markup: impl Markup + 'static) -> Self {
        self.markup = Box::new(markup);
        self
    }

    /// Replaces the translator used for label text.
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Replaces the URL builder used for form actions.
    pub fn with_url_builder(mut self, urls: impl UrlBuilder + 'static) -> Self {
        self.urls = Box::new(urls);
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    // =========================================================================
    // Form-level constructs
    // =========================================================================

    /// Opens a form posting to `action`.
    pub fn open(&self, action: &str) -> String {
        self.open_tag(Attributes::new().with("action", action))
    }

    /// Opens a form from a full attribute map, followed by one hidden field
    /// per `(name, value)` pair, each on its own line.
    ///
    /// A missing action points at the site root; actions that are not full
    /// URLs go through the URL builder. `accept-charset` defaults to
    /// `utf-8` and `method` to the configured default.
    pub fn open_with(&self, attributes: Attributes, hidden: &[(&str, &str)]) -> Result<String> {
        let mut form = self.open_tag(attributes);
        for (name, value) in hidden {
            form.push('\n');
            form.push_str(&self.hidden((*name, *value))?);
        }
        Ok(form)
    }

    fn open_tag(&self, mut attrs: Attributes) -> String {
        let action = match attrs.text("action") {
            None => Some(self.urls.url("")),
            Some(action) if !action.contains("://") => Some(self.urls.url(action)),
            Some(_) => None,
        };
        if let Some(action) = action {
            attrs.set("action", action);
        }
        if !attrs.is_set("accept-charset") {
            attrs.set("accept-charset", "utf-8");
        }
        if !attrs.is_set("method") {
            attrs.set("method", self.config.form_method.as_str());
        }
        format!("<form {}>", self.markup.render_attributes(&attrs))
    }

    pub fn close(&self) -> &'static str {
        "</form>"
    }

    /// Opens a fieldset, with a legend when one is given either as an
    /// argument or as the `legend` attribute.
    pub fn fieldset_open(&self, mut attributes: Attributes, legend: Option<&str>) -> String {
        let from_attrs = attributes
            .remove("legend")
            .and_then(|v| v.as_text().map(str::to_string));
        let legend = legend.map(str::to_string).or(from_attrs);

        let rendered = self.markup.render_attributes(&attributes);
        let mut out = if rendered.is_empty() {
            "<fieldset>".to_string()
        } else {
            format!("<fieldset {}>", rendered)
        };
        if let Some(legend) = legend.filter(|l| !l.is_empty()) {
            out.push_str(&format!("\n<legend>{}</legend>", legend));
        }
        out
    }

    pub fn fieldset_close(&self) -> &'static str {
        "</fieldset>"
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Builds a generic input.
    ///
    /// The map form gets an empty `value` when it has none.
    pub fn input(&self, field: impl Into<FieldInput>) -> Result<String> {
        let mut attrs = field.into().into_attributes();
        if !attrs.contains("value") {
            attrs.set("value", "");
        }
        let (tag, attrs) = self.normalize(attrs, "text")?;
        Ok(self.element(&tag, attrs, None))
    }

    pub fn hidden(&self, field: impl Into<FieldInput>) -> Result<String> {
        self.typed(field.into(), "hidden")
    }

    pub fn password(&self, field: impl Into<FieldInput>) -> Result<String> {
        self.typed(field.into(), "password")
    }

    /// Reset button. A named field without a value is labelled `Reset`.
    pub fn reset(&self, field: impl Into<FieldInput>) -> Result<String> {
        self.typed(default_value(field.into(), "Reset"), "reset")
    }

    /// Submit button. A named field without a value is labelled `Submit`.
    pub fn submit(&self, field: impl Into<FieldInput>) -> Result<String> {
        self.typed(default_value(field.into(), "Submit"), "submit")
    }

    /// File upload. A named field never carries a value.
    pub fn file(&self, field: impl Into<FieldInput>) -> Result<String> {
        let mut attrs = match field.into() {
            FieldInput::Named {
                name,
                mut attributes,
                ..
            } => {
                attributes.set("name", name);
                attributes
            }
            FieldInput::Map(attributes) => attributes,
        };
        attrs.set("type", "file");
        self.input(attrs)
    }

    pub fn radio(&self, field: impl Into<FieldInput>, checked: impl Into<Checked>) -> Result<String> {
        self.checkable(field.into(), checked.into(), "radio")
    }

    pub fn checkbox(
        &self,
        field: impl Into<FieldInput>,
        checked: impl Into<Checked>,
    ) -> Result<String> {
        self.checkable(field.into(), checked.into(), "checkbox")
    }

    /// Builds a `<button>` element whose content is the value, falling back
    /// to the field name for the named form.
    ///
    /// The named form does not repeat the value as an attribute. `type`
    /// defaults to `button`.
    pub fn button(&self, field: impl Into<FieldInput>) -> Result<String> {
        let (mut attrs, content) = match field.into() {
            FieldInput::Named {
                name,
                value,
                mut attributes,
            } => {
                attributes.set("name", name.as_str());
                (attributes, value.unwrap_or(name))
            }
            FieldInput::Map(attributes) => {
                let content = attributes.text("value").unwrap_or_default().to_string();
                (attributes, content)
            }
        };
        let content = self.prep(&attrs, &content);
        if !attrs.is_set("type") {
            attrs.set("type", "button");
        }
        attrs.set(TAG, "button");

        let (tag, attrs) = self.normalize(attrs, "button")?;
        Ok(self.element(&tag, attrs, Some(&content)))
    }

    /// Builds a textarea. The value becomes element content.
    pub fn textarea(&self, field: impl Into<FieldInput>) -> Result<String> {
        let mut attrs = field.into().into_attributes();
        let value = attrs
            .remove("value")
            .and_then(|v| v.as_text().map(str::to_string))
            .unwrap_or_default();
        let content = self.prep(&attrs, &value);
        attrs.remove(DONT_PREP);
        self.auto_id(&mut attrs);
        Ok(self.element("textarea", attrs, Some(&content)))
    }

    /// Builds a select from a possibly nested options tree.
    ///
    /// With the `multiple` attribute present the field name is forced to end
    /// in `[]`.
    ///
    /// # Errors
    ///
    /// [`FormError::InvalidOptions`] when the map form carries no options.
    pub fn select(&self, input: SelectInput) -> Result<String> {
        let (mut attrs, options, selected) = match input {
            SelectInput::Named {
                name,
                selected,
                options,
                mut attributes,
            } => {
                attributes.set("name", name);
                let selected = if selected.is_empty() {
                    attributes
                        .text("default")
                        .map(|d| vec![d.to_string()])
                        .unwrap_or_default()
                } else {
                    selected
                };
                (attributes, Some(options), selected)
            }
            SelectInput::Map {
                attributes,
                options,
                selected,
            } => {
                let selected = selected
                    .or_else(|| {
                        ["selected", "value", "default"]
                            .iter()
                            .find_map(|key| attributes.text(key))
                            .map(|v| vec![v.to_string()])
                    })
                    .unwrap_or_default();
                (attributes, options, selected)
            }
        };
        for key in ["selected", "value", "default"] {
            attrs.remove(key);
        }

        let name = attrs.text("name").unwrap_or_default().to_string();
        let Some(options) = options else {
            debug!(name = %name, "select rendered without options");
            return Err(FormError::InvalidOptions { name });
        };

        let selected: SelectedSet = selected.into_iter().collect();
        trace!(
            name = %name,
            options = options.len(),
            selected = selected.len(),
            "rendering select"
        );
        let prep = self.prep_enabled(&attrs);
        attrs.remove(DONT_PREP);
        let block = render_options(self.markup.as_ref(), &options, &selected, prep, 1);

        self.auto_id(&mut attrs);
        if attrs.contains("multiple") && !name.ends_with("[]") {
            attrs.set("name", format!("{}[]", name));
        }

        Ok(self.element("select", attrs, Some(&block)))
    }

    /// Builds a label. The text is translated when a translation exists.
    ///
    /// With auto-ids enabled and no explicit `for`, the label points at the
    /// synthesized id of the control it labels.
    pub fn label(&self, input: impl Into<LabelInput>) -> String {
        let (label, id, mut attrs) = match input.into() {
            LabelInput::Text {
                label,
                id,
                attributes,
            } => (label, id, attributes),
            LabelInput::Map(mut attributes) => {
                let label = attributes
                    .remove("label")
                    .and_then(|v| v.as_text().map(str::to_string))
                    .unwrap_or_default();
                let id = attributes.text("id").map(str::to_string);
                (label, id, attributes)
            }
        };

        if !attrs.is_set("for") && self.config.auto_id {
            if let Some(id) = id.filter(|id| !id.is_empty()) {
                attrs.set("for", format!("{}{}", self.config.auto_id_prefix, id));
            }
        }

        let text = self
            .translator
            .translate(&label)
            .filter(|t| !t.is_empty())
            .unwrap_or(label);
        self.element("label", attrs, Some(&text))
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    fn typed(&self, field: FieldInput, ty: &str) -> Result<String> {
        let mut attrs = field.into_attributes();
        attrs.set("type", ty);
        self.input(attrs)
    }

    fn checkable(&self, field: FieldInput, checked: Checked, ty: &str) -> Result<String> {
        let mut attrs = match field {
            FieldInput::Map(attributes) => attributes,
            FieldInput::Named {
                name,
                value,
                attributes,
            } => {
                let value = value.unwrap_or_default();
                let is_checked = match checked {
                    Checked::Flag(flag) => flag,
                    Checked::Match(candidate) => candidate == value,
                    Checked::Unspecified => false,
                };
                let mut attrs = FieldInput::Named {
                    name,
                    value: Some(value),
                    attributes,
                }
                .into_attributes();
                if is_checked {
                    attrs.set_flag("checked");
                }
                attrs
            }
        };
        attrs.set("type", ty);
        self.input(attrs)
    }

    /// Runs the shared normalization steps and returns the element name with
    /// the final attributes.
    fn normalize(&self, mut attrs: Attributes, default_type: &str) -> Result<(String, Attributes)> {
        if !attrs.is_set("type") {
            attrs.set("type", default_type);
        }
        let ty = attrs.text("type").unwrap_or_default();
        if !is_valid_input_type(ty) {
            debug!(field_type = ty, "rejecting input type");
            return Err(FormError::InvalidFieldType(ty.to_string()));
        }

        if let Some(value) = attrs.text("value") {
            let value = self.prep(&attrs, value);
            attrs.set("value", value);
        }
        attrs.remove(DONT_PREP);

        self.auto_id(&mut attrs);

        let tag = match attrs.remove(TAG) {
            Some(tag) if tag.is_set() => tag.to_string(),
            _ => "input".to_string(),
        };
        Ok((tag, attrs))
    }

    fn prep_enabled(&self, attrs: &Attributes) -> bool {
        self.config.prep_value && !attrs.is_set(DONT_PREP)
    }

    fn prep(&self, attrs: &Attributes, value: &str) -> String {
        if self.prep_enabled(attrs) {
            self.markup.escape(value)
        } else {
            value.to_string()
        }
    }

    fn auto_id(&self, attrs: &mut Attributes) {
        if self.config.auto_id && !attrs.is_set("id") {
            let id = format!(
                "{}{}",
                self.config.auto_id_prefix,
                attrs.text("name").unwrap_or_default()
            );
            attrs.set("id", id);
        }
    }

    fn element(&self, tag: &str, mut attrs: Attributes, content: Option<&str>) -> String {
        attrs.remove("label");
        self.markup
            .build_tag(tag, &self.markup.render_attributes(&attrs), content)
    }
}

fn default_value(field: FieldInput, fallback: &str) -> FieldInput {
    match field {
        FieldInput::Named {
            name,
            value,
            attributes,
        } => FieldInput::Named {
            name,
            value: Some(value.unwrap_or_else(|| fallback.to_string())),
            attributes,
        },
        map => map,
    }
}
