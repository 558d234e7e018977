//! Markup collaborators used by the form builder.
//!
//! The builder never serializes HTML itself. It normalizes attributes and
//! delegates to a small set of collaborator traits:
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`Escaper`] | Escapes a value for display |
//! | [`AttributeRenderer`] | Serializes an [`Attributes`] map |
//! | [`TagBuilder`] | Assembles a full or self-closing element |
//! | [`Translator`] | Resolves display text for labels |
//! | [`UrlBuilder`] | Turns a site-relative path into a URL |
//!
//! [`HtmlMarkup`] implements the first three with plain HTML semantics.
//! Applications with their own tag helpers plug them in through
//! [`Form::with_markup`](crate::Form::with_markup).

use std::collections::HashMap;

use crate::attributes::{AttrValue, Attributes};

/// Escapes a value before it is placed in markup.
pub trait Escaper: Send + Sync {
    fn escape(&self, value: &str) -> String;
}

/// Serializes an attribute map into the text between a tag name and `>`.
pub trait AttributeRenderer: Send + Sync {
    fn render_attributes(&self, attributes: &Attributes) -> String;
}

/// Assembles an element from a tag name, a rendered attribute string and
/// optional content. `None` content yields a self-closing element.
pub trait TagBuilder: Send + Sync {
    fn build_tag(&self, tag: &str, attributes: &str, content: Option<&str>) -> String;
}

/// Looks up display text for a key.
pub trait Translator: Send + Sync {
    /// Returns `None` when no translation exists.
    fn translate(&self, key: &str) -> Option<String>;
}

/// Builds site URLs from relative paths.
pub trait UrlBuilder: Send + Sync {
    fn url(&self, path: &str) -> String;
}

/// Combined markup backend.
///
/// Blanket-implemented for anything that implements all three markup traits.
pub trait Markup: Escaper + AttributeRenderer + TagBuilder {}

impl<T> Markup for T where T: Escaper + AttributeRenderer + TagBuilder {}

/// Escapes the five HTML special characters.
///
/// # Example
///
/// ```rust
/// use pagekit_form::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
///            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;");
/// ```
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Plain HTML markup backend.
///
/// - Attributes render as `name="value"` separated by single spaces, in
///   insertion order. Flags render as bare tokens. Double quotes inside
///   values become `&quot;`; nothing else is touched, since values have
///   already been through the escaping policy.
/// - Elements without content self-close as `<tag attrs />`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl Escaper for HtmlMarkup {
    fn escape(&self, value: &str) -> String {
        escape_html(value)
    }
}

impl AttributeRenderer for HtmlMarkup {
    fn render_attributes(&self, attributes: &Attributes) -> String {
        let mut parts = Vec::with_capacity(attributes.len());
        for (name, value) in attributes.iter() {
            match value {
                AttrValue::Text(text) => {
                    parts.push(format!("{}=\"{}\"", name, text.replace('"', "&quot;")))
                }
                AttrValue::Flag => parts.push(name.to_string()),
            }
        }
        parts.join(" ")
    }
}

impl TagBuilder for HtmlMarkup {
    fn build_tag(&self, tag: &str, attributes: &str, content: Option<&str>) -> String {
        let mut html = format!("<{}", tag);
        if !attributes.is_empty() {
            html.push(' ');
            html.push_str(attributes);
        }
        match content {
            Some(content) => {
                html.push('>');
                html.push_str(content);
                html.push_str(&format!("</{}>", tag));
            }
            None => html.push_str(" />"),
        }
        html
    }
}

/// Translator that never finds a translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

impl Translator for HashMap<String, String> {
    fn translate(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// URL builder that prefixes paths with a base URL.
///
/// ```rust
/// use pagekit_form::{BaseUrl, UrlBuilder};
///
/// let urls = BaseUrl::new("https://example.com/app/");
/// assert_eq!(urls.url("/login"), "https://example.com/app/login");
/// assert_eq!(urls.url(""), "https://example.com/app/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrl {
    base: String,
}

impl BaseUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl UrlBuilder for BaseUrl {
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
