//! Insertion-ordered attribute maps.
//!
//! [`Attributes`] is the canonical representation every form constructor
//! normalizes into before handing off to the markup collaborators. Order is
//! significant: it decides the order attributes appear in the rendered tag,
//! so rendering the same map twice always yields byte-identical markup.
//!
//! Setting a name that already exists replaces the value in place; setting a
//! new name appends it.

use std::fmt;

/// Value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A regular `name="value"` attribute.
    Text(String),
    /// A boolean attribute rendered as a bare token (`checked`, `selected`, `multiple`).
    Flag,
}

impl AttrValue {
    /// Returns the text content, if this is a text attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Flag => None,
        }
    }

    /// Whether the value counts as "set".
    ///
    /// Flags are always set. Text is unset when it is empty or `"0"`.
    pub fn is_set(&self) -> bool {
        match self {
            AttrValue::Text(s) => !s.is_empty() && s != "0",
            AttrValue::Flag => true,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        AttrValue::Text(s.clone())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Flag => Ok(()),
        }
    }
}

/// An ordered map of attribute names to values.
///
/// # Example
///
/// ```rust
/// use pagekit_form::Attributes;
///
/// let attrs = Attributes::new()
///     .with("name", "email")
///     .with("class", "wide")
///     .with_flag("required");
///
/// assert_eq!(attrs.text("class"), Some("wide"));
/// assert!(attrs.contains("required"));
/// assert_eq!(attrs.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`set_flag`](Self::set_flag).
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.set_flag(name);
        self
    }

    /// Sets an attribute, replacing in place or appending.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Sets a bare boolean token.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.set(name, AttrValue::Flag);
    }

    /// Looks up an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Looks up the text of an attribute. Flags yield `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_text)
    }

    /// Whether an attribute with this name exists, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the attribute exists and is non-empty (see [`AttrValue::is_set`]).
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(AttrValue::is_set)
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut attrs = Attributes::from([("name", "a"), ("value", "1"), ("class", "x")]);
        attrs.set("value", "2");

        let names: Vec<&str> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "value", "class"]);
        assert_eq!(attrs.text("value"), Some("2"));
    }

    #[test]
    fn test_set_appends_new_names() {
        let mut attrs = Attributes::new().with("name", "a");
        attrs.set("type", "text");

        let names: Vec<&str> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "type"]);
    }

    #[test]
    fn test_is_set_semantics() {
        let attrs = Attributes::new()
            .with("empty", "")
            .with("zero", "0")
            .with("id", "x")
            .with_flag("checked");

        assert!(!attrs.is_set("empty"));
        assert!(!attrs.is_set("zero"));
        assert!(!attrs.is_set("missing"));
        assert!(attrs.is_set("id"));
        assert!(attrs.is_set("checked"));
        assert!(attrs.contains("empty"));
    }

    #[test]
    fn test_remove() {
        let mut attrs = Attributes::from([("a", "1"), ("b", "2")]);
        assert_eq!(attrs.remove("a"), Some(AttrValue::Text("1".into())));
        assert_eq!(attrs.remove("a"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_flag_has_no_text() {
        let attrs = Attributes::new().with_flag("multiple");
        assert_eq!(attrs.text("multiple"), None);
        assert_eq!(attrs.get("multiple"), Some(&AttrValue::Flag));
    }
}
