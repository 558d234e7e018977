//! Calling conventions for form constructors.
//!
//! Every constructor accepts a [`FieldInput`]: either a bare field name with a
//! value (plus extra attributes), or a single pre-assembled attribute map.
//! When a map is given it is used as-is and any other arguments to the
//! constructor are ignored.
//!
//! ```rust
//! use pagekit_form::{Attributes, FieldInput};
//!
//! // Named: name + value
//! let named: FieldInput = ("email", "a@example.com").into();
//!
//! // Map: everything in one place
//! let map: FieldInput = Attributes::from([("name", "email"), ("type", "email")]).into();
//!
//! assert!(matches!(named, FieldInput::Named { .. }));
//! assert!(matches!(map, FieldInput::Map(_)));
//! ```

use crate::attributes::Attributes;
use crate::options::OptionTree;

/// Attribute key that suppresses value escaping for one call.
pub const DONT_PREP: &str = "dont_prep";

/// Attribute key that overrides the rendered element name.
pub const TAG: &str = "tag";

/// The two calling conventions of a form constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// A field name and optional value, layered over extra attributes.
    Named {
        name: String,
        value: Option<String>,
        attributes: Attributes,
    },
    /// A complete attribute map.
    Map(Attributes),
}

impl FieldInput {
    /// Bare field name without a value.
    pub fn named(name: impl Into<String>) -> Self {
        FieldInput::Named {
            name: name.into(),
            value: None,
            attributes: Attributes::new(),
        }
    }

    /// Sets the value of a named field. No effect on the map form.
    pub fn value(mut self, v: impl Into<String>) -> Self {
        if let FieldInput::Named { value, .. } = &mut self {
            *value = Some(v.into());
        }
        self
    }

    /// Adds an extra attribute to a named field. No effect on the map form.
    pub fn attr(mut self, name: impl Into<String>, v: impl Into<crate::AttrValue>) -> Self {
        if let FieldInput::Named { attributes, .. } = &mut self {
            attributes.set(name, v);
        }
        self
    }

    /// Replaces the extra attributes of a named field. No effect on the map form.
    pub fn attributes(mut self, attrs: Attributes) -> Self {
        if let FieldInput::Named { attributes, .. } = &mut self {
            *attributes = attrs;
        }
        self
    }

    /// Folds the named form into an attribute map: extra attributes first,
    /// then `name` and `value` (the value as an empty string when absent).
    /// The map form is returned untouched.
    pub(crate) fn into_attributes(self) -> Attributes {
        match self {
            FieldInput::Named {
                name,
                value,
                mut attributes,
            } => {
                attributes.set("name", name);
                attributes.set("value", value.unwrap_or_default());
                attributes
            }
            FieldInput::Map(attributes) => attributes,
        }
    }
}

impl From<&str> for FieldInput {
    fn from(name: &str) -> Self {
        FieldInput::named(name)
    }
}

impl From<String> for FieldInput {
    fn from(name: String) -> Self {
        FieldInput::named(name)
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for FieldInput {
    fn from((name, value): (N, V)) -> Self {
        FieldInput::named(name).value(value)
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V, Attributes)> for FieldInput {
    fn from((name, value, attributes): (N, V, Attributes)) -> Self {
        FieldInput::named(name).value(value).attributes(attributes)
    }
}

impl From<Attributes> for FieldInput {
    fn from(attributes: Attributes) -> Self {
        FieldInput::Map(attributes)
    }
}

/// Checked-state argument of radio buttons and checkboxes.
///
/// - `Flag(true)` sets the `checked` token, `Flag(false)` leaves the
///   attributes alone (an externally supplied `checked` survives).
/// - `Match(v)` sets `checked` exactly when `v` equals the field value.
/// - `Unspecified` never touches `checked`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Checked {
    #[default]
    Unspecified,
    Flag(bool),
    Match(String),
}

impl From<bool> for Checked {
    fn from(b: bool) -> Self {
        Checked::Flag(b)
    }
}

impl From<&str> for Checked {
    fn from(s: &str) -> Self {
        Checked::Match(s.to_string())
    }
}

impl From<String> for Checked {
    fn from(s: String) -> Self {
        Checked::Match(s)
    }
}

impl From<i64> for Checked {
    fn from(n: i64) -> Self {
        Checked::Match(n.to_string())
    }
}

impl<T: Into<Checked>> From<Option<T>> for Checked {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or_default()
    }
}

/// Calling conventions of [`Form::label`](crate::Form::label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelInput {
    /// Label text, the id of the control it labels, and extra attributes.
    Text {
        label: String,
        id: Option<String>,
        attributes: Attributes,
    },
    /// A complete attribute map; `label` holds the text and `id` the target.
    Map(Attributes),
}

impl LabelInput {
    pub fn new(label: impl Into<String>) -> Self {
        LabelInput::Text {
            label: label.into(),
            id: None,
            attributes: Attributes::new(),
        }
    }

    /// Sets the id of the labelled control. No effect on the map form.
    pub fn id(mut self, target: impl Into<String>) -> Self {
        if let LabelInput::Text { id, .. } = &mut self {
            *id = Some(target.into());
        }
        self
    }

    /// Replaces the extra attributes. No effect on the map form.
    pub fn attributes(mut self, attrs: Attributes) -> Self {
        if let LabelInput::Text { attributes, .. } = &mut self {
            *attributes = attrs;
        }
        self
    }
}

impl From<&str> for LabelInput {
    fn from(label: &str) -> Self {
        LabelInput::new(label)
    }
}

impl<L: Into<String>, I: Into<String>> From<(L, I)> for LabelInput {
    fn from((label, id): (L, I)) -> Self {
        LabelInput::new(label).id(id)
    }
}

impl From<Attributes> for LabelInput {
    fn from(attributes: Attributes) -> Self {
        LabelInput::Map(attributes)
    }
}

/// Calling conventions of [`Form::select`](crate::Form::select).
///
/// The named form always carries an options tree. The map form carries the
/// options alongside the attribute map, and rendering fails when they are
/// missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectInput {
    /// Field name, selected values, options and extra attributes.
    Named {
        name: String,
        selected: Vec<String>,
        options: OptionTree,
        attributes: Attributes,
    },
    /// A complete attribute map with its options.
    ///
    /// Selected values come from `selected` when given, otherwise from the
    /// `selected`, `value` or `default` attribute, in that order.
    Map {
        attributes: Attributes,
        options: Option<OptionTree>,
        selected: Option<Vec<String>>,
    },
}

impl SelectInput {
    pub fn named(name: impl Into<String>, options: OptionTree) -> Self {
        SelectInput::Named {
            name: name.into(),
            selected: Vec::new(),
            options,
            attributes: Attributes::new(),
        }
    }

    pub fn map(attributes: Attributes) -> Self {
        SelectInput::Map {
            attributes,
            options: None,
            selected: None,
        }
    }

    /// Sets the selected values. Each value is compared by its string form.
    pub fn selected<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        match &mut self {
            SelectInput::Named { selected, .. } => *selected = values,
            SelectInput::Map { selected, .. } => *selected = Some(values),
        }
        self
    }

    /// Sets the options tree.
    pub fn options(mut self, tree: OptionTree) -> Self {
        match &mut self {
            SelectInput::Named { options, .. } => *options = tree,
            SelectInput::Map { options, .. } => *options = Some(tree),
        }
        self
    }

    /// Replaces the extra attributes. No effect on the map form.
    pub fn attributes(mut self, attrs: Attributes) -> Self {
        if let SelectInput::Named { attributes, .. } = &mut self {
            *attributes = attrs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_into_attributes_order() {
        let input = FieldInput::named("email")
            .value("x")
            .attr("class", "wide");
        let attrs = input.into_attributes();
        let names: Vec<&str> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["class", "name", "value"]);
    }

    #[test]
    fn test_named_missing_value_is_empty() {
        let attrs = FieldInput::named("q").into_attributes();
        assert_eq!(attrs.text("value"), Some(""));
    }

    #[test]
    fn test_map_is_untouched() {
        let map = Attributes::from([("name", "q")]);
        let attrs = FieldInput::Map(map.clone()).value("ignored").into_attributes();
        assert_eq!(attrs, map);
    }

    #[test]
    fn test_checked_conversions() {
        assert_eq!(Checked::from(true), Checked::Flag(true));
        assert_eq!(Checked::from("5"), Checked::Match("5".into()));
        assert_eq!(Checked::from(5i64), Checked::Match("5".into()));
        assert_eq!(Checked::from(None::<bool>), Checked::Unspecified);
    }
}
