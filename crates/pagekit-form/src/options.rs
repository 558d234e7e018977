//! Option trees for select controls.
//!
//! An [`OptionTree`] is an ordered list of entries, each either a leaf option
//! (`value`, `label`) or a named group holding a nested tree. Groups nest
//! arbitrarily deep.
//!
//! ```rust
//! use pagekit_form::OptionTree;
//!
//! let tree = OptionTree::new()
//!     .option("a", "Apple")
//!     .group("fruit", OptionTree::new()
//!         .option("b", "Banana")
//!         .option("c", "Cherry"));
//!
//! assert_eq!(tree.len(), 2);
//! ```

use std::collections::BTreeSet;

use crate::attributes::Attributes;
use crate::markup::Markup;

/// One entry of an [`OptionTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    Leaf { value: String, label: String },
    Group { label: String, options: OptionTree },
}

/// Ordered, possibly nested, list of select options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTree {
    entries: Vec<OptionEntry>,
}

impl OptionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a leaf option.
    pub fn option(mut self, value: impl ToString, label: impl Into<String>) -> Self {
        self.push(OptionEntry::Leaf {
            value: value.to_string(),
            label: label.into(),
        });
        self
    }

    /// Appends a named group.
    pub fn group(mut self, label: impl Into<String>, options: OptionTree) -> Self {
        self.push(OptionEntry::Group {
            label: label.into(),
            options,
        });
        self
    }

    pub fn push(&mut self, entry: OptionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: ToString, L: Into<String>> FromIterator<(V, L)> for OptionTree {
    fn from_iter<I: IntoIterator<Item = (V, L)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(OptionTree::new(), |tree, (value, label)| {
                tree.option(value, label)
            })
    }
}

/// Values considered selected, compared by exact string match.
pub type SelectedSet = BTreeSet<String>;

/// Renders the `<option>`/`<optgroup>` block of a select.
///
/// The block opens with a newline, and every entry sits on its own line
/// indented by `level` tabs. `selected` and `prep` are fixed for the whole
/// walk; only `level` changes between recursion steps.
pub(crate) fn render_options(
    markup: &dyn Markup,
    tree: &OptionTree,
    selected: &SelectedSet,
    prep: bool,
    level: usize,
) -> String {
    let indent = "\t".repeat(level);
    let prepped = |s: &str| if prep { markup.escape(s) } else { s.to_string() };

    let mut out = String::from("\n");
    for entry in tree.entries() {
        match entry {
            OptionEntry::Group { label, options } => {
                let mut inner = render_options(markup, options, selected, prep, level + 1);
                inner.push_str(&indent);

                let attrs = Attributes::new()
                    .with("label", prepped(label))
                    .with(
                        "style",
                        format!("text-indent: {}px;", 20 + 10 * (level - 1)),
                    );
                out.push_str(&indent);
                out.push_str(&markup.build_tag(
                    "optgroup",
                    &markup.render_attributes(&attrs),
                    Some(&inner),
                ));
                out.push('\n');
            }
            OptionEntry::Leaf { value, label } => {
                let mut attrs = Attributes::new().with("value", prepped(value));
                if level > 1 {
                    attrs.set("style", format!("text-indent: {}px;", 10 * (level - 1)));
                }
                if selected.contains(value) {
                    attrs.set_flag("selected");
                }
                out.push_str(&indent);
                out.push_str(&markup.build_tag(
                    "option",
                    &markup.render_attributes(&attrs),
                    Some(&prepped(label)),
                ));
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::HtmlMarkup;

    fn selected(values: &[&str]) -> SelectedSet {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_flat_options() {
        let tree = OptionTree::new().option("a", "Apple").option("b", "Banana");
        let out = render_options(&HtmlMarkup, &tree, &selected(&["b"]), true, 1);
        assert_eq!(
            out,
            "\n\t<option value=\"a\">Apple</option>\n\t<option value=\"b\" selected>Banana</option>\n"
        );
    }

    #[test]
    fn test_nested_group() {
        let tree = OptionTree::new()
            .option("a", "Apple")
            .group("fruit", OptionTree::new().option("b", "Banana"));
        let out = render_options(&HtmlMarkup, &tree, &selected(&[]), true, 1);
        assert_eq!(
            out,
            "\n\t<option value=\"a\">Apple</option>\n\
             \t<optgroup label=\"fruit\" style=\"text-indent: 20px;\">\n\
             \t\t<option value=\"b\" style=\"text-indent: 10px;\">Banana</option>\n\
             \t</optgroup>\n"
        );
    }

    #[test]
    fn test_deep_nesting_indents() {
        let tree = OptionTree::new().group(
            "outer",
            OptionTree::new().group("inner", OptionTree::new().option("x", "X")),
        );
        let out = render_options(&HtmlMarkup, &tree, &selected(&["x"]), true, 1);
        assert!(out.contains("<optgroup label=\"inner\" style=\"text-indent: 30px;\">"));
        assert!(out.contains(
            "\t\t\t<option value=\"x\" style=\"text-indent: 20px;\" selected>X</option>"
        ));
    }

    #[test]
    fn test_selected_is_exact_match() {
        let tree = OptionTree::new().option("1", "One").option("01", "Zero one");
        let out = render_options(&HtmlMarkup, &tree, &selected(&["1"]), true, 1);
        assert!(out.contains("<option value=\"1\" selected>One</option>"));
        assert!(out.contains("<option value=\"01\">Zero one</option>"));
    }

    #[test]
    fn test_prep_escapes_labels_and_values() {
        let tree = OptionTree::new().option("a&b", "<b>");
        let escaped = render_options(&HtmlMarkup, &tree, &selected(&[]), true, 1);
        assert!(escaped.contains("<option value=\"a&amp;b\">&lt;b&gt;</option>"));

        let raw = render_options(&HtmlMarkup, &tree, &selected(&[]), false, 1);
        assert!(raw.contains("<option value=\"a&b\"><b></option>"));
    }

    #[test]
    fn test_from_iterator() {
        let tree: OptionTree = vec![(1, "One"), (2, "Two")].into_iter().collect();
        assert_eq!(
            tree.entries()[1],
            OptionEntry::Leaf {
                value: "2".into(),
                label: "Two".into()
            }
        );
    }
}
