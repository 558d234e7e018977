//! # Pagekit Form - Declarative HTML Form Controls
//!
//! `pagekit-form` turns field descriptions into HTML form-control markup.
//! It normalizes two calling conventions into one attribute map per control,
//! applies the site-wide policies (value escaping, auto-generated ids, type
//! validation) and hands the result to pluggable markup collaborators.
//!
//! ## Core Concepts
//!
//! - [`Form`]: The builder; one method per control type
//! - [`FieldInput`]: Bare name + value, or a complete [`Attributes`] map
//! - [`OptionTree`]: Nested options and option groups for selects
//! - [`FormConfig`]: Escaping, auto-id and default method policy
//! - [`Markup`]: Escaping, attribute and tag assembly backend
//!
//! ## Quick Start
//!
//! ```rust
//! use pagekit_form::{Attributes, Form, FormConfig, OptionTree, SelectInput};
//!
//! let form = Form::new(FormConfig { auto_id: true, ..FormConfig::default() });
//!
//! let name = form.input(("name", "Ada")).unwrap();
//! assert_eq!(name, r#"<input name="name" value="Ada" type="text" id="form_name" />"#);
//!
//! let fruit = OptionTree::new()
//!     .option("a", "Apple")
//!     .group("berries", OptionTree::new().option("s", "Strawberry"));
//! let select = form
//!     .select(SelectInput::named("fruit", fruit).selected(["s"]))
//!     .unwrap();
//! assert!(select.contains(r#"<option value="s" style="text-indent: 10px;" selected>"#));
//!
//! // The map form is used as-is
//! let hidden = form
//!     .hidden(Attributes::from([("name", "token"), ("value", "t0k3n")]))
//!     .unwrap();
//! assert!(hidden.contains(r#"type="hidden""#));
//! ```
//!
//! ## Errors
//!
//! Construction fails with [`FormError::InvalidFieldType`] for a `type`
//! outside [`VALID_INPUT_TYPES`], and with [`FormError::InvalidOptions`] for
//! a select without options. Nothing is rendered on failure.

mod attributes;
mod config;
mod error;
mod field;
mod form;
pub mod markup;
mod options;

pub use attributes::{AttrValue, Attributes};
pub use config::FormConfig;
pub use error::{FormError, Result};
pub use field::{Checked, FieldInput, LabelInput, SelectInput, DONT_PREP, TAG};
pub use form::{is_valid_input_type, Form, VALID_INPUT_TYPES};
pub use markup::{
    escape_html, AttributeRenderer, BaseUrl, Escaper, HtmlMarkup, Markup, NoTranslation,
    TagBuilder, Translator, UrlBuilder,
};
pub use options::{OptionEntry, OptionTree, SelectedSet};
