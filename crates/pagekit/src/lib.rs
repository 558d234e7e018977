//! # Pagekit - Forms and Views for Server-Rendered Pages
//!
//! Pagekit bundles two pieces:
//!
//! - [`form`]: HTML form-control builder with nested select options
//! - [`view`]: per-request template variables and themed view resolution
//!
//! [`Site`] wires them together so views can build form controls directly.
//!
//! ## Quick Start
//!
//! ```rust
//! use pagekit::{Site, SiteConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("views")).unwrap();
//! std::fs::write(
//!     dir.path().join("views/search.html"),
//!     r#"<h1>{{ title }}</h1>{{ form_input("q", query, type="search") }}"#,
//! ).unwrap();
//!
//! let mut config = SiteConfig::default();
//! config.views.root_dir = dir.path().to_path_buf();
//! let site = Site::new(config);
//!
//! let mut view = site.view();
//! view.set("title", "Search").unwrap();
//! view.set("query", "a&b").unwrap();
//! assert_eq!(
//!     view.render("search.html").unwrap(),
//!     r#"<h1>Search</h1><input type="search" name="q" value="a&amp;b" />"#
//! );
//! ```
//!
//! ## Configuration
//!
//! [`SiteConfig`] is read from YAML; see [`config`] for the layout.

pub mod config;
mod error;
pub mod functions;
mod site;

pub use pagekit_form as form;
pub use pagekit_view as view;

pub use config::{ConfigError, SiteConfig};
pub use error::{Error, Result};
pub use site::Site;

pub use pagekit_form::{
    Attributes, Checked, FieldInput, Form, FormConfig, FormError, LabelInput, OptionTree,
    SelectInput,
};
pub use pagekit_view::{
    MemoryFs, TemplateStore, View, ViewError, ViewPaths, ViewRenderer, ViewResolver,
};
