//! Form configuration.

use serde::{Deserialize, Serialize};

/// Site-wide policy knobs consumed by [`Form`](crate::Form).
///
/// Every field has a default, so a partial YAML/JSON document deserializes
/// cleanly:
///
/// ```rust
/// use pagekit_form::FormConfig;
///
/// let config: FormConfig = serde_json::from_str(r#"{"auto_id": true}"#).unwrap();
/// assert!(config.auto_id);
/// assert!(config.prep_value);
/// assert_eq!(config.auto_id_prefix, "form_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Escape rendered values unless a call passes `dont_prep`.
    pub prep_value: bool,
    /// Synthesize missing `id` attributes from the field name.
    pub auto_id: bool,
    /// Prefix used when synthesizing ids.
    pub auto_id_prefix: String,
    /// Submission method used by `open` when none is given.
    pub form_method: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            prep_value: true,
            auto_id: false,
            auto_id_prefix: "form_".to_string(),
            form_method: "post".to_string(),
        }
    }
}
