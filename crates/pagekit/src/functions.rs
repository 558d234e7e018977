//! Form controls as template functions.
//!
//! [`register`] installs one function per control. Positional arguments
//! follow the builder's named calling convention; keyword arguments become
//! extra attributes:
//!
//! ```jinja
//! {{ form_open("/login", hidden={"token": csrf}) }}
//! {{ form_input("email", user.email, type="email", data_role="primary") }}
//! {{ form_checkbox("remember", "1", checked=true) }}
//! {{ form_select("color", [["r", "Red"], ["Warm", [["o", "Orange"]]]], selected="o") }}
//! {{ form_close() }}
//! ```
//!
//! Attribute names have `_` replaced by `-` (`data_role` becomes
//! `data-role`), except the `dont_prep` control key. `true` renders a bare
//! flag, `false` and `none` drop the attribute.
//!
//! Select options are either a sequence of `[value, label]` pairs, where a
//! sequence in label position is a group, or a map from value to label
//! iterated in the engine's key order.

use std::sync::Arc;

use minijinja::value::{Kwargs, ValueKind};
use minijinja::{Environment, Error, ErrorKind, Value};
use pagekit_form::{
    Attributes, Checked, FieldInput, Form, FormError, LabelInput, OptionTree, SelectInput,
    DONT_PREP,
};

type FnResult = Result<Value, Error>;

/// Names of the registered functions.
pub const FUNCTIONS: [&str; 11] = [
    "form_open",
    "form_close",
    "form_input",
    "form_hidden",
    "form_password",
    "form_textarea",
    "form_checkbox",
    "form_radio",
    "form_select",
    "form_submit",
    "form_label",
];

/// Registers the form functions on `env`.
pub fn register(env: &mut Environment<'static>, form: Arc<Form>) {
    let f = Arc::clone(&form);
    env.add_function(
        "form_open",
        move |action: Option<String>, kwargs: Kwargs| -> FnResult {
            let hidden = hidden_fields(kwargs.get::<Option<Value>>("hidden")?)?;
            let mut attrs = attributes(&kwargs, &["hidden"])?;
            if let Some(action) = action {
                attrs.set("action", action);
            }
            let pairs: Vec<(&str, &str)> = hidden
                .iter()
                .map(|(n, v)| (n.as_str(), v.as_str()))
                .collect();
            safe(f.open_with(attrs, &pairs))
        },
    );

    let f = Arc::clone(&form);
    env.add_function("form_close", move || -> FnResult {
        Ok(Value::from_safe_string(f.close().to_string()))
    });

    let f = Arc::clone(&form);
    env.add_function(
        "form_input",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            safe(f.input(named(name, value, &kwargs)?))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_hidden",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            safe(f.hidden(named(name, value, &kwargs)?))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_password",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            safe(f.password(named(name, value, &kwargs)?))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_textarea",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            safe(f.textarea(named(name, value, &kwargs)?))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_submit",
        move |name: Option<String>, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            let name = name.unwrap_or_else(|| "submit".to_string());
            safe(f.submit(named(name, value, &kwargs)?))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_checkbox",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            let checked = checked(kwargs.get::<Option<Value>>("checked")?);
            let field = named_skipping(name, value, &kwargs, &["checked"])?;
            safe(f.checkbox(field, checked))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_radio",
        move |name: String, value: Option<Value>, kwargs: Kwargs| -> FnResult {
            let checked = checked(kwargs.get::<Option<Value>>("checked")?);
            let field = named_skipping(name, value, &kwargs, &["checked"])?;
            safe(f.radio(field, checked))
        },
    );

    let f = Arc::clone(&form);
    env.add_function(
        "form_select",
        move |name: String, options: Value, kwargs: Kwargs| -> FnResult {
            let selected = selected_values(kwargs.get::<Option<Value>>("selected")?)?;
            let input = SelectInput::named(name, option_tree(&options)?)
                .selected(selected)
                .attributes(attributes(&kwargs, &["selected"])?);
            safe(f.select(input))
        },
    );

    let f = form;
    env.add_function(
        "form_label",
        move |label: String, id: Option<String>, kwargs: Kwargs| -> FnResult {
            let mut input = LabelInput::new(label).attributes(attributes(&kwargs, &[])?);
            if let Some(id) = id {
                input = input.id(id);
            }
            Ok(Value::from_safe_string(f.label(input)))
        },
    );
}

fn safe(result: Result<String, FormError>) -> FnResult {
    result
        .map(Value::from_safe_string)
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err))
}

fn named(name: String, value: Option<Value>, kwargs: &Kwargs) -> Result<FieldInput, Error> {
    named_skipping(name, value, kwargs, &[])
}

fn named_skipping(
    name: String,
    value: Option<Value>,
    kwargs: &Kwargs,
    skip: &[&str],
) -> Result<FieldInput, Error> {
    let mut field = FieldInput::named(name).attributes(attributes(kwargs, skip)?);
    if let Some(value) = value.as_ref().and_then(text) {
        field = field.value(value);
    }
    Ok(field)
}

/// Collects keyword arguments into attributes.
fn attributes(kwargs: &Kwargs, skip: &[&str]) -> Result<Attributes, Error> {
    let mut attrs = Attributes::new();
    for key in kwargs.args() {
        if skip.contains(&key) {
            continue;
        }
        let value: Value = kwargs.get(key)?;
        let name = if key == DONT_PREP {
            key.to_string()
        } else {
            key.replace('_', "-")
        };
        match value.kind() {
            ValueKind::Undefined | ValueKind::None => {}
            ValueKind::Bool => {
                if value.is_true() {
                    attrs.set_flag(name);
                }
            }
            _ => attrs.set(name, value.to_string()),
        }
    }
    Ok(attrs)
}

fn text(value: &Value) -> Option<String> {
    if value.is_undefined() || value.is_none() {
        None
    } else {
        Some(value.to_string())
    }
}

fn checked(value: Option<Value>) -> Checked {
    match value {
        Some(v) if v.kind() == ValueKind::Bool => Checked::Flag(v.is_true()),
        Some(v) => text(&v).map(Checked::Match).unwrap_or_default(),
        None => Checked::Unspecified,
    }
}

fn selected_values(value: Option<Value>) -> Result<Vec<String>, Error> {
    match value {
        None => Ok(Vec::new()),
        Some(v) if v.kind() == ValueKind::Seq => Ok(v.try_iter()?.filter_map(|v| text(&v)).collect()),
        Some(v) => Ok(text(&v).into_iter().collect()),
    }
}

fn hidden_fields(value: Option<Value>) -> Result<Vec<(String, String)>, Error> {
    let Some(map) = value.filter(|v| v.kind() == ValueKind::Map) else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::new();
    for key in map.try_iter()? {
        let value = map.get_item(&key)?;
        pairs.push((key.to_string(), text(&value).unwrap_or_default()));
    }
    Ok(pairs)
}

/// Converts a template value into an options tree.
fn option_tree(value: &Value) -> Result<OptionTree, Error> {
    let mut tree = OptionTree::new();
    match value.kind() {
        ValueKind::Seq => {
            for entry in value.try_iter()? {
                if entry.kind() != ValueKind::Seq || entry.len() != Some(2) {
                    return Err(Error::new(
                        ErrorKind::InvalidOperation,
                        "select options must be [value, label] pairs",
                    ));
                }
                let key = entry.get_item(&Value::from(0))?;
                let label = entry.get_item(&Value::from(1))?;
                tree = push_entry(tree, &key, &label)?;
            }
        }
        ValueKind::Map => {
            for key in value.try_iter()? {
                let label = value.get_item(&key)?;
                tree = push_entry(tree, &key, &label)?;
            }
        }
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                "select options must be a sequence or a map",
            ))
        }
    }
    Ok(tree)
}

fn push_entry(tree: OptionTree, key: &Value, label: &Value) -> Result<OptionTree, Error> {
    Ok(match label.kind() {
        ValueKind::Seq | ValueKind::Map => tree.group(key.to_string(), option_tree(label)?),
        _ => tree.option(key.to_string(), text(label).unwrap_or_default()),
    })
}
