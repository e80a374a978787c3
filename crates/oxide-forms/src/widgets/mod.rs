//! Form widgets for rendering HTML inputs.

mod bootstrap;

pub use bootstrap::{
    BootstrapCheckboxGroup, BootstrapFileInput, BootstrapRadioSelect, BootstrapSelect,
    BootstrapTextInput, BootstrapTextarea, UnsupportedNotice,
};

use std::collections::BTreeMap;

use crate::catalog::FieldType;
use crate::field::Field;
use crate::value::FieldValue;

/// Attributes that can be applied to a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetAttrs {
    /// HTML attributes, rendered in key order.
    pub attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
    /// Creates new empty widget attributes.
    pub fn new() -> Self {
        Self {
            attrs: BTreeMap::new(),
        }
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Renders attributes as an HTML attribute string.
    pub fn to_html(&self) -> String {
        self.attrs
            .iter()
            .map(|(k, v)| format!(r#"{k}="{}""#, html_escape(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders every attribute except `class` and `id`, each with a
    /// leading space.
    pub fn extra_html(&self) -> String {
        self.attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "class" && k.as_str() != "id")
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }

    /// Returns `base` followed by the `class` attribute, if any.
    pub fn class_with(&self, base: &str) -> String {
        match self.get("class") {
            Some(extra) if !extra.is_empty() => format!("{base} {}", html_escape(extra)),
            _ => base.to_string(),
        }
    }

    /// Returns the escaped `id` attribute, or `id_<name>`.
    pub fn id_or(&self, name: &str) -> String {
        html_escape(
            &self
                .get("id")
                .cloned()
                .unwrap_or_else(|| format!("id_{name}")),
        )
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

/// Trait for form widgets that render HTML inputs.
pub trait Widget: Send + Sync {
    /// Renders the widget as HTML.
    ///
    /// # Arguments
    /// * `name` - The field name (used for the name attribute)
    /// * `value` - The current value (if any)
    /// * `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String;

    /// Returns the HTML input type.
    fn input_type(&self) -> &str {
        "text"
    }
}

/// Picks the widget that renders a field of the given type.
pub fn widget_for(field: &Field) -> Box<dyn Widget> {
    let placeholder = field.placeholder.clone();
    match &field.field_type {
        FieldType::Text => Box::new(BootstrapTextInput {
            placeholder,
            ..BootstrapTextInput::new()
        }),
        FieldType::Email => Box::new(BootstrapTextInput {
            placeholder,
            ..BootstrapTextInput::email()
        }),
        FieldType::Textarea => Box::new(BootstrapTextarea {
            placeholder,
            ..BootstrapTextarea::default()
        }),
        FieldType::Select => Box::new(BootstrapSelect::new(&field.options)),
        FieldType::Radio => Box::new(BootstrapRadioSelect::new(&field.options)),
        FieldType::Checkbox => Box::new(BootstrapCheckboxGroup::new(&field.options)),
        FieldType::File => Box::new(BootstrapFileInput),
        FieldType::Unsupported(name) => Box::new(UnsupportedNotice::new(name)),
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_widget_attrs() {
        let attrs = WidgetAttrs::new()
            .with("class", "is-invalid")
            .with("id", "my-input")
            .with("disabled", "disabled");
        assert_eq!(
            attrs.to_html(),
            r#"class="is-invalid" disabled="disabled" id="my-input""#
        );
        assert_eq!(attrs.extra_html(), r#" disabled="disabled""#);
        assert_eq!(attrs.class_with("form-control"), "form-control is-invalid");
        assert_eq!(attrs.id_or("x"), "my-input");
        assert_eq!(WidgetAttrs::new().id_or("x"), "id_x");
    }

    #[test]
    fn test_widget_for_every_type() {
        let cases = [
            (FieldType::Text, "text"),
            (FieldType::Email, "email"),
            (FieldType::Textarea, "textarea"),
            (FieldType::Select, "select"),
            (FieldType::Radio, "radio"),
            (FieldType::Checkbox, "checkbox"),
            (FieldType::File, "file"),
            (FieldType::Unsupported("date".into()), "none"),
        ];
        for (field_type, input_type) in cases {
            let field = Field::new(field_type);
            assert_eq!(widget_for(&field).input_type(), input_type);
        }
    }

    #[test]
    fn test_widget_for_carries_placeholder() {
        let field = Field::new(FieldType::Email);
        let html = widget_for(&field).render("f", None, &WidgetAttrs::new());
        assert!(html.contains(r#"placeholder="Enter email""#));
    }
}
