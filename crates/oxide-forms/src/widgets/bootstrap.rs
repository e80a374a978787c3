//! Bootstrap 5 form widgets.

use super::{html_escape, Widget, WidgetAttrs};
use crate::value::FieldValue;

/// Bootstrap 5 text input widget.
#[derive(Debug, Clone)]
pub struct BootstrapTextInput {
    /// The HTML input type (text or email).
    pub input_type: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
}

impl Default for BootstrapTextInput {
    fn default() -> Self {
        Self {
            input_type: "text".to_string(),
            placeholder: None,
        }
    }
}

impl BootstrapTextInput {
    /// Creates a new text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an email input.
    pub fn email() -> Self {
        Self {
            input_type: "email".to_string(),
            ..Default::default()
        }
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

impl Widget for BootstrapTextInput {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let value_attr = value
            .and_then(FieldValue::as_text)
            .map(|v| format!(r#" value="{}""#, html_escape(v)))
            .unwrap_or_default();
        let placeholder_attr = placeholder_attr(self.placeholder.as_deref());

        format!(
            r#"<input type="{}" class="{}" id="{}" name="{}"{value_attr}{placeholder_attr}{}>"#,
            self.input_type,
            attrs.class_with("form-control"),
            attrs.id_or(name),
            html_escape(name),
            attrs.extra_html()
        )
    }

    fn input_type(&self) -> &str {
        &self.input_type
    }
}

/// Bootstrap 5 textarea widget.
#[derive(Debug, Clone)]
pub struct BootstrapTextarea {
    /// Number of rows.
    pub rows: usize,
    /// Placeholder text.
    pub placeholder: Option<String>,
}

impl Default for BootstrapTextarea {
    fn default() -> Self {
        Self {
            rows: 4,
            placeholder: None,
        }
    }
}

impl BootstrapTextarea {
    /// Creates a new textarea with the specified rows.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            placeholder: None,
        }
    }
}

impl Widget for BootstrapTextarea {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let content = value
            .and_then(FieldValue::as_text)
            .map(html_escape)
            .unwrap_or_default();
        let placeholder_attr = placeholder_attr(self.placeholder.as_deref());

        format!(
            r#"<textarea class="{}" id="{}" name="{}" rows="{}"{placeholder_attr}{}>{content}</textarea>"#,
            attrs.class_with("form-control"),
            attrs.id_or(name),
            html_escape(name),
            self.rows,
            attrs.extra_html()
        )
    }

    fn input_type(&self) -> &str {
        "textarea"
    }
}

/// Bootstrap 5 select widget with a leading blank entry.
#[derive(Debug, Clone)]
pub struct BootstrapSelect {
    /// Available choices; each is both value and label.
    pub choices: Vec<String>,
    /// Label for blank option.
    pub blank_label: String,
}

impl BootstrapSelect {
    /// Creates a new select with the given choices.
    pub fn new(choices: &[String]) -> Self {
        Self {
            choices: choices.to_vec(),
            blank_label: "Select an option".to_string(),
        }
    }
}

impl Widget for BootstrapSelect {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let current = value.and_then(FieldValue::as_text);
        let mut options = format!(
            r#"<option value="">{}</option>"#,
            html_escape(&self.blank_label)
        );

        for choice in &self.choices {
            let selected_attr = if current == Some(choice.as_str()) {
                " selected"
            } else {
                ""
            };
            options.push_str(&format!(
                r#"<option value="{0}"{selected_attr}>{0}</option>"#,
                html_escape(choice)
            ));
        }

        format!(
            r#"<select class="{}" id="{}" name="{}"{}>{options}</select>"#,
            attrs.class_with("form-select"),
            attrs.id_or(name),
            html_escape(name),
            attrs.extra_html()
        )
    }

    fn input_type(&self) -> &str {
        "select"
    }
}

/// Bootstrap 5 radio group: one choice out of many.
#[derive(Debug, Clone, Default)]
pub struct BootstrapRadioSelect {
    /// Available choices.
    pub choices: Vec<String>,
}

impl BootstrapRadioSelect {
    /// Creates a new radio select with the given choices.
    pub fn new(choices: &[String]) -> Self {
        Self {
            choices: choices.to_vec(),
        }
    }
}

impl Widget for BootstrapRadioSelect {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let current = value.and_then(FieldValue::as_text);
        check_group(name, "radio", &self.choices, attrs, |choice| {
            current == Some(choice)
        })
    }

    fn input_type(&self) -> &str {
        "radio"
    }
}

/// Bootstrap 5 checkbox group: any number of choices.
#[derive(Debug, Clone, Default)]
pub struct BootstrapCheckboxGroup {
    /// Available choices.
    pub choices: Vec<String>,
}

impl BootstrapCheckboxGroup {
    /// Creates a checkbox group with the given choices.
    pub fn new(choices: &[String]) -> Self {
        Self {
            choices: choices.to_vec(),
        }
    }
}

impl Widget for BootstrapCheckboxGroup {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let selected = value.and_then(FieldValue::as_choices).unwrap_or_default();
        check_group(name, "checkbox", &self.choices, attrs, |choice| {
            selected.iter().any(|s| s == choice)
        })
    }

    fn input_type(&self) -> &str {
        "checkbox"
    }
}

/// Bootstrap 5 file input, with a preview of an already attached file.
#[derive(Debug, Clone, Default)]
pub struct BootstrapFileInput;

impl Widget for BootstrapFileInput {
    fn render(&self, name: &str, value: Option<&FieldValue>, attrs: &WidgetAttrs) -> String {
        let mut html = format!(
            r#"<input type="file" class="{}" id="{}" name="{}"{}>"#,
            attrs.class_with("form-control"),
            attrs.id_or(name),
            html_escape(name),
            attrs.extra_html()
        );

        if let Some(file) = value.and_then(FieldValue::as_file) {
            let filename = html_escape(&file.filename);
            if file.inline_data_preview.starts_with("data:image/") {
                html.push_str(&format!(
                    r#"<img src="{}" alt="{filename}" class="img-thumbnail mt-2" style="max-height: 160px">"#,
                    html_escape(&file.inline_data_preview)
                ));
            }
            html.push_str(&format!(r#"<div class="form-text">{filename}</div>"#));
        }

        html
    }

    fn input_type(&self) -> &str {
        "file"
    }
}

/// Placeholder shown for a field whose type is not in the catalog.
#[derive(Debug, Clone)]
pub struct UnsupportedNotice {
    /// The unknown type tag.
    pub type_name: String,
}

impl UnsupportedNotice {
    /// Creates a notice for the given type tag.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Widget for UnsupportedNotice {
    fn render(&self, _name: &str, _value: Option<&FieldValue>, _attrs: &WidgetAttrs) -> String {
        format!(
            r#"<div class="alert alert-warning mb-0">Unsupported field type: {}</div>"#,
            html_escape(&self.type_name)
        )
    }

    fn input_type(&self) -> &str {
        "none"
    }
}

fn placeholder_attr(placeholder: Option<&str>) -> String {
    placeholder
        .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
        .unwrap_or_default()
}

fn check_group(
    name: &str,
    input_type: &str,
    choices: &[String],
    attrs: &WidgetAttrs,
    is_checked: impl Fn(&str) -> bool,
) -> String {
    let extra = attrs.extra_html();
    let escaped_name = html_escape(name);
    let mut html = String::new();

    for (i, choice) in choices.iter().enumerate() {
        let id = html_escape(&format!("id_{name}_{i}"));
        let checked_attr = if is_checked(choice) { " checked" } else { "" };
        html.push_str(&format!(
            r#"<div class="form-check">
  <input class="{}" type="{input_type}" id="{id}" name="{escaped_name}" value="{1}"{checked_attr}{extra}>
  <label class="form-check-label" for="{id}">{1}</label>
</div>
"#,
            attrs.class_with("form-check-input"),
            html_escape(choice)
        ));
    }

    html
}
