//! The field catalog: supported field types and what each can do.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A field type tag.
///
/// The set of supported types is closed. Tags read back from storage that do
/// not name a supported type are preserved as [`FieldType::Unsupported`] so
/// they survive a round-trip and render as an explicit marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text input.
    Text,
    /// Email address input.
    Email,
    /// Multi-line text input.
    Textarea,
    /// Dropdown with a single selection.
    Select,
    /// Radio button group.
    Radio,
    /// Checkbox group allowing several selections.
    Checkbox,
    /// File upload.
    File,
    /// A tag this catalog does not know.
    Unsupported(String),
}

/// Capability flags of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The field carries a list of options.
    pub has_options: bool,
    /// The field shows placeholder text.
    pub has_placeholder: bool,
    /// The field accepts several values at once.
    pub is_multi_value: bool,
}

/// Field types offered on the builder palette, in display order.
pub const PALETTE: [FieldType; 7] = [
    FieldType::Text,
    FieldType::Email,
    FieldType::Textarea,
    FieldType::Select,
    FieldType::Checkbox,
    FieldType::Radio,
    FieldType::File,
];

impl FieldType {
    /// Returns the capability flags for this type.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Text | Self::Email | Self::Textarea => Capabilities {
                has_options: false,
                has_placeholder: true,
                is_multi_value: false,
            },
            Self::Select | Self::Radio => Capabilities {
                has_options: true,
                has_placeholder: true,
                is_multi_value: false,
            },
            Self::Checkbox => Capabilities {
                has_options: true,
                has_placeholder: true,
                is_multi_value: true,
            },
            Self::File | Self::Unsupported(_) => Capabilities::default(),
        }
    }

    /// Returns the wire tag of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Unsupported(tag) => tag,
        }
    }

    /// Parses a wire tag. Unknown tags become [`FieldType::Unsupported`].
    pub fn parse(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "email" => Self::Email,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "file" => Self::File,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Returns the palette label, also used as the default field label.
    pub fn label(&self) -> &str {
        match self {
            Self::Text => "Text Input",
            Self::Email => "Email",
            Self::Textarea => "Text Area",
            Self::Select => "Dropdown",
            Self::Radio => "Radio Button",
            Self::Checkbox => "Checkbox",
            Self::File => "File Upload",
            Self::Unsupported(_) => "Unsupported Field",
        }
    }

    /// Returns whether this type is part of the catalog.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Returns the placeholder a freshly added field of this type gets.
    pub fn default_placeholder(&self) -> Option<String> {
        self.capabilities()
            .has_placeholder
            .then(|| format!("Enter {}", self.label().to_lowercase()))
    }

    /// Returns the options a freshly added field of this type gets.
    pub fn default_options(&self) -> Vec<String> {
        if self.capabilities().has_options {
            vec!["Option 1".to_string(), "Option 2".to_string()]
        } else {
            Vec::new()
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
