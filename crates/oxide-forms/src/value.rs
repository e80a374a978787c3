//! Values entered into form fields.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::catalog::FieldType;

/// A value entered for one field.
///
/// The shape depends on the field type: a string for text-like and
/// single-choice fields, a list of selections for checkbox groups, and a
/// file descriptor for uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, email, textarea, select and radio values.
    Text(String),
    /// Checkbox selections.
    Choices(Vec<String>),
    /// An attached file.
    File(FileValue),
}

/// A file attached to a file field, encoded client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValue {
    /// Original file name.
    pub filename: String,
    /// `data:` URL with the file contents.
    pub inline_data_preview: String,
}

/// Raw result of reading a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name.
    pub filename: String,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Creates an upload.
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Encodes the upload as an inline file value.
    pub fn into_value(self) -> FileValue {
        let mime = if self.mime.is_empty() {
            "application/octet-stream"
        } else {
            self.mime.as_str()
        };
        let inline_data_preview = format!("data:{mime};base64,{}", STANDARD.encode(&self.bytes));
        FileValue {
            filename: self.filename,
            inline_data_preview,
        }
    }
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a checkbox value.
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Returns the value an untouched field of the given type holds, if any.
    pub fn empty_for(field_type: &FieldType) -> Option<Self> {
        match field_type {
            FieldType::Text
            | FieldType::Email
            | FieldType::Textarea
            | FieldType::Select
            | FieldType::Radio => Some(Self::Text(String::new())),
            FieldType::Checkbox => Some(Self::Choices(Vec::new())),
            FieldType::File | FieldType::Unsupported(_) => None,
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the selections if this is a checkbox value.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the file if this is a file value.
    pub fn as_file(&self) -> Option<&FileValue> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Renders the value as plain text: checkbox selections joined with
    /// `separator`, files by name.
    pub fn display(&self, separator: &str) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Choices(values) => values.join(separator),
            Self::File(file) => file.filename.clone(),
        }
    }
}

impl From<FileValue> for FieldValue {
    fn from(file: FileValue) -> Self {
        Self::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_shapes() {
        let text: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, FieldValue::text("hello"));

        let choices: FieldValue = serde_json::from_str(r#"["A","B"]"#).unwrap();
        assert_eq!(choices, FieldValue::choices(["A", "B"]));

        let file: FieldValue =
            serde_json::from_str(r#"{"filename":"a.png","inlineDataPreview":"data:,"}"#).unwrap();
        assert_eq!(file.as_file().unwrap().filename, "a.png");
    }

    #[test]
    fn test_upload_to_data_url() {
        let upload = FileUpload::new("hi.txt", "text/plain", b"hi".to_vec());
        let value = upload.into_value();
        assert_eq!(value.filename, "hi.txt");
        assert_eq!(value.inline_data_preview, "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(FieldValue::empty_for(&FieldType::Email), Some(FieldValue::text("")));
        assert_eq!(
            FieldValue::empty_for(&FieldType::Checkbox),
            Some(FieldValue::Choices(Vec::new()))
        );
        assert_eq!(FieldValue::empty_for(&FieldType::File), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::choices(["A", "B"]).display("; "), "A; B");
        let file = FileUpload::new("cv.pdf", "application/pdf", vec![1]).into_value();
        assert_eq!(FieldValue::from(file).display("; "), "cv.pdf");
    }
}
