//! CSV export of submissions.

use chrono::SecondsFormat;

use crate::draft::Form;
use crate::submission::Submission;

const MULTI_VALUE_SEPARATOR: &str = "; ";

/// Exports the submissions of `form` as CSV.
///
/// Columns are `Submission ID`, `Submitted At` and one per field, labelled
/// with the field label, in field order. Every cell is quoted.
pub fn export_csv(form: &Form, submissions: &[Submission]) -> Vec<u8> {
    let mut rows = Vec::with_capacity(submissions.len() + 1);

    let mut header = vec!["Submission ID".to_string(), "Submitted At".to_string()];
    header.extend(form.fields.iter().map(|f| f.label.clone()));
    rows.push(csv_row(&header));

    for submission in submissions {
        let mut row = vec![
            submission.id.to_string(),
            submission
                .submitted_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        row.extend(form.fields.iter().map(|field| {
            submission
                .value(&field.id)
                .map(|v| v.display(MULTI_VALUE_SEPARATOR))
                .unwrap_or_default()
        }));
        rows.push(csv_row(&row));
    }

    rows.join("\n").into_bytes()
}

/// Returns the download filename for a form's export.
pub fn csv_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_submissions.csv")
}

fn csv_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::catalog::FieldType;
    use crate::draft::FormDraft;
    use crate::field::FieldUpdate;
    use crate::ids::FormId;
    use crate::submission::SubmissionPayload;
    use crate::value::FieldValue;

    fn form() -> Form {
        let mut draft = FormDraft::new();
        let name = draft.add_field(FieldType::Text, None);
        let pick = draft.add_field(FieldType::Checkbox, None);
        draft.update_field(&name, FieldUpdate::new().label("Full \"name\""));
        draft.update_field(&pick, FieldUpdate::new().label("Pick"));
        Form::from_draft(FormId::new("f"), draft, Utc::now())
    }

    #[test]
    fn test_export_csv() {
        let form = form();
        let mut values = HashMap::new();
        values.insert(form.fields[1].id.clone(), FieldValue::choices(["A", "B"]));
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        let submission = Submission::new(form.id.clone(), SubmissionPayload { values }, at);

        let csv = String::from_utf8(export_csv(&form, &[submission.clone()])).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(
            lines[0],
            r#""Submission ID","Submitted At","Full ""name""","Pick""#
        );
        assert_eq!(
            lines[1],
            format!(r#""{}","2024-03-01T12:30:05Z","","A; B""#, submission.id)
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_export_without_submissions() {
        let csv = String::from_utf8(export_csv(&form(), &[])).unwrap();
        assert!(!csv.contains('\n'));
    }

    #[test]
    fn test_csv_filename() {
        assert_eq!(csv_filename("Contact Form"), "Contact_Form_submissions.csv");
        assert_eq!(csv_filename("Café!"), "Caf__submissions.csv");
    }
}
