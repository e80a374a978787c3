//! Turning entered values into a submission payload.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::FieldType;
use crate::field::Field;
use crate::ids::{FieldId, FormId, SubmissionId};
use crate::value::FieldValue;

/// Values handed to the submission service, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Entered values.
    #[serde(rename = "data", default)]
    pub values: HashMap<FieldId, FieldValue>,
}

impl SubmissionPayload {
    /// Returns the value for a field.
    pub fn get(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }
}

/// A stored submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submission id.
    pub id: SubmissionId,
    /// Form the submission belongs to.
    pub form_id: FormId,
    /// Time the submission was received.
    pub submitted_at: DateTime<Utc>,
    /// Entered values.
    #[serde(rename = "data")]
    pub values: HashMap<FieldId, FieldValue>,
}

impl Submission {
    /// Creates a submission for `form_id` under a fresh id.
    pub fn new(form_id: FormId, payload: SubmissionPayload, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::generate(),
            form_id,
            submitted_at,
            values: payload.values,
        }
    }

    /// Returns the value for a field.
    pub fn value(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }
}

/// Builds the payload for `fields` out of the entered values.
///
/// Values of ids that are not fields of the form are dropped. Checkbox
/// selections come out deduplicated, in option order.
pub fn assemble(fields: &[Field], values: &HashMap<FieldId, FieldValue>) -> SubmissionPayload {
    let values = fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.id)?;
            let value = match (&field.field_type, value) {
                (FieldType::Checkbox, FieldValue::Choices(selected)) => {
                    FieldValue::Choices(order_selections(&field.options, selected))
                }
                _ => value.clone(),
            };
            Some((field.id.clone(), value))
        })
        .collect();

    SubmissionPayload { values }
}

fn order_selections(options: &[String], selected: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = options
        .iter()
        .filter(|o| selected.contains(o))
        .cloned()
        .collect();
    for s in selected {
        if !ordered.contains(s) {
            ordered.push(s.clone());
        }
    }
    ordered
}
