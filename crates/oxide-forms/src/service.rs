//! Collaborator interfaces for persisting forms and submissions.
//!
//! The builder and the public viewer only talk to storage through these
//! traits. Every call returns a boxed future so implementations can be
//! remote clients or in-process stores alike.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::draft::{Form, FormDraft};
use crate::error::ServiceResult;
use crate::ids::{FormId, SubmissionId};
use crate::submission::{Submission, SubmissionPayload};

/// A form as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    /// The form.
    #[serde(flatten)]
    pub form: Form,
    /// Number of stored submissions.
    pub submission_count: usize,
}

/// Submission statistics of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    /// Number of stored submissions.
    pub total_submissions: usize,
    /// Time of the most recent submission.
    pub last_submission_at: Option<DateTime<Utc>>,
}

impl SubmissionStats {
    /// Computes stats over a form's submissions.
    pub fn from_submissions<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Self {
        submissions
            .into_iter()
            .fold(Self::default(), |mut stats, submission| {
                stats.total_submissions += 1;
                stats.last_submission_at = stats
                    .last_submission_at
                    .max(Some(submission.submitted_at));
                stats
            })
    }
}

/// Storage of form definitions.
pub trait FormService: Send + Sync {
    /// Lists every form with its submission count.
    fn list(&self) -> BoxFuture<'_, ServiceResult<Vec<FormSummary>>>;

    /// Loads one form.
    fn get(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>>;

    /// Stores a new form and assigns its id.
    fn create(&self, draft: FormDraft) -> BoxFuture<'_, ServiceResult<Form>>;

    /// Replaces the settings and fields of a stored form.
    fn update(&self, id: FormId, draft: FormDraft) -> BoxFuture<'_, ServiceResult<Form>>;

    /// Deletes a form and its submissions.
    fn delete(&self, id: FormId) -> BoxFuture<'_, ServiceResult<()>>;

    /// Opens a form for public submissions.
    fn publish(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>>;

    /// Closes a form for public submissions.
    fn unpublish(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>>;

    /// Stores a draft copy of a form under a new id.
    fn duplicate(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>>;
}

/// Storage of submissions.
pub trait SubmissionService: Send + Sync {
    /// Records a submission for a published form.
    fn submit(
        &self,
        form_id: FormId,
        payload: SubmissionPayload,
    ) -> BoxFuture<'_, ServiceResult<Submission>>;

    /// Lists the submissions of a form, oldest first.
    fn list(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<Vec<Submission>>>;

    /// Loads one submission.
    fn get(&self, id: SubmissionId) -> BoxFuture<'_, ServiceResult<Submission>>;

    /// Deletes one submission.
    fn delete(&self, id: SubmissionId) -> BoxFuture<'_, ServiceResult<()>>;

    /// Exports the submissions of a form as CSV.
    fn export_csv(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<Vec<u8>>>;

    /// Computes submission stats of a form.
    fn stats(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<SubmissionStats>>;
}
