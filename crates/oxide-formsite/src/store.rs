//! In-memory storage of forms and submissions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use oxide_forms::{
    assemble, export_csv, validate_form, Form, FormDraft, FormId, FormService, FormStatus,
    FormSummary, ServiceError, ServiceResult, Submission, SubmissionId, SubmissionPayload,
    SubmissionService, SubmissionStats,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct State {
    forms: HashMap<FormId, Form>,
    submissions: Vec<Submission>,
}

impl State {
    fn form(&self, id: &FormId) -> ServiceResult<&Form> {
        self.forms
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Form {id}")))
    }

    fn form_mut(&mut self, id: &FormId) -> ServiceResult<&mut Form> {
        self.forms
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Form {id}")))
    }

    fn submissions_of<'a>(&'a self, id: &'a FormId) -> impl Iterator<Item = &'a Submission> {
        self.submissions.iter().filter(move |s| &s.form_id == id)
    }
}

/// Forms and submissions held in process memory.
///
/// Clones share the same data. Each operation holds the lock for its own
/// duration only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

fn check_title(draft: &FormDraft) -> ServiceResult<()> {
    if draft.settings.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Form title is required".to_string()));
    }
    Ok(())
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists forms with their submission counts, most recently updated
    /// first.
    pub async fn list_forms(&self) -> Vec<FormSummary> {
        let state = self.state.read().await;
        let mut list: Vec<FormSummary> = state
            .forms
            .values()
            .map(|form| FormSummary {
                submission_count: state.submissions_of(&form.id).count(),
                form: form.clone(),
            })
            .collect();
        list.sort_by(|a, b| b.form.updated_at.cmp(&a.form.updated_at));
        list
    }

    /// Returns a form by id.
    pub async fn get_form(&self, id: &FormId) -> ServiceResult<Form> {
        self.state.read().await.form(id).cloned()
    }

    /// Stores a new draft under a fresh id. The title must not be blank.
    pub async fn create_form(&self, mut draft: FormDraft) -> ServiceResult<Form> {
        check_title(&draft)?;
        draft.normalize();
        let form = Form::from_draft(FormId::generate(), draft, Utc::now());
        info!(form_id = %form.id, title = %form.settings.title, "form created");
        self.state
            .write()
            .await
            .forms
            .insert(form.id.clone(), form.clone());
        Ok(form)
    }

    /// Replaces a form's settings, fields and status, keeping its creation
    /// time.
    pub async fn update_form(&self, id: &FormId, mut draft: FormDraft) -> ServiceResult<Form> {
        check_title(&draft)?;
        draft.normalize();
        let mut state = self.state.write().await;
        let form = state.form_mut(id)?;
        form.settings = draft.settings;
        form.fields = draft.fields;
        form.status = draft.status;
        form.updated_at = Utc::now();
        info!(form_id = %id, fields = form.fields.len(), "form updated");
        Ok(form.clone())
    }

    /// Deletes a form together with its submissions.
    pub async fn delete_form(&self, id: &FormId) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        if state.forms.remove(id).is_none() {
            return Err(ServiceError::NotFound(format!("Form {id}")));
        }
        let before = state.submissions.len();
        state.submissions.retain(|s| &s.form_id != id);
        info!(
            form_id = %id,
            submissions = before - state.submissions.len(),
            "form deleted"
        );
        Ok(())
    }

    /// Publishes or unpublishes a form.
    pub async fn set_status(&self, id: &FormId, status: FormStatus) -> ServiceResult<Form> {
        let mut state = self.state.write().await;
        let form = state.form_mut(id)?;
        form.status = status;
        form.updated_at = Utc::now();
        info!(form_id = %id, status = status.as_str(), "form status changed");
        Ok(form.clone())
    }

    /// Stores an unpublished copy of a form with fresh field ids.
    pub async fn duplicate_form(&self, id: &FormId) -> ServiceResult<Form> {
        let mut state = self.state.write().await;
        let draft = state.form(id)?.to_draft().duplicate();
        let copy = Form::from_draft(FormId::generate(), draft, Utc::now());
        info!(form_id = %id, copy_id = %copy.id, "form duplicated");
        state.forms.insert(copy.id.clone(), copy.clone());
        Ok(copy)
    }

    /// Validates and stores a submission. The form must be published and
    /// below its submission limit.
    pub async fn submit(
        &self,
        form_id: &FormId,
        payload: SubmissionPayload,
    ) -> ServiceResult<Submission> {
        let mut state = self.state.write().await;
        let form = state.form(form_id)?;
        if !form.is_published() {
            return Err(ServiceError::NotPublished);
        }
        let limit = form.settings.submission_limit;
        if limit > 0 && state.submissions_of(form_id).count() >= limit as usize {
            return Err(ServiceError::SubmissionLimitReached);
        }
        let errors = validate_form(&form.fields, &payload.values);
        if !errors.is_empty() {
            debug!(form_id = %form_id, errors = errors.len(), "submission rejected");
            return Err(ServiceError::Invalid(errors));
        }

        let payload = assemble(&form.fields, &payload.values);
        let submission = Submission::new(form_id.clone(), payload, Utc::now());
        info!(form_id = %form_id, submission_id = %submission.id, "submission stored");
        state.submissions.push(submission.clone());
        Ok(submission)
    }

    /// Lists a form's submissions, oldest first.
    pub async fn list_submissions(&self, form_id: &FormId) -> ServiceResult<Vec<Submission>> {
        let state = self.state.read().await;
        state.form(form_id)?;
        Ok(state.submissions_of(form_id).cloned().collect())
    }

    /// Returns a submission by id.
    pub async fn get_submission(&self, id: &SubmissionId) -> ServiceResult<Submission> {
        self.state
            .read()
            .await
            .submissions
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Submission {id}")))
    }

    /// Deletes a single submission.
    pub async fn delete_submission(&self, id: &SubmissionId) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        let index = state
            .submissions
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Submission {id}")))?;
        state.submissions.remove(index);
        info!(submission_id = %id, "submission deleted");
        Ok(())
    }

    /// Returns the form and the CSV export of its submissions.
    pub async fn export(&self, form_id: &FormId) -> ServiceResult<(Form, Vec<u8>)> {
        let state = self.state.read().await;
        let form = state.form(form_id)?;
        let submissions: Vec<Submission> = state.submissions_of(form_id).cloned().collect();
        Ok((form.clone(), export_csv(form, &submissions)))
    }

    /// Returns the submission count and latest submission time of a form.
    pub async fn stats(&self, form_id: &FormId) -> ServiceResult<SubmissionStats> {
        let state = self.state.read().await;
        state.form(form_id)?;
        Ok(SubmissionStats::from_submissions(state.submissions_of(form_id)))
    }
}

impl FormService for MemoryStore {
    fn list(&self) -> BoxFuture<'_, ServiceResult<Vec<FormSummary>>> {
        Box::pin(async move { Ok(self.list_forms().await) })
    }

    fn get(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(async move { self.get_form(&id).await })
    }

    fn create(&self, draft: FormDraft) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(self.create_form(draft))
    }

    fn update(&self, id: FormId, draft: FormDraft) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(async move { self.update_form(&id, draft).await })
    }

    fn delete(&self, id: FormId) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move { self.delete_form(&id).await })
    }

    fn publish(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(async move { self.set_status(&id, FormStatus::Published).await })
    }

    fn unpublish(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(async move { self.set_status(&id, FormStatus::Draft).await })
    }

    fn duplicate(&self, id: FormId) -> BoxFuture<'_, ServiceResult<Form>> {
        Box::pin(async move { self.duplicate_form(&id).await })
    }
}

impl SubmissionService for MemoryStore {
    fn submit(
        &self,
        form_id: FormId,
        payload: SubmissionPayload,
    ) -> BoxFuture<'_, ServiceResult<Submission>> {
        Box::pin(async move { Self::submit(self, &form_id, payload).await })
    }

    fn list(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<Vec<Submission>>> {
        Box::pin(async move { self.list_submissions(&form_id).await })
    }

    fn get(&self, id: SubmissionId) -> BoxFuture<'_, ServiceResult<Submission>> {
        Box::pin(async move { self.get_submission(&id).await })
    }

    fn delete(&self, id: SubmissionId) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move { self.delete_submission(&id).await })
    }

    fn export_csv(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<Vec<u8>>> {
        Box::pin(async move { self.export(&form_id).await.map(|(_, csv)| csv) })
    }

    fn stats(&self, form_id: FormId) -> BoxFuture<'_, ServiceResult<SubmissionStats>> {
        Box::pin(async move { Self::stats(self, &form_id).await })
    }
}

#[cfg(test)]
mod tests {
    use oxide_forms::{FieldType, FieldUpdate, FieldValue, SettingsUpdate};

    use super::*;

    fn payload(values: impl IntoIterator<Item = (oxide_forms::FieldId, FieldValue)>) -> SubmissionPayload {
        SubmissionPayload {
            values: values.into_iter().collect(),
        }
    }

    async fn published_form(store: &MemoryStore, limit: u32) -> Form {
        let mut draft = FormDraft::new();
        draft.update_settings(SettingsUpdate::new().title("Survey").submission_limit(limit));
        let id = draft.add_field(FieldType::Email, None);
        draft.update_field(&id, FieldUpdate::new().label("Email").required(true));
        let form = store.create_form(draft).await.unwrap();
        store.set_status(&form.id, FormStatus::Published).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let store = MemoryStore::new();
        let mut draft = FormDraft::new();
        draft.update_settings(SettingsUpdate::new().title("   "));
        assert_eq!(
            store.create_form(draft).await.unwrap_err(),
            ServiceError::BadRequest("Form title is required".into())
        );
        assert!(store.list_forms().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_touches_updated_at_only() {
        let store = MemoryStore::new();
        let form = store.create_form(FormDraft::new()).await.unwrap();
        let mut draft = form.to_draft();
        draft.update_settings(SettingsUpdate::new().title("Renamed"));

        let updated = store.update_form(&form.id, draft).await.unwrap();
        assert_eq!(updated.settings.title, "Renamed");
        assert_eq!(updated.created_at, form.created_at);
        assert!(updated.updated_at >= form.updated_at);
    }

    #[tokio::test]
    async fn test_submit_requires_published_form() {
        let store = MemoryStore::new();
        let form = store.create_form(FormDraft::new()).await.unwrap();
        assert_eq!(
            store.submit(&form.id, payload([])).await.unwrap_err(),
            ServiceError::NotPublished
        );
        assert!(matches!(
            store.submit(&FormId::new("ghost"), payload([])).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_validates_values() {
        let store = MemoryStore::new();
        let form = published_form(&store, 0).await;
        let email = form.fields[0].id.clone();

        let err = store
            .submit(&form.id, payload([(email.clone(), FieldValue::text("nope"))]))
            .await
            .unwrap_err();
        match err {
            ServiceError::Invalid(errors) => {
                assert_eq!(errors.get(&email), Some("Please enter a valid email address"));
            }
            other => panic!("unexpected {other:?}"),
        }

        let stored = store
            .submit(&form.id, payload([(email.clone(), FieldValue::text("a@b.com"))]))
            .await
            .unwrap();
        assert_eq!(stored.value(&email), Some(&FieldValue::text("a@b.com")));
    }

    #[tokio::test]
    async fn test_submission_limit() {
        let store = MemoryStore::new();
        let form = published_form(&store, 1).await;
        let email = form.fields[0].id.clone();
        let values = || payload([(email.clone(), FieldValue::text("a@b.com"))]);

        store.submit(&form.id, values()).await.unwrap();
        assert_eq!(
            store.submit(&form.id, values()).await.unwrap_err(),
            ServiceError::SubmissionLimitReached
        );
    }

    #[tokio::test]
    async fn test_delete_form_removes_submissions() {
        let store = MemoryStore::new();
        let form = published_form(&store, 0).await;
        let email = form.fields[0].id.clone();
        let stored = store
            .submit(&form.id, payload([(email, FieldValue::text("a@b.com"))]))
            .await
            .unwrap();

        store.delete_form(&form.id).await.unwrap();
        assert!(matches!(
            store.get_submission(&stored.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(store.delete_form(&form.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_counts_and_stats() {
        let store = MemoryStore::new();
        let form = published_form(&store, 0).await;
        let email = form.fields[0].id.clone();
        for _ in 0..2 {
            store
                .submit(&form.id, payload([(email.clone(), FieldValue::text("a@b.com"))]))
                .await
                .unwrap();
        }

        let list = store.list_forms().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].submission_count, 2);

        let stats = store.stats(&form.id).await.unwrap();
        assert_eq!(stats.total_submissions, 2);
        assert!(stats.last_submission_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_is_draft_with_fresh_ids() {
        let store = MemoryStore::new();
        let form = published_form(&store, 0).await;
        let copy = store.duplicate_form(&form.id).await.unwrap();

        assert_ne!(copy.id, form.id);
        assert_eq!(copy.settings.title, "Survey (Copy)");
        assert_eq!(copy.status, FormStatus::Draft);
        assert_ne!(copy.fields[0].id, form.fields[0].id);
        assert_eq!(store.list_forms().await.len(), 2);
    }

    #[tokio::test]
    async fn test_trait_objects_share_state() {
        let store = MemoryStore::new();
        let forms: &dyn FormService = &store;
        let created = forms.create(FormDraft::new()).await.unwrap();
        let published = forms.publish(created.id.clone()).await.unwrap();
        assert!(published.is_published());

        let clone = store.clone();
        let submissions: &dyn SubmissionService = &clone;
        let csv = submissions.export_csv(created.id.clone()).await.unwrap();
        assert!(String::from_utf8(csv)
            .unwrap()
            .starts_with(r#""Submission ID","Submitted At""#));
    }
}
