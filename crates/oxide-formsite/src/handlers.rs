//! Request handlers for the JSON API and the public form pages.

use oxide_forms::{
    csv_filename, FieldId, FieldType, FieldValue, FileUpload, Form, FormDraft, FormId, FormStatus,
    PublicFormSession, ServiceError, SessionError, SubmissionId, SubmissionPayload,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::http::{FilePart, Request, Response};
use crate::routes::{Endpoint, Router};
use crate::store::MemoryStore;
use crate::templates;

/// A form together with its shareable link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormView {
    #[serde(flatten)]
    form: Form,
    public_url: String,
}

/// The site: routes requests to the store and renders the responses.
#[derive(Debug, Clone)]
pub struct App {
    store: MemoryStore,
    router: Router,
    config: SiteConfig,
}

impl App {
    /// Creates a site backed by an empty store.
    pub fn new(config: SiteConfig) -> Result<Self> {
        Self::with_store(config, MemoryStore::new())
    }

    /// Creates a site backed by the given store.
    pub fn with_store(config: SiteConfig, store: MemoryStore) -> Result<Self> {
        Ok(Self {
            store,
            router: Router::new()?,
            config,
        })
    }

    /// Returns the backing store.
    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Returns the site configuration.
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Handles one request. Errors are turned into responses here.
    pub async fn handle(&self, req: Request) -> Response {
        let method = req.method;
        let path = req.path.clone();

        let response = match self.dispatch(req).await {
            Ok(response) => response,
            Err(err) => {
                if err.status() >= 500 {
                    error!(method = %method, path = %path, error = %err, "request failed");
                } else {
                    debug!(method = %method, path = %path, error = %err, "request rejected");
                }
                err.into_response()
            }
        };

        info!(method = %method, path = %path, status = response.status, "request");
        response
    }

    async fn dispatch(&self, mut req: Request) -> Result<Response> {
        let (endpoint, params) = self.router.resolve(req.method, &req.path)?;
        req.params = params;
        let id = req.params.get("id").unwrap_or_default().to_string();

        let response = match endpoint {
            Endpoint::Health => Response::json(&json!({ "status": "ok" })),
            Endpoint::ListForms => Response::json(&self.store.list_forms().await),
            Endpoint::CreateForm => {
                let draft: FormDraft = req.json()?;
                let form = self.store.create_form(draft).await?;
                self.form_response(form).status(201)
            }
            Endpoint::GetForm => self.form_response(self.store.get_form(&FormId::new(id)).await?),
            Endpoint::UpdateForm => {
                let draft: FormDraft = req.json()?;
                let form = self.store.update_form(&FormId::new(id), draft).await?;
                self.form_response(form)
            }
            Endpoint::DeleteForm => {
                self.store.delete_form(&FormId::new(id)).await?;
                Response::no_content()
            }
            Endpoint::PublishForm => {
                let form = self
                    .store
                    .set_status(&FormId::new(id), FormStatus::Published)
                    .await?;
                self.form_response(form)
            }
            Endpoint::UnpublishForm => {
                let form = self
                    .store
                    .set_status(&FormId::new(id), FormStatus::Draft)
                    .await?;
                self.form_response(form)
            }
            Endpoint::DuplicateForm => {
                let copy = self.store.duplicate_form(&FormId::new(id)).await?;
                self.form_response(copy).status(201)
            }
            Endpoint::FormStats => Response::json(&self.store.stats(&FormId::new(id)).await?),
            Endpoint::SubmitForm => {
                let payload: SubmissionPayload = req.json()?;
                let submission = self.store.submit(&FormId::new(id), payload).await?;
                Response::json(&submission).status(201)
            }
            Endpoint::ListSubmissions => {
                Response::json(&self.store.list_submissions(&FormId::new(id)).await?)
            }
            Endpoint::ExportSubmissions => {
                let (form, csv) = self.store.export(&FormId::new(id)).await?;
                Response::csv(&csv_filename(&form.settings.title), csv)
            }
            Endpoint::GetSubmission => {
                Response::json(&self.store.get_submission(&SubmissionId::new(id)).await?)
            }
            Endpoint::DeleteSubmission => {
                self.store.delete_submission(&SubmissionId::new(id)).await?;
                Response::no_content()
            }
            Endpoint::PublicForm => {
                let form = self.store.get_form(&FormId::new(id.as_str())).await?;
                if !form.is_published() {
                    return Err(ServiceError::NotFound(format!("Form {id}")).into());
                }
                Response::json(&form)
            }
            Endpoint::ShowForm => match self.open_session(&FormId::new(id)).await {
                Some(session) => Response::html(templates::form_page(&session, &req.path, None)),
                None => unavailable(),
            },
            Endpoint::PostForm => self.post_form(&FormId::new(id), &req).await?,
        };
        Ok(response)
    }

    fn form_response(&self, form: Form) -> Response {
        let public_url = self.config.public_url(&form.id);
        Response::json(&FormView { form, public_url })
    }

    async fn open_session(&self, id: &FormId) -> Option<PublicFormSession> {
        let form = self.store.get_form(id).await.ok()?;
        PublicFormSession::new(form).ok()
    }

    /// Submits a public form, urlencoded or multipart, and renders the
    /// outcome.
    async fn post_form(&self, id: &FormId, req: &Request) -> Result<Response> {
        let Some(mut session) = self.open_session(id).await else {
            return Ok(unavailable());
        };

        let data = req.form_data().await?;
        for (field_id, value) in form_values(session.form(), &data.pairs) {
            session.set_value(&field_id, value);
        }
        for (field_id, upload) in form_files(session.form(), data.files) {
            session.apply_file(&field_id, upload);
        }

        let outcome = session.submit(&self.store).await.map(|s| s.id.clone());
        let response = match outcome {
            Ok(submission_id) => {
                debug!(form_id = %id, submission_id = %submission_id, "public form submitted");
                Response::html(templates::form_page(&session, &req.path, None))
            }
            Err(SessionError::Form(_) | SessionError::Service(ServiceError::Invalid(_))) => {
                Response::html(templates::form_page(&session, &req.path, None)).status(422)
            }
            Err(SessionError::Service(ServiceError::NotPublished | ServiceError::NotFound(_))) => {
                unavailable()
            }
            Err(SessionError::Service(err)) => {
                let message = err.to_string();
                let status = SiteError::from(err).status();
                Response::html(templates::form_page(&session, &req.path, Some(&message)))
                    .status(status)
            }
            Err(err @ (SessionError::Busy | SessionError::AlreadySubmitted)) => {
                let message = err.to_string();
                Response::html(templates::form_page(&session, &req.path, Some(&message)))
                    .status(409)
            }
        };
        Ok(response)
    }
}

fn unavailable() -> Response {
    Response::html(templates::unavailable_page()).status(404)
}

/// Maps text entries onto the form's fields. Checkbox groups collect every
/// repeated value. File fields take their value from [`form_files`].
fn form_values(form: &Form, pairs: &[(String, String)]) -> Vec<(FieldId, FieldValue)> {
    form.fields
        .iter()
        .filter_map(|field| {
            let mut entries = pairs
                .iter()
                .filter(|(key, _)| key == field.id.as_str())
                .map(|(_, value)| value.clone());
            let value = match field.field_type {
                FieldType::Checkbox => Some(FieldValue::Choices(entries.collect())),
                FieldType::File | FieldType::Unsupported(_) => None,
                FieldType::Text
                | FieldType::Email
                | FieldType::Textarea
                | FieldType::Select
                | FieldType::Radio => entries.next().map(FieldValue::Text),
            };
            value.map(|value| (field.id.clone(), value))
        })
        .collect()
}

/// Pairs uploaded files with the form's file fields. The first upload for
/// a field wins.
fn form_files(form: &Form, mut files: Vec<FilePart>) -> Vec<(FieldId, FileUpload)> {
    form.fields
        .iter()
        .filter(|field| field.field_type == FieldType::File)
        .filter_map(|field| {
            let index = files.iter().position(|f| f.name == field.id.as_str())?;
            let part = files.swap_remove(index);
            let upload = FileUpload::new(part.filename, part.content_type, part.bytes);
            Some((field.id.clone(), upload))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use oxide_forms::{FieldUpdate, FormDraft};

    use super::*;

    #[test]
    fn test_form_values_from_pairs() {
        let mut draft = FormDraft::new();
        let name = draft.add_field(FieldType::Text, None);
        let food = draft.add_field(FieldType::Checkbox, None);
        let upload = draft.add_field(FieldType::File, None);
        let note = draft.add_field(FieldType::Textarea, None);
        draft.update_field(&food, FieldUpdate::new().options(["A", "B"]));
        let form = Form::from_draft(FormId::new("f"), draft, Utc::now());

        let pairs = vec![
            (name.to_string(), "Ada".to_string()),
            (food.to_string(), "A".to_string()),
            (food.to_string(), "B".to_string()),
            (upload.to_string(), "x.png".to_string()),
            ("ghost".to_string(), "boo".to_string()),
        ];
        let values = form_values(&form, &pairs);

        assert_eq!(
            values,
            vec![
                (name, FieldValue::text("Ada")),
                (food, FieldValue::choices(["A", "B"])),
            ]
        );
        assert!(!values.iter().any(|(id, _)| id == &note));
    }

    #[test]
    fn test_form_files_match_file_fields() {
        let mut draft = FormDraft::new();
        let name = draft.add_field(FieldType::Text, None);
        let upload = draft.add_field(FieldType::File, None);
        let form = Form::from_draft(FormId::new("f"), draft, Utc::now());

        let part = |field: &FieldId, filename: &str| FilePart {
            name: field.to_string(),
            filename: filename.to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hi".to_vec(),
        };
        let files = vec![part(&name, "stray.txt"), part(&upload, "cv.txt")];
        let matched = form_files(&form, files);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0, upload);
        assert_eq!(matched[0].1.filename, "cv.txt");
    }

    #[tokio::test]
    async fn test_form_response_carries_public_url() {
        let app = App::new(SiteConfig::default()).unwrap();
        let form = app.store().create_form(FormDraft::new()).await.unwrap();
        let res = app.form_response(form.clone());
        let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(
            body["publicUrl"],
            format!("http://localhost:3000/form/{}", form.id)
        );
        assert_eq!(body["id"], form.id.as_str());
        assert_eq!(body["settings"]["title"], "Untitled Form");
    }
}
