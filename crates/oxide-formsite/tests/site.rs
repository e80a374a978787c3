//! Drives the site through its request handler, covering the JSON API and
//! the public form pages.

use oxide_forms::{BuilderCommand, FieldType, FieldUpdate, FormDraft, FormEditor, SettingsUpdate};
use oxide_formsite::{App, Request, Response, SiteConfig};
use serde_json::{json, Value};

fn app() -> App {
    App::new(SiteConfig::default()).unwrap()
}

fn body(res: &Response) -> Value {
    serde_json::from_slice(&res.body).unwrap()
}

fn html(res: &Response) -> String {
    res.body_string().unwrap()
}

/// A draft with a required name, an email and a checkbox group.
fn contact_draft() -> (FormDraft, [String; 3]) {
    let mut editor = FormEditor::new();
    editor.apply(BuilderCommand::UpdateSettings(
        SettingsUpdate::new()
            .title("Contact us")
            .thank_you_message("Thanks, we will be in touch."),
    ));
    let mut draft = editor.into_draft();
    let name = draft.add_field(FieldType::Text, None);
    let email = draft.add_field(FieldType::Email, None);
    let topics = draft.add_field(FieldType::Checkbox, None);
    draft.update_field(&name, FieldUpdate::new().label("Name").required(true));
    draft.update_field(&email, FieldUpdate::new().label("Email"));
    draft.update_field(
        &topics,
        FieldUpdate::new().label("Topics").options(["Sales", "Support"]),
    );
    (draft, [name.to_string(), email.to_string(), topics.to_string()])
}

async fn publish<T: serde::Serialize>(app: &App, draft: &T) -> String {
    let res = app.handle(Request::post("/api/forms").json_body(draft)).await;
    assert_eq!(res.status, 201);
    let id = body(&res)["id"].as_str().unwrap().to_string();

    let res = app
        .handle(Request::post(format!("/api/forms/{id}/publish")))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res)["status"], "published");
    id
}

async fn create_published(app: &App) -> (String, [String; 3]) {
    let (draft, ids) = contact_draft();
    (publish(app, &draft).await, ids)
}

/// Builds a `multipart/form-data` POST. A part with a filename is sent as
/// a `text/plain` file.
fn multipart(path: impl Into<String>, parts: &[(&str, Option<&str>, &str)]) -> Request {
    let mut body = String::new();
    for (name, filename, value) in parts {
        body.push_str("--boundary42\r\n");
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: text/plain\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str("--boundary42--\r\n");
    Request::post(path)
        .header("Content-Type", "multipart/form-data; boundary=boundary42")
        .body(body)
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let app = app();
    let res = app.handle(Request::get("/api/health")).await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({ "status": "ok" }));

    assert_eq!(app.handle(Request::get("/nope")).await.status, 404);
    assert_eq!(app.handle(Request::put("/api/health")).await.status, 405);
}

#[tokio::test]
async fn test_form_crud() {
    let app = app();
    let (draft, _) = contact_draft();
    let res = app.handle(Request::post("/api/forms").json_body(&draft)).await;
    let created = body(&res);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "draft");
    assert_eq!(
        created["publicUrl"],
        format!("http://localhost:3000/form/{id}")
    );
    assert!(created["createdAt"].is_string());

    let mut update = draft.clone();
    update.update_settings(SettingsUpdate::new().title("Renamed"));
    let res = app
        .handle(Request::put(format!("/api/forms/{id}")).json_body(&update))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res)["settings"]["title"], "Renamed");

    let res = app.handle(Request::get("/api/forms")).await;
    let list = body(&res);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["submissionCount"], 0);

    let res = app.handle(Request::delete(format!("/api/forms/{id}"))).await;
    assert_eq!(res.status, 204);
    let res = app.handle(Request::get(format!("/api/forms/{id}"))).await;
    assert_eq!(res.status, 404);
    assert_eq!(body(&res)["message"], format!("Form {id} not found"));
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_bad_json() {
    let app = app();
    let res = app
        .handle(Request::post("/api/forms").json_body(&json!({ "settings": { "title": " " } })))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(body(&res)["message"], "Form title is required");

    let res = app
        .handle(Request::post("/api/forms").body("{not json"))
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn test_api_submission_flow_and_export() {
    let app = app();
    let (id, [name, email, topics]) = create_published(&app).await;

    let res = app
        .handle(
            Request::post(format!("/api/forms/{id}/submit")).json_body(&json!({
                "data": { email.as_str(): "not-an-email" }
            })),
        )
        .await;
    assert_eq!(res.status, 422);
    let errors = body(&res)["errors"].clone();
    assert_eq!(errors[name.as_str()], "Name is required");
    assert_eq!(errors[email.as_str()], "Please enter a valid email address");

    let res = app
        .handle(
            Request::post(format!("/api/forms/{id}/submit")).json_body(&json!({
                "data": {
                    name.as_str(): "Ada",
                    topics.as_str(): ["Support", "Sales"],
                }
            })),
        )
        .await;
    assert_eq!(res.status, 201);
    let submission = body(&res);
    let submission_id = submission["id"].as_str().unwrap().to_string();
    assert_eq!(submission["data"][topics.as_str()], json!(["Sales", "Support"]));

    let res = app
        .handle(Request::get(format!("/api/forms/{id}/stats")))
        .await;
    assert_eq!(body(&res)["totalSubmissions"], 1);

    let res = app
        .handle(Request::get(format!("/api/forms/{id}/export")))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.get_header("Content-Disposition"),
        Some("attachment; filename=\"Contact_us_submissions.csv\"")
    );
    let csv = html(&res);
    assert!(csv.starts_with(r#""Submission ID","Submitted At","Name","Email","Topics""#));
    assert!(csv.ends_with(r#""Ada","","Sales; Support""#));

    let res = app
        .handle(Request::get(format!("/api/submissions/{submission_id}")))
        .await;
    assert_eq!(res.status, 200);
    let res = app
        .handle(Request::delete(format!("/api/submissions/{submission_id}")))
        .await;
    assert_eq!(res.status, 204);
    let res = app
        .handle(Request::get(format!("/api/forms/{id}/submissions")))
        .await;
    assert_eq!(body(&res), json!([]));
}

#[tokio::test]
async fn test_draft_forms_refuse_submissions() {
    let app = app();
    let (id, _) = create_published(&app).await;
    app.handle(Request::post(format!("/api/forms/{id}/unpublish")))
        .await;

    let res = app
        .handle(Request::post(format!("/api/forms/{id}/submit")).json_body(&json!({ "data": {} })))
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(
        body(&res)["message"],
        "This form is not currently accepting submissions"
    );

    let res = app.handle(Request::get(format!("/api/public/forms/{id}"))).await;
    assert_eq!(res.status, 404);
    let res = app.handle(Request::get(format!("/form/{id}"))).await;
    assert_eq!(res.status, 404);
    assert!(html(&res).contains("Form Not Available"));
}

#[tokio::test]
async fn test_duplicate_form() {
    let app = app();
    let (id, _) = create_published(&app).await;
    let res = app
        .handle(Request::post(format!("/api/forms/{id}/duplicate")))
        .await;
    assert_eq!(res.status, 201);
    let copy = body(&res);
    assert_ne!(copy["id"], json!(id));
    assert_eq!(copy["settings"]["title"], "Contact us (Copy)");
    assert_eq!(copy["status"], "draft");
}

#[tokio::test]
async fn test_public_html_form_round_trip() {
    let app = app();
    let (id, [name, _, topics]) = create_published(&app).await;

    let res = app.handle(Request::get(format!("/api/public/forms/{id}"))).await;
    assert_eq!(res.status, 200);

    let res = app.handle(Request::get(format!("/form/{id}"))).await;
    assert_eq!(res.status, 200);
    let page = html(&res);
    assert!(page.contains("Contact us"));
    assert!(page.contains(&format!(r#"name="{name}""#)));

    let res = app
        .handle(
            Request::post(format!("/form/{id}"))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(format!("{name}=")),
        )
        .await;
    assert_eq!(res.status, 422);
    assert!(html(&res).contains("Name is required"));

    let res = app
        .handle(
            Request::post(format!("/form/{id}"))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(format!("{name}=Ada+Lovelace&{topics}=Support")),
        )
        .await;
    assert_eq!(res.status, 200);
    let page = html(&res);
    assert!(page.contains("Thanks, we will be in touch."));
    assert!(!page.contains("<form"));

    let res = app
        .handle(Request::get(format!("/api/forms/{id}/submissions")))
        .await;
    let list = body(&res);
    assert_eq!(list[0]["data"][name.as_str()], "Ada Lovelace");
    assert_eq!(list[0]["data"][topics.as_str()], json!(["Support"]));
}

#[tokio::test]
async fn test_submission_limit_over_http() {
    let app = app();
    let (draft, [name, _, _]) = contact_draft();
    let mut draft = draft;
    draft.update_settings(SettingsUpdate::new().submission_limit(1));
    let res = app.handle(Request::post("/api/forms").json_body(&draft)).await;
    let id = body(&res)["id"].as_str().unwrap().to_string();
    app.handle(Request::post(format!("/api/forms/{id}/publish")))
        .await;

    let submit = || {
        Request::post(format!("/api/forms/{id}/submit"))
            .json_body(&json!({ "data": { name.as_str(): "Ada" } }))
    };
    assert_eq!(app.handle(submit()).await.status, 201);
    let res = app.handle(submit()).await;
    assert_eq!(res.status, 409);
    assert_eq!(
        body(&res)["message"],
        "This form has reached its submission limit"
    );

    let res = app
        .handle(
            Request::post(format!("/form/{id}")).body(format!("{name}=Grace")),
        )
        .await;
    assert_eq!(res.status, 409);
    assert!(html(&res).contains("This form has reached its submission limit"));
}

#[tokio::test]
async fn test_hostile_field_id_is_not_rendered_raw() {
    let app = app();
    let hostile = r#"x"><script>alert(1)</script>"#;
    let draft = json!({
        "settings": { "title": "Survey" },
        "fields": [{ "id": hostile, "type": "text", "label": "Name" }]
    });
    let id = publish(&app, &draft).await;

    let res = app.handle(Request::get(format!("/api/forms/{id}"))).await;
    let field_id = body(&res)["fields"][0]["id"].as_str().unwrap().to_string();
    assert_ne!(field_id, hostile);

    let res = app.handle(Request::get(format!("/form/{id}"))).await;
    assert_eq!(res.status, 200);
    let page = html(&res);
    assert!(!page.contains("<script>alert(1)</script>"));
    assert!(page.contains(&format!(r#"name="{field_id}""#)));
}

#[tokio::test]
async fn test_public_form_accepts_required_file() {
    let app = app();
    let mut draft = FormDraft::new();
    draft.update_settings(SettingsUpdate::new().title("Apply"));
    let note = draft.add_field(FieldType::Text, None);
    let cv = draft.add_field(FieldType::File, None);
    draft.update_field(&cv, FieldUpdate::new().label("CV").required(true));
    let id = publish(&app, &draft).await;

    let res = app.handle(Request::get(format!("/form/{id}"))).await;
    assert!(html(&res).contains(r#"enctype="multipart/form-data""#));

    let res = app
        .handle(multipart(
            format!("/form/{id}"),
            &[(note.as_str(), None, "hello"), (cv.as_str(), Some(""), "")],
        ))
        .await;
    assert_eq!(res.status, 422);
    assert!(html(&res).contains("CV is required"));

    let res = app
        .handle(multipart(
            format!("/form/{id}"),
            &[(note.as_str(), None, "hello"), (cv.as_str(), Some("cv.txt"), "hi")],
        ))
        .await;
    assert_eq!(res.status, 200);

    let res = app
        .handle(Request::get(format!("/api/forms/{id}/submissions")))
        .await;
    let list = body(&res);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["data"][note.as_str()], "hello");
    assert_eq!(list[0]["data"][cv.as_str()]["filename"], "cv.txt");
    assert_eq!(
        list[0]["data"][cv.as_str()]["inlineDataPreview"],
        "data:text/plain;base64,aGk="
    );
}
