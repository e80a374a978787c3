//! Page templates for the public form pages.

use ironhtml::typed::{Document, Element};
use ironhtml_elements::{Body, Div, Head, Html, Link, Main, Meta, Script, Style, Title, H1, P};
use oxide_forms::PublicFormSession;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js";

const CSS: &str = "\
body { background-color: #f8f9fa; }\n\
.form-shell { max-width: 720px; }\n\
.form-shell .card { border: 0; }\n\
.img-thumbnail { max-height: 160px; }";

/// Renders the page shell around `content`.
pub fn layout(title: &str, content: &str) -> String {
    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport")
                                .attr("content", "width=device-width, initial-scale=1.0")
                        })
                        .child::<Title, _>(|t| t.text(title))
                        .child::<Link, _>(|l| {
                            l.attr("href", BOOTSTRAP_CSS).attr("rel", "stylesheet")
                        })
                        .child::<Style, _>(|s| s.raw(CSS))
                })
                .child::<Body, _>(|body| {
                    body.child::<Main, _>(|m| {
                        m.class("container form-shell py-5").raw(content)
                    })
                    .child::<Script, _>(|s| s.attr("src", BOOTSTRAP_JS))
                })
        })
        .build()
}

/// Renders a published form for a respondent. After a successful
/// submission the thank-you message takes the place of the form.
pub fn form_page(session: &PublicFormSession, action: &str, notice: Option<&str>) -> String {
    let settings = &session.form().settings;
    let card = Element::<Div>::new()
        .class("card shadow-sm")
        .child::<Div, _>(|body| {
            body.class("card-body p-4")
                .child::<H1, _>(|h| h.class("h3 mb-2").text(&settings.title))
                .when(!settings.description.is_empty(), |d| {
                    d.child::<P, _>(|p| p.class("text-muted mb-4").text(&settings.description))
                })
                .when(notice.is_some(), |d| {
                    d.child::<Div, _>(|alert| {
                        alert
                            .class("alert alert-danger")
                            .attr("role", "alert")
                            .text(notice.unwrap_or_default())
                    })
                })
                .raw(session.render(action))
        });
    layout(&settings.title, &card.render())
}

/// Renders the page shown for unknown and unpublished forms.
pub fn unavailable_page() -> String {
    let content = Element::<Div>::new()
        .class("card shadow-sm text-center")
        .child::<Div, _>(|body| {
            body.class("card-body p-5")
                .child::<H1, _>(|h| h.class("h3 mb-3").text("Form Not Available"))
                .child::<P, _>(|p| {
                    p.class("text-muted mb-0").text(
                        "This form is not currently accepting submissions or does not exist.",
                    )
                })
        });
    layout("Form Not Available", &content.render())
}
