//! Bootstrap 5 rendering of fields, public forms and the builder canvas.

use std::collections::HashMap;

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::{Div, Li, Ul};

use crate::catalog::{FieldType, PALETTE};
use crate::error::ValidationErrors;
use crate::field::Field;
use crate::ids::FieldId;
use crate::value::FieldValue;
use crate::widgets::{widget_for, WidgetAttrs};

/// Hint shown on a canvas without fields.
pub const EMPTY_CANVAS_HINT: &str = "Drag fields from the sidebar to build your form";

/// Renders a labelled, editable field.
pub fn render_field(field: &Field, value: Option<&FieldValue>, error: Option<&str>) -> String {
    render_labelled(field, value, error, WidgetAttrs::new())
}

/// Renders the read-only preview of a field, as shown in the builder.
pub fn render_preview(field: &Field) -> String {
    render_labelled(
        field,
        None,
        None,
        WidgetAttrs::new().with("disabled", "disabled"),
    )
}

fn render_labelled(
    field: &Field,
    value: Option<&FieldValue>,
    error: Option<&str>,
    mut attrs: WidgetAttrs,
) -> String {
    let name = field.id.as_str();
    let id = format!("id_{name}");

    let required_marker = if field.required { " *" } else { "" };
    let label_text = format!("{}{}", field.label, required_marker);

    attrs.set("id", &id);
    if error.is_some() {
        attrs.set("class", "is-invalid");
    }
    // A checkbox group must not demand every box.
    if field.required && !field.field_type.capabilities().is_multi_value {
        attrs.set("required", "required");
    }

    let widget_html = widget_for(field).render(name, value, &attrs);

    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    html! { div.class("mb-3") }
        .attr("data-field-type", field.field_type.as_str())
        .raw(label_el.render())
        .raw(&widget_html)
        .when(error.is_some(), |d| {
            d.child::<Div, _>(|e| {
                e.class("invalid-feedback d-block")
                    .text(error.unwrap_or_default())
            })
        })
        .render()
}

/// Renders a complete public form posting to `action`.
pub fn render_form(
    fields: &[Field],
    values: &HashMap<FieldId, FieldValue>,
    errors: &ValidationErrors,
    action: &str,
) -> String {
    let method = "post";
    let mut form = html! {
        form.action(#action).method(#method)
    }
    .attr("novalidate", "novalidate");
    if fields.iter().any(|f| f.field_type == FieldType::File) {
        form = form.attr("enctype", "multipart/form-data");
    }

    if !errors.is_empty() {
        form = form.child::<Div, _>(|d| {
            d.class("alert alert-danger")
                .attr("role", "alert")
                .text("Please correct the errors below.")
        });
    }

    for field in fields {
        let field_html = render_field(field, values.get(&field.id), errors.get(&field.id));
        form = form.raw(&field_html);
    }

    form = form.child::<Div, _>(|d| {
        let btn = html! {
            button.type_("submit").class("btn btn-primary") {
                "Submit"
            }
        };
        d.raw(btn.render())
    });

    form.render()
}

/// Renders the builder canvas: one draggable card per field, in order.
pub fn render_canvas(fields: &[Field], selected: Option<&FieldId>) -> String {
    if fields.is_empty() {
        return Element::<Div>::new()
            .class("canvas canvas-empty text-center text-muted border rounded p-5")
            .attr("data-drop-target", "canvas")
            .text(EMPTY_CANVAS_HINT)
            .render();
    }

    Element::<Div>::new()
        .class("canvas")
        .attr("data-drop-target", "canvas")
        .children(fields.iter().enumerate(), |(index, field), card: Element<Div>| {
            let class = if selected == Some(&field.id) {
                "card field-card mb-2 border-primary selected"
            } else {
                "card field-card mb-2"
            };
            card.class(class)
                .attr("draggable", "true")
                .attr("data-field-id", field.id.as_str())
                .attr("data-field-index", index.to_string())
                .child::<Div, _>(|body| body.class("card-body").raw(render_preview(field)))
        })
        .render()
}

/// Renders the palette of field types that can be dragged onto the canvas.
pub fn render_palette() -> String {
    Element::<Ul>::new()
        .class("list-group palette")
        .children(PALETTE.iter(), |field_type, li: Element<Li>| {
            li.class("list-group-item palette-item")
                .attr("draggable", "true")
                .attr("data-field-type", field_type.as_str())
                .text(field_type.label())
        })
        .render()
}
