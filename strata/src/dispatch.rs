//! # Two-phase dispatch
//!
//! A reply is processed in two steps:
//!
//! 1. **Render**: the inner template is executed against the context and its
//!    output is captured into the context buffer.
//! 2. **Finalize**: the definitive status, headers and body are written to the
//!    [`Output`]. Layouts read the captured buffer back as `{{CONTENT}}`.
//!
//! | Response   | Render              | Finalize                                   |
//! |------------|---------------------|--------------------------------------------|
//! | `Null`     | no-op               | no-op                                      |
//! | `Render`   | capture `template`  | `layout` into the body, `200 OK`           |
//! | `NotFound` | capture `template`  | `layout` into the body, `404 Not Found`    |
//! | `Redirect` | no-op               | `Location`, `302 Found`, empty body        |
//! | unknown    | no-op               | [`IntegrityViolation::UnknownResponse`]    |
//!
//! Headers the actions staged on the context are merged into the output
//! before the reply's own headers are applied, so `Location` always wins.
//! Layout bodies default to `text/html; charset=utf-8` unless an action
//! staged a `Content-Type`.

use crate::output::Output;
use http::{HeaderValue, StatusCode, header::CONTENT_TYPE};
use std::io::Write as _;
use strata_core::{
    BoxContext, Context, IntegrityViolation, Reply, Response, StrataError, TemplateStore,
};
use tracing::trace;

/// Capture the inner template of `reply` into the context buffer.
///
/// Replies without an inner template, including unknown payloads, leave the
/// context untouched.
pub fn render_step(
    templates: Option<&dyn TemplateStore>,
    context: &mut BoxContext,
    reply: &Reply,
) -> Result<(), StrataError> {
    let Some(template) = reply.response().and_then(Response::template) else {
        return Ok(());
    };
    let store = templates.ok_or(IntegrityViolation::NoTemplateStore)?;

    // Rendered in full before the context is touched.
    let rendered = store.render(template, &*context)?;
    trace!(template, bytes = rendered.len(), "captured inner template");
    Context::write(&mut **context, &rendered);
    Ok(())
}

/// Write the client-visible result of `reply` into `output`.
///
/// On error `output` is left exactly as it was.
pub fn finalize_step(
    templates: Option<&dyn TemplateStore>,
    context: &BoxContext,
    reply: &Reply,
    output: &mut Output,
) -> Result<(), StrataError> {
    let response = reply
        .response()
        .ok_or(IntegrityViolation::UnknownResponse {
            type_name: reply.type_name(),
        })?;

    match response {
        Response::Null => {
            merge_headers(context, output);
            Ok(())
        }
        Response::Redirect { path } => {
            let location = HeaderValue::from_str(path)
                .map_err(|_| IntegrityViolation::InvalidRedirect(path.clone()))?;
            merge_headers(context, output);
            output.redirect(location);
            Ok(())
        }
        Response::Render { layout, .. } => {
            write_layout(templates, context, layout, StatusCode::OK, output)
        }
        Response::NotFound { layout, .. } => {
            write_layout(templates, context, layout, StatusCode::NOT_FOUND, output)
        }
    }
}

fn write_layout(
    templates: Option<&dyn TemplateStore>,
    context: &BoxContext,
    layout: &str,
    status: StatusCode,
    output: &mut Output,
) -> Result<(), StrataError> {
    let store = templates.ok_or(IntegrityViolation::NoTemplateStore)?;

    let mut staged = Vec::new();
    store.execute(layout, &mut staged, context)?;

    merge_headers(context, output);
    output
        .headers_mut()
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(HTML_CONTENT_TYPE));
    output.set_status(status);
    output.write_all(&staged).map_err(strata_core::TemplateError::from)?;
    trace!(layout, %status, bytes = staged.len(), "wrote layout");
    Ok(())
}

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn merge_headers(context: &BoxContext, output: &mut Output) {
    if let Some(staged) = context.response_headers() {
        output.headers_mut().extend(staged.clone());
    }
}
