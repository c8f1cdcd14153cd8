//! Response model.
//!
//! [`Response`] is the closed set of outcomes the dispatcher knows how to
//! render and finalize. Actions hand back a [`Reply`], a type-erased payload;
//! the dispatcher probes it for a `Response` and treats anything else as an
//! unknown response variant.

use http::StatusCode;
use std::any::Any;

/// The outcome of a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing to render or send. Status is left untouched.
    Null,
    /// Render `template` into the context, then `layout` into the output.
    Render {
        /// Inner template, captured into the context buffer.
        template: String,
        /// Outer template, written to the client.
        layout: String,
    },
    /// Redirect the client to `path` with `302 Found`.
    Redirect {
        /// Target location.
        path: String,
    },
    /// Like [`Response::Render`], with a `404 Not Found` status.
    NotFound {
        /// Inner template, captured into the context buffer.
        template: String,
        /// Outer template, written to the client.
        layout: String,
    },
}

impl Response {
    /// A [`Response::Render`].
    pub fn render(template: impl Into<String>, layout: impl Into<String>) -> Self {
        Response::Render {
            template: template.into(),
            layout: layout.into(),
        }
    }

    /// A [`Response::NotFound`].
    pub fn not_found(template: impl Into<String>, layout: impl Into<String>) -> Self {
        Response::NotFound {
            template: template.into(),
            layout: layout.into(),
        }
    }

    /// A [`Response::Redirect`].
    pub fn redirect(path: impl Into<String>) -> Self {
        Response::Redirect { path: path.into() }
    }

    /// The status this response sets, or `None` when it leaves it alone.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Response::Null => None,
            Response::Render { .. } => Some(StatusCode::OK),
            Response::Redirect { .. } => Some(StatusCode::FOUND),
            Response::NotFound { .. } => Some(StatusCode::NOT_FOUND),
        }
    }

    /// A stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Null => "null",
            Response::Render { .. } => "render",
            Response::Redirect { .. } => "redirect",
            Response::NotFound { .. } => "not_found",
        }
    }

    /// The inner template captured during the render step, if any.
    pub fn template(&self) -> Option<&str> {
        match self {
            Response::Render { template, .. } | Response::NotFound { template, .. } => {
                Some(template)
            }
            Response::Null | Response::Redirect { .. } => None,
        }
    }

    /// The layout written during the finalize step, if any.
    pub fn layout(&self) -> Option<&str> {
        match self {
            Response::Render { layout, .. } | Response::NotFound { layout, .. } => Some(layout),
            Response::Null | Response::Redirect { .. } => None,
        }
    }
}

/// A type-erased response payload produced by an action.
pub struct Reply {
    payload: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Reply {
    /// Wrap any payload. Only a [`Response`] payload can be dispatched.
    pub fn new<R: Any + Send>(payload: R) -> Self {
        Self {
            payload: Box::new(payload),
            type_name: std::any::type_name::<R>(),
        }
    }

    /// The payload as a known response, if it is one.
    pub fn response(&self) -> Option<&Response> {
        self.payload.downcast_ref::<Response>()
    }

    /// Take the known response out of the reply, or give the reply back.
    pub fn into_response(self) -> Result<Response, Self> {
        let type_name = self.type_name;
        self.payload
            .downcast::<Response>()
            .map(|response| *response)
            .map_err(|payload| Self { payload, type_name })
    }

    /// Type name of the payload.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Log label: the response kind, or the payload type for unknown replies.
    pub fn kind(&self) -> &'static str {
        self.response().map_or(self.type_name, Response::kind)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::new(response)
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.response() {
            Some(response) => f.debug_tuple("Reply").field(response).finish(),
            None => f
                .debug_struct("Reply")
                .field("unknown", &self.type_name)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Teapot;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Response::Null.status(), None);
        assert_eq!(Response::render("a", "b").status(), Some(StatusCode::OK));
        assert_eq!(Response::redirect("/x").status(), Some(StatusCode::FOUND));
        assert_eq!(
            Response::not_found("a", "b").status(),
            Some(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn test_reply_probe() {
        let reply = Reply::from(Response::redirect("/derp"));
        assert_eq!(reply.response(), Some(&Response::redirect("/derp")));
        assert_eq!(reply.kind(), "redirect");
        assert_eq!(reply.into_response().unwrap(), Response::redirect("/derp"));
    }

    #[test]
    fn test_unknown_reply() {
        let reply = Reply::new(Teapot);
        assert!(reply.response().is_none());
        assert!(reply.type_name().ends_with("Teapot"));
        let reply = reply.into_response().unwrap_err();
        assert!(reply.kind().ends_with("Teapot"));
    }

    #[test]
    fn test_template_accessors() {
        let response = Response::not_found("inner", "layout");
        assert_eq!(response.template(), Some("inner"));
        assert_eq!(response.layout(), Some("layout"));
        assert_eq!(Response::redirect("/").template(), None);
    }
}
