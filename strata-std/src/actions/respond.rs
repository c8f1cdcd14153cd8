//! Actions that always reply.

use strata_core::{Action, BoxContext, Reply, Response, Step};

/// An action that ends the chain with a fixed response.
///
/// # Example
///
/// ```rust,ignore
/// let home = base.copy().with_action(render("home", "layout"));
/// ```
#[derive(Debug, Clone)]
pub struct Respond {
    response: Response,
}

impl Respond {
    /// Create an action replying with `response`.
    pub fn new(response: Response) -> Self {
        Self { response }
    }

    /// The response this action replies with.
    pub fn response(&self) -> &Response {
        &self.response
    }
}

impl Action for Respond {
    async fn apply(&self, context: BoxContext) -> Step {
        Step::respond(context, Reply::from(self.response.clone()))
    }
}

/// Reply with `response`.
pub fn respond(response: Response) -> Respond {
    Respond::new(response)
}

/// Reply with [`Response::Render`].
pub fn render(template: impl Into<String>, layout: impl Into<String>) -> Respond {
    Respond::new(Response::render(template, layout))
}

/// Reply with [`Response::NotFound`].
pub fn not_found(template: impl Into<String>, layout: impl Into<String>) -> Respond {
    Respond::new(Response::not_found(template, layout))
}

/// Reply with [`Response::Redirect`].
pub fn redirect(path: impl Into<String>) -> Respond {
    Respond::new(Response::redirect(path))
}
