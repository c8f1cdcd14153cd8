//! Conditional Action - Execute actions based on the request context.

use strata_core::{Action, BoxContext, Context, Step};

/// An action that conditionally executes an inner action.
///
/// The inner action only runs if the condition returns `true`. Otherwise the
/// context is passed through unchanged.
///
/// # Example
///
/// ```rust,ignore
/// // Only secure requests may see the account page
/// let guard = ConditionalAction::new(
///     |ctx: &dyn Context| !ctx.is::<SecureContext>(),
///     redirect("/login"),
/// );
/// ```
pub struct ConditionalAction<C, A> {
    condition: C,
    inner: A,
}

impl<C, A> ConditionalAction<C, A> {
    /// Create a new `ConditionalAction`.
    pub fn new(condition: C, inner: A) -> Self {
        Self { condition, inner }
    }
}

impl<C, A> Action for ConditionalAction<C, A>
where
    C: Fn(&dyn Context) -> bool + Send + Sync + 'static,
    A: Action,
{
    async fn apply(&self, context: BoxContext) -> Step {
        if (self.condition)(&*context) {
            self.inner.apply(context).await
        } else {
            Step::next(context)
        }
    }
}

/// An action that executes one of two inner actions based on a condition.
pub struct BranchAction<C, T, E> {
    condition: C,
    then_action: T,
    else_action: E,
}

impl<C, T, E> BranchAction<C, T, E> {
    /// Create a new `BranchAction`.
    pub fn new(condition: C, then_action: T, else_action: E) -> Self {
        Self {
            condition,
            then_action,
            else_action,
        }
    }
}

impl<C, T, E> Action for BranchAction<C, T, E>
where
    C: Fn(&dyn Context) -> bool + Send + Sync + 'static,
    T: Action,
    E: Action,
{
    async fn apply(&self, context: BoxContext) -> Step {
        if (self.condition)(&*context) {
            self.then_action.apply(context).await
        } else {
            self.else_action.apply(context).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{redirect, render};
    use strata_core::{BaseContext, Exchange, Reply, Response};

    fn context(path: &str) -> BoxContext {
        BaseContext::new(Exchange::get(path)).boxed()
    }

    fn is_admin(ctx: &dyn Context) -> bool {
        ctx.exchange().is_some_and(|e| e.path().starts_with("/admin"))
    }

    #[tokio::test]
    async fn test_conditional_action() {
        let action = ConditionalAction::new(is_admin, redirect("/login"));

        let step = action.apply(context("/admin/users")).await;
        assert!(step.is_final());

        let step = action.apply(context("/home")).await;
        assert!(!step.is_final());
    }

    #[tokio::test]
    async fn test_branch_action() {
        let action = BranchAction::new(is_admin, redirect("/login"), render("home", "layout"));

        let step = action.apply(context("/admin")).await;
        assert_eq!(
            step.reply.as_ref().and_then(Reply::response),
            Some(&Response::redirect("/login"))
        );

        let step = action.apply(context("/")).await;
        assert_eq!(
            step.reply.as_ref().and_then(Reply::response),
            Some(&Response::render("home", "layout"))
        );
    }
}
