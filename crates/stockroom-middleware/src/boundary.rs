//! Asynchronous stages and the error boundary that contains their failures.
//!
//! An async stage may fail in ways the chain cannot see directly: a lookup
//! against the persistence collaborator times out, a write is rejected, and
//! so on. [`Stage`] models such a stage as a future resolving to
//! `Result<Output, Error>`. [`ErrorBoundary`] adapts a `Stage` into a
//! [`Middleware`]: a successful result becomes the stage's [`Outcome`] and a
//! failure becomes [`Outcome::Fail`], so the chain always observes an outcome.
//!
//! The boundary does not reclassify failures. An error keeps whatever
//! category its `Into<ApiError>` conversion gives it.

use crate::context::Locals;
use crate::middleware::{BoxFuture, Middleware, Outcome};
use stockroom_core::{ApiError, RequestContext};

/// A fallible asynchronous stage.
pub trait Stage: Send + Sync + 'static {
    /// The success value, converted into the stage's outcome.
    type Output: Into<Outcome> + Send;

    /// The failure value, converted into an error signal.
    type Error: Into<ApiError> + Send;

    /// Returns the name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Runs the stage against one request.
    fn run<'a>(
        &'a self,
        ctx: &'a RequestContext,
        locals: &'a mut Locals,
    ) -> BoxFuture<'a, Result<Self::Output, Self::Error>>;
}

/// Adapts a [`Stage`] into a [`Middleware`], turning failures into
/// [`Outcome::Fail`].
///
/// # Example
///
/// ```
/// use stockroom_core::{ApiError, RequestContext};
/// use stockroom_middleware::{ErrorBoundary, FnStage, Locals, Middleware, Outcome};
/// use http::Method;
///
/// # tokio_test::block_on(async {
/// let stage = ErrorBoundary::new(FnStage::new("lookup", |_ctx, _locals| {
///     Box::pin(async { Err(ApiError::internal("connection refused")) })
/// }));
///
/// let ctx = RequestContext::new(Method::GET, "/suppliers/1");
/// let mut locals = Locals::new();
/// let outcome = stage.handle(&ctx, &mut locals).await;
/// assert!(matches!(outcome, Outcome::Fail(_)));
/// # });
/// ```
pub struct ErrorBoundary<S> {
    inner: S,
}

impl<S: Stage> ErrorBoundary<S> {
    /// Wraps a stage.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped stage.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Stage> Middleware for ErrorBoundary<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        locals: &'a mut Locals,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            match self.inner.run(ctx, locals).await {
                Ok(output) => output.into(),
                Err(error) => Outcome::Fail(error.into()),
            }
        })
    }
}

/// An asynchronous stage built from a closure returning a boxed future.
///
/// The closure receives the request context and shared state and resolves
/// to `Result<Outcome, ApiError>`. Collaborator errors propagate with `?`
/// through their `From` conversion into [`ApiError`].
pub struct FnStage<F> {
    name: &'static str,
    func: F,
}

impl<F> FnStage<F> {
    /// Creates a new closure-based stage.
    pub const fn new(name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a RequestContext, &'a mut Locals) -> BoxFuture<'a, Result<Outcome, ApiError>>
            + Send
            + Sync
            + 'static,
    {
        Self { name, func }
    }
}

impl<F> Stage for FnStage<F>
where
    F: for<'a> Fn(&'a RequestContext, &'a mut Locals) -> BoxFuture<'a, Result<Outcome, ApiError>>
        + Send
        + Sync
        + 'static,
{
    type Output = Outcome;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        self.name
    }

    fn run<'a>(
        &'a self,
        ctx: &'a RequestContext,
        locals: &'a mut Locals,
    ) -> BoxFuture<'a, Result<Outcome, ApiError>> {
        (self.func)(ctx, locals)
    }
}
