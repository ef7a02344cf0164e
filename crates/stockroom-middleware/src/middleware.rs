//! Core middleware trait and stage outcomes.
//!
//! A [`Middleware`] is one stage of a [`Chain`](crate::Chain). It reads the
//! immutable [`RequestContext`], may record resolved entities in the
//! per-request [`Locals`], and reports an [`Outcome`] telling the chain what
//! to do next.
//!
//! # Example
//!
//! ```
//! use stockroom_core::{ApiError, RequestContext};
//! use stockroom_middleware::{BoxFuture, Locals, Middleware, Outcome};
//!
//! struct RequireBody;
//!
//! impl Middleware for RequireBody {
//!     fn name(&self) -> &'static str {
//!         "require_body"
//!     }
//!
//!     fn handle<'a>(
//!         &'a self,
//!         ctx: &'a RequestContext,
//!         _locals: &'a mut Locals,
//!     ) -> BoxFuture<'a, Outcome> {
//!         let outcome = if ctx.body().is_null() {
//!             Outcome::Fail(ApiError::validation("request body is required"))
//!         } else {
//!             Outcome::Continue
//!         };
//!         Box::pin(async move { outcome })
//!     }
//! }
//! ```

use crate::context::Locals;
use crate::types::Response;
use std::future::Future;
use std::pin::Pin;
use stockroom_core::{ApiError, RequestContext};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a stage tells the chain after it finishes.
#[derive(Debug)]
pub enum Outcome {
    /// Run the next stage.
    Continue,
    /// Abort the chain; only error rendering sees the signal.
    Fail(ApiError),
    /// Finish the chain with this response.
    Responded(Response),
}

impl Outcome {
    /// Returns true for [`Outcome::Continue`].
    #[must_use]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Responded(response)
    }
}

impl From<ApiError> for Outcome {
    fn from(error: ApiError) -> Self {
        Self::Fail(error)
    }
}

/// One stage of a middleware chain.
///
/// # Invariants
///
/// - A stage reports exactly one outcome per request
/// - A stage that fails MUST NOT also have written a response
/// - Stages never see the error raised by an earlier stage
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Runs the stage against one request.
    fn handle<'a>(&'a self, ctx: &'a RequestContext, locals: &'a mut Locals)
        -> BoxFuture<'a, Outcome>;
}

/// A synchronous middleware built from a closure.
///
/// # Example
///
/// ```
/// use stockroom_core::ApiError;
/// use stockroom_middleware::{FnMiddleware, Outcome};
///
/// let guard = FnMiddleware::new("no_params", |ctx, _locals| {
///     if ctx.params().is_empty() {
///         Outcome::Continue
///     } else {
///         Outcome::Fail(ApiError::validation("unexpected parameters"))
///     }
/// });
/// # let _ = guard;
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new<O>(name: &'static str, func: F) -> Self
    where
        F: Fn(&RequestContext, &mut Locals) -> O,
    {
        Self { name, func }
    }
}

impl<F, O> Middleware for FnMiddleware<F>
where
    F: Fn(&RequestContext, &mut Locals) -> O + Send + Sync + 'static,
    O: Into<Outcome>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a RequestContext,
        locals: &'a mut Locals,
    ) -> BoxFuture<'a, Outcome> {
        let outcome = (self.func)(ctx, locals).into();
        Box::pin(async move { outcome })
    }
}
