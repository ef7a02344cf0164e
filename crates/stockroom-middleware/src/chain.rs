//! Ordered per-route middleware chains.
//!
//! A [`Chain`] is built once at startup for each route and is immutable
//! afterwards. Executing it runs the guards in declaration order, then the
//! terminal handler. The first stage that fails ends the chain; later stages
//! never run.

use crate::boundary::{ErrorBoundary, Stage};
use crate::context::Locals;
use crate::middleware::{Middleware, Outcome};
use crate::types::Response;
use std::sync::Arc;
use stockroom_core::{ApiError, RequestContext};

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered sequence of stages ending in a handler.
///
/// # Example
///
/// ```
/// use stockroom_middleware::stages::HasOnlyValidProperties;
/// use stockroom_middleware::{Chain, FnStage, Response, ResponseExt};
/// use http::StatusCode;
/// use serde_json::json;
///
/// let chain = Chain::builder()
///     .guard(HasOnlyValidProperties::new(["supplier_name"]))
///     .handler(FnStage::new("list", |_ctx, _locals| {
///         Box::pin(async { Ok(Response::data(StatusCode::OK, json!([])).into()) })
///     }));
///
/// assert_eq!(chain.stage_names(), vec!["has_only_valid_properties", "list"]);
/// ```
pub struct Chain {
    guards: Vec<BoxedMiddleware>,
    handler: BoxedMiddleware,
}

impl Chain {
    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Runs the chain with fresh shared state.
    pub async fn run(&self, ctx: &RequestContext) -> Result<Response, ApiError> {
        let mut locals = Locals::new();
        self.execute(ctx, &mut locals).await
    }

    /// Runs the chain against caller-provided shared state.
    ///
    /// Returns the handler's response, the response of a guard that
    /// answered early, or the first error signal raised.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        locals: &mut Locals,
    ) -> Result<Response, ApiError> {
        for stage in &self.guards {
            match stage.handle(ctx, locals).await {
                Outcome::Continue => {}
                Outcome::Fail(error) => {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        stage = stage.name(),
                        error = %error,
                        "chain stopped by stage"
                    );
                    return Err(error);
                }
                Outcome::Responded(response) => {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        stage = stage.name(),
                        "guard answered before handler"
                    );
                    return Ok(response);
                }
            }
        }

        match self.handler.handle(ctx, locals).await {
            Outcome::Responded(response) => Ok(response),
            Outcome::Fail(error) => Err(error),
            Outcome::Continue => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    stage = self.handler.name(),
                    "handler finished without a response"
                );
                Err(ApiError::internal(format!(
                    "handler '{}' completed without producing a response",
                    self.handler.name()
                )))
            }
        }
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.guards
            .iter()
            .chain(std::iter::once(&self.handler))
            .map(|stage| stage.name())
            .collect()
    }

    /// Returns the number of stages, handler included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len() + 1
    }

    /// Always false: a chain has at least its handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for [`Chain`].
///
/// Guards are added in execution order. The chain is complete once
/// [`handler`](Self::handler) is called.
#[derive(Default)]
pub struct ChainBuilder {
    guards: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a guard stage.
    ///
    /// Use this for stages that report their own outcome, such as the
    /// synchronous property validators.
    #[must_use]
    pub fn guard<M: Middleware>(mut self, middleware: M) -> Self {
        self.guards.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared guard stage.
    #[must_use]
    pub fn guard_shared(mut self, middleware: BoxedMiddleware) -> Self {
        self.guards.push(middleware);
        self
    }

    /// Appends an asynchronous guard wrapped in an [`ErrorBoundary`].
    #[must_use]
    pub fn guard_async<S: Stage>(self, stage: S) -> Self {
        self.guard(ErrorBoundary::new(stage))
    }

    /// Sets the terminal stage, wrapped in an [`ErrorBoundary`], and builds the chain.
    #[must_use]
    pub fn handler<S: Stage>(self, stage: S) -> Chain {
        Chain {
            guards: self.guards,
            handler: Arc::new(ErrorBoundary::new(stage)),
        }
    }
}
