//! Existence resolver.
//!
//! [`Exists`] reads the resource identifier from the route parameters, asks
//! a lookup function for the matching record and stores it in [`Locals`]
//! under the resource key. When no record matches, the chain fails with
//! `"<Resource> cannot be found"`.
//!
//! The resolver is a [`Stage`], so it is registered with
//! [`ChainBuilder::guard_async`](crate::ChainBuilder::guard_async) and any
//! lookup failure reaches error rendering through the error boundary.

use crate::boundary::Stage;
use crate::context::Locals;
use crate::middleware::{BoxFuture, Outcome};
use stockroom_core::{ApiError, Record, RequestContext, Resource};

/// Resolves the entity named by a route parameter.
///
/// # Example
///
/// ```
/// use stockroom_core::{ApiError, Record, Resource};
/// use stockroom_middleware::stages::Exists;
/// use stockroom_middleware::BoxFuture;
///
/// const PRODUCT: Resource = Resource::new("Product", "product", "product_id", "productId");
///
/// let resolver = Exists::new(PRODUCT, |_id: &str| -> BoxFuture<'static, Result<Option<Record>, ApiError>> {
///     Box::pin(async { Ok(None) })
/// });
/// assert_eq!(resolver.resource().name(), "Product");
/// ```
pub struct Exists<F> {
    resource: Resource,
    lookup: F,
}

impl<F, E> Exists<F>
where
    F: Fn(&str) -> BoxFuture<'static, Result<Option<Record>, E>> + Send + Sync + 'static,
{
    /// Creates a resolver for `resource` backed by `lookup`.
    pub const fn new(resource: Resource, lookup: F) -> Self {
        Self { resource, lookup }
    }

    /// Returns the resource this resolver loads.
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl<F, E> Stage for Exists<F>
where
    F: Fn(&str) -> BoxFuture<'static, Result<Option<Record>, E>> + Send + Sync + 'static,
    E: Into<ApiError> + Send + 'static,
{
    type Output = Outcome;
    type Error = E;

    fn name(&self) -> &'static str {
        "exists"
    }

    fn run<'a>(
        &'a self,
        ctx: &'a RequestContext,
        locals: &'a mut Locals,
    ) -> BoxFuture<'a, Result<Outcome, E>> {
        Box::pin(async move {
            let resource = &self.resource;
            let Some(id) = ctx.param(resource.param()) else {
                return Ok(Outcome::Fail(ApiError::internal(format!(
                    "route is missing the '{}' parameter",
                    resource.param()
                ))));
            };

            match (self.lookup)(id).await? {
                Some(record) => {
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        resource = resource.name(),
                        id,
                        "resolved entity"
                    );
                    locals.insert(resource.key(), record);
                    Ok(Outcome::Continue)
                }
                None => Ok(Outcome::Fail(ApiError::resource_not_found(resource.name()))),
            }
        })
    }
}
