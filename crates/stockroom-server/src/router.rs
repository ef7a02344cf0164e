//! Route table and path matching.
//!
//! Routes are registered as `(method, template, chain)`. Templates use
//! `{name}` segments for route parameters. Matching walks the table in
//! registration order, so literal routes that overlap a parameter route
//! (`/products/price-summary` vs `/products/{productId}`) must be registered
//! first.
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use stockroom_middleware::{Chain, FnStage, Response, ResponseExt};
//! use stockroom_server::{RouteMatch, Router};
//!
//! let chain = Chain::builder().handler(FnStage::new("ok", |_, _| {
//!     Box::pin(async { Ok(Response::no_content().into()) })
//! }));
//!
//! let mut router = Router::new();
//! router.add(Method::GET, "/suppliers/{supplierId}", Arc::new(chain)).unwrap();
//!
//! match router.match_route(&Method::GET, "/suppliers/7") {
//!     RouteMatch::Matched { params, .. } => assert_eq!(params.get("supplierId"), Some("7")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(
//!     router.match_route(&Method::PATCH, "/suppliers/7"),
//!     RouteMatch::MethodNotAllowed { .. }
//! ));
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use http::Method;
use stockroom_core::Params;
use stockroom_middleware::Chain;

use crate::error::{ServerError, ServerResult};

/// Result of matching a request against the route table.
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// A route accepts this method and path.
    Matched {
        /// The chain to run.
        chain: &'a Arc<Chain>,
        /// Parameters extracted from the path.
        params: Params,
        /// The template that matched.
        template: &'a str,
    },

    /// The path is known but no route accepts the method.
    MethodNotAllowed {
        /// Methods accepted for this path, in registration order.
        allowed: Vec<Method>,
    },

    /// No route template matches the path.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

#[derive(Debug)]
struct Route {
    method: Method,
    template: String,
    segments: Vec<PathSegment>,
    chain: Arc<Chain>,
}

impl Route {
    /// Returns the extracted parameters if the path fits this template.
    fn match_path(&self, path_segments: &[&str]) -> Option<Params> {
        if self.segments.len() != path_segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(path_segments) {
            match segment {
                PathSegment::Literal(literal) => {
                    if literal != value {
                        return None;
                    }
                }
                PathSegment::Param(name) => params.push(name.as_str(), decode_param(value)),
            }
        }
        Some(params)
    }
}

/// Percent-decodes a parameter value, keeping the raw text when it does not
/// decode to UTF-8.
fn decode_param(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), Cow::into_owned)
}

/// The route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route.
    ///
    /// Fails when the template is malformed or the same method and template
    /// are already registered.
    pub fn add(&mut self, method: Method, template: &str, chain: Arc<Chain>) -> ServerResult<()> {
        let segments = parse_template(template)?;

        if self
            .routes
            .iter()
            .any(|r| r.method == method && same_shape(&r.segments, &segments))
        {
            return Err(ServerError::DuplicateRoute {
                method,
                template: template.to_string(),
            });
        }

        self.routes.push(Route {
            method,
            template: template.to_string(),
            segments,
            chain,
        });
        Ok(())
    }

    /// Matches a request method and path.
    pub fn match_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let path_segments = split_path(path);
        let mut allowed = Vec::new();

        for route in &self.routes {
            let Some(params) = route.match_path(&path_segments) else {
                continue;
            };
            if route.method == *method {
                return RouteMatch::Matched {
                    chain: &route.chain,
                    params,
                    template: &route.template,
                };
            }
            if !allowed.contains(&route.method) {
                allowed.push(route.method.clone());
            }
        }

        if allowed.is_empty() {
            RouteMatch::NotFound
        } else {
            RouteMatch::MethodNotAllowed { allowed }
        }
    }

    /// Returns the registered `(method, template)` pairs in order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.routes.iter().map(|r| (&r.method, r.template.as_str()))
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Two templates collide when they differ only in parameter names.
fn same_shape(a: &[PathSegment], b: &[PathSegment]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (PathSegment::Literal(x), PathSegment::Literal(y)) => x == y,
            (PathSegment::Param(_), PathSegment::Param(_)) => true,
            _ => false,
        })
}

fn parse_template(template: &str) -> ServerResult<Vec<PathSegment>> {
    let invalid = |reason: &str| ServerError::InvalidRoute {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    if !template.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }

    split_path(template)
        .into_iter()
        .map(|segment| {
            if let Some(inner) = segment.strip_prefix('{') {
                let name = inner
                    .strip_suffix('}')
                    .ok_or_else(|| invalid("unterminated parameter"))?;
                if name.is_empty() || name.contains(['{', '}']) {
                    return Err(invalid("empty or nested parameter name"));
                }
                Ok(PathSegment::Param(name.to_string()))
            } else if segment.contains(['{', '}']) {
                Err(invalid("braces are only allowed around a whole segment"))
            } else {
                Ok(PathSegment::Literal(segment.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_middleware::{FnStage, Response, ResponseExt};

    fn chain() -> Arc<Chain> {
        Arc::new(Chain::builder().handler(FnStage::new("noop", |_, _| {
            Box::pin(async { Ok(Response::no_content().into()) })
        })))
    }

    fn matched_template<'a>(result: &RouteMatch<'a>) -> Option<&'a str> {
        match result {
            RouteMatch::Matched { template, .. } => Some(template),
            _ => None,
        }
    }

    #[test]
    fn test_literal_route() {
        let mut router = Router::new();
        router.add(Method::GET, "/categories", chain()).unwrap();

        let result = router.match_route(&Method::GET, "/categories");
        assert_eq!(matched_template(&result), Some("/categories"));
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let mut router = Router::new();
        router.add(Method::GET, "/categories", chain()).unwrap();

        let result = router.match_route(&Method::GET, "/categories/");
        assert_eq!(matched_template(&result), Some("/categories"));
    }

    #[test]
    fn test_param_extraction() {
        let mut router = Router::new();
        router.add(Method::PUT, "/suppliers/{supplierId}", chain()).unwrap();

        match router.match_route(&Method::PUT, "/suppliers/42") {
            RouteMatch::Matched { params, .. } => {
                assert_eq!(params.get("supplierId"), Some("42"));
                assert_eq!(params.len(), 1);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let mut router = Router::new();
        router.add(Method::GET, "/suppliers/{supplierId}", chain()).unwrap();

        match router.match_route(&Method::GET, "/suppliers/%37") {
            RouteMatch::Matched { params, .. } => assert_eq!(params.get("supplierId"), Some("7")),
            other => panic!("expected match, got {other:?}"),
        }
        match router.match_route(&Method::GET, "/suppliers/%FF") {
            RouteMatch::Matched { params, .. } => {
                assert_eq!(params.get("supplierId"), Some("%FF"));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn test_registration_order_wins() {
        let mut router = Router::new();
        router.add(Method::GET, "/products/price-summary", chain()).unwrap();
        router.add(Method::GET, "/products/{productId}", chain()).unwrap();

        let report = router.match_route(&Method::GET, "/products/price-summary");
        assert_eq!(matched_template(&report), Some("/products/price-summary"));

        let item = router.match_route(&Method::GET, "/products/3");
        assert_eq!(matched_template(&item), Some("/products/{productId}"));
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let mut router = Router::new();
        router.add(Method::GET, "/suppliers/{supplierId}", chain()).unwrap();
        router.add(Method::PUT, "/suppliers/{supplierId}", chain()).unwrap();
        router.add(Method::DELETE, "/suppliers/{supplierId}", chain()).unwrap();

        match router.match_route(&Method::PATCH, "/suppliers/1") {
            RouteMatch::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET, Method::PUT, Method::DELETE]);
            }
            other => panic!("expected 405, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found() {
        let mut router = Router::new();
        router.add(Method::GET, "/suppliers", chain()).unwrap();

        assert!(matches!(
            router.match_route(&Method::GET, "/warehouses"),
            RouteMatch::NotFound
        ));
        assert!(matches!(
            router.match_route(&Method::GET, "/suppliers/1/contacts"),
            RouteMatch::NotFound
        ));
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut router = Router::new();
        router.add(Method::GET, "/suppliers/{id}", chain()).unwrap();

        let err = router
            .add(Method::GET, "/suppliers/{supplierId}", chain())
            .unwrap_err();
        assert!(matches!(err, ServerError::DuplicateRoute { .. }));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_invalid_templates_rejected() {
        let mut router = Router::new();
        for template in ["suppliers", "/suppliers/{id", "/suppliers/{}", "/sup{id}pliers"] {
            let err = router.add(Method::GET, template, chain()).unwrap_err();
            assert!(
                matches!(err, ServerError::InvalidRoute { .. }),
                "{template} should be rejected"
            );
        }
        assert!(router.is_empty());
    }
}
