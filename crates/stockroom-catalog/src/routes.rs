//! The complete route table.

use crate::error::ServiceResult;
use crate::memory::MemoryStore;
use crate::seed::SeedData;
use crate::service::{ProductsService, ResourceService};
use crate::{categories, products, suppliers};
use http::Method;
use std::sync::Arc;
use stockroom_middleware::Chain;

/// A chain bound to a method and path template.
///
/// Path templates use `{name}` segments for route parameters, for example
/// `/suppliers/{supplierId}`.
#[derive(Debug)]
pub struct RouteDef {
    method: Method,
    path: &'static str,
    chain: Chain,
}

impl RouteDef {
    /// Creates a route definition.
    #[must_use]
    pub fn new(method: Method, path: &'static str, chain: Chain) -> Self {
        Self {
            method,
            path,
            chain,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the chain.
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Splits the definition into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Method, &'static str, Chain) {
        (self.method, self.path, self.chain)
    }
}

/// The collaborators backing each resource.
#[derive(Clone)]
pub struct Services {
    /// Category collaborator.
    pub categories: Arc<dyn ResourceService>,
    /// Product collaborator.
    pub products: Arc<dyn ProductsService>,
    /// Supplier collaborator.
    pub suppliers: Arc<dyn ResourceService>,
}

impl Services {
    /// Empty in-memory collaborators.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            categories: Arc::new(MemoryStore::new(categories::CATEGORY)),
            products: Arc::new(MemoryStore::new(products::PRODUCT)),
            suppliers: Arc::new(MemoryStore::new(suppliers::SUPPLIER)),
        }
    }

    /// In-memory collaborators pre-populated from seed data.
    pub fn from_seed(seed: SeedData) -> ServiceResult<Self> {
        Ok(Self {
            categories: Arc::new(MemoryStore::with_records(categories::CATEGORY, seed.categories)?),
            products: Arc::new(MemoryStore::with_records(products::PRODUCT, seed.products)?),
            suppliers: Arc::new(MemoryStore::with_records(suppliers::SUPPLIER, seed.suppliers)?),
        })
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Builds every route of the API.
pub fn routes(services: &Services) -> Vec<RouteDef> {
    let mut routes = categories::routes(Arc::clone(&services.categories));
    routes.extend(products::routes(Arc::clone(&services.products)));
    routes.extend(suppliers::routes(Arc::clone(&services.suppliers)));
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        let table: Vec<(Method, &str)> = routes(&Services::in_memory())
            .into_iter()
            .map(|route| {
                let (method, path, _) = route.into_parts();
                (method, path)
            })
            .collect();

        assert_eq!(
            table,
            vec![
                (Method::GET, "/categories"),
                (Method::GET, "/categories/{categoryId}"),
                (Method::GET, "/products"),
                (Method::GET, "/products/out-of-stock-count"),
                (Method::GET, "/products/price-summary"),
                (Method::GET, "/products/total-weight-by-product"),
                (Method::GET, "/products/{productId}"),
                (Method::GET, "/suppliers"),
                (Method::POST, "/suppliers"),
                (Method::GET, "/suppliers/{supplierId}"),
                (Method::PUT, "/suppliers/{supplierId}"),
                (Method::DELETE, "/suppliers/{supplierId}"),
            ]
        );
    }
}
