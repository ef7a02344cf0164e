//! # Stockroom Catalog
//!
//! Controllers for the three catalogue resources and the collaborator
//! interfaces they delegate to.
//!
//! | Resource | Module | Writable |
//! |---|---|---|
//! | Categories | [`categories`] | no |
//! | Products | [`products`] | no (plus aggregate reports) |
//! | Suppliers | [`suppliers`] | yes |
//!
//! Each module builds one [`Chain`](stockroom_middleware::Chain) per route
//! from the shared stage constructors in [`handlers`]. [`routes()`] collects
//! them into the full route table.
//!
//! ## Example
//!
//! ```
//! use stockroom_catalog::{routes, Services};
//!
//! let table = routes(&Services::in_memory());
//! assert_eq!(table.len(), 12);
//! ```

#![doc(html_root_url = "https://docs.rs/stockroom-catalog/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod categories;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod products;
pub mod routes;
pub mod seed;
pub mod service;
pub mod suppliers;

pub use error::{SeedError, ServiceError, ServiceResult};
pub use memory::MemoryStore;
pub use routes::{routes, RouteDef, Services};
pub use seed::SeedData;
pub use service::{ProductsService, ResourceService};
