pub mod api;
pub mod cache;
pub mod cache_keys;
pub mod catalog;
pub mod my_list;
pub mod routes;

pub use api::{ApiClient, ApiError, RetryPolicy};
pub use cache::{CacheStore, MemoryCache};
pub use cache_keys::CacheKey;
pub use catalog::{CatalogLoad, CatalogService};
pub use my_list::MyList;
pub use routes::{RouteDecision, RouteGuard};
