mod availability;
pub mod error;
pub mod metrics;
mod store;
mod validation;

pub use availability::AvailabilityResolver;
pub use error::CheckError;
pub use metrics::{get_metrics, init_metrics, record_check};
pub use store::{
    InMemoryProductStore, MongoProductStore, ProductStore, StoreError, PRODUCTS_COLLECTION,
};
pub use validation::parse_product_query;
