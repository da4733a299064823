pub mod auth;
pub mod store;
pub mod traits;

pub use auth::TokenAuthorizer;
pub use store::{InMemoryCatalogStore, PostgresCatalogStore};
pub use traits::{BaseAuthorizer, BaseCatalogStore, StoreError};
