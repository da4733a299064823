mod memory;
mod postgres;

pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
