pub mod database;
pub mod memory;
pub mod store;

pub use database::MongoArticleStore;
pub use memory::InMemoryArticleStore;
pub use store::{ArticleStore, StoreError, substring_pattern};
