pub mod articles;
pub mod health;

pub use articles::{
    create_article, delete_article, get_article, list_articles, method_not_allowed, not_found,
    search_by_categoria, search_by_nombre, update_price, welcome,
};
pub use health::{health_check, readiness_check};
