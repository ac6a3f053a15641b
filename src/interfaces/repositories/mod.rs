pub mod element;
pub mod image;
pub mod page;
pub mod project;
pub mod sqlx_repo;
pub mod token;
