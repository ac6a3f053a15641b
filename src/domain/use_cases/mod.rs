pub mod element;
pub mod extractors;
pub mod image;
pub mod page;
pub mod project;
