pub mod element;
pub mod image;
pub mod option_fields;
pub mod page;
pub mod project;
pub mod template;
pub mod token;
