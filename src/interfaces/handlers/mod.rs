pub mod elements;
pub mod home;
pub mod images;
pub mod pages;
pub mod projects;
pub mod system;
pub mod templates;
