pub mod layout;
pub mod summary;
pub mod quiz_store;
pub mod image_catalog;
