pub mod global;
pub mod image_index;
pub mod structure;
