pub mod admin;
pub mod component_type;
pub mod template;
