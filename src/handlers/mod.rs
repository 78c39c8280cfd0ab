pub mod auth_handlers;
pub mod helpers;
pub mod template_handlers;
