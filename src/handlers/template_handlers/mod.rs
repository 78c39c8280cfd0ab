pub mod components;
pub mod helpers;
pub mod pages;
pub mod sections;
