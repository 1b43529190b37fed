pub mod components;
pub mod error;
pub mod repositories;
pub mod services;
