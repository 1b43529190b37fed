pub mod events;
pub mod gallery;
pub mod session;
pub mod shell;
pub mod upload;
