pub mod file;
pub mod media;
pub mod user;
