pub mod gallery_controller;
pub mod health_controller;
pub mod session_controller;
pub mod storage_controller;
pub mod upload_controller;
pub mod view_controller;
