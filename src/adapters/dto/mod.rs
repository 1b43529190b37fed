pub mod media_dto;
pub mod session_dto;
pub mod view_dto;
