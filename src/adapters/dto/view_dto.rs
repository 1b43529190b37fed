use serde::Serialize;

use crate::{
    adapters::dto::{
        media_dto::{GalleryResponse, UploadStateResponse},
        session_dto::UserResponse,
    },
    application::components::shell::ShellView,
};

#[derive(Debug, Serialize)]
#[serde(tag = "state")]
pub enum ViewResponse {
    #[serde(rename = "loading")]
    Loading,
    #[serde(rename = "signedOut")]
    SignedOut,
    #[serde(rename = "ready")]
    Ready {
        user: UserResponse,
        #[serde(rename = "showUpload")]
        show_upload: bool,
        refresh: u64,
        upload: UploadStateResponse,
        gallery: GalleryResponse,
    },
}

impl From<ShellView> for ViewResponse {
    fn from(view: ShellView) -> Self {
        match view {
            ShellView::Loading => ViewResponse::Loading,
            ShellView::SignedOut => ViewResponse::SignedOut,
            ShellView::Ready {
                user,
                show_upload,
                refresh,
                upload,
                gallery,
            } => ViewResponse::Ready {
                user: user.into(),
                show_upload,
                refresh,
                upload: upload.into(),
                gallery: gallery.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    #[serde(rename = "showUpload")]
    pub show_upload: bool,
}
