//! The page shown for unknown routes and missing resources.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Renders a 404 page.
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        let page = error_view(
            "ไม่พบหน้า",
            "404",
            "ไม่พบหน้าที่คุณต้องการ",
            "ตรวจสอบที่อยู่เว็บอีกครั้ง หรือกลับไปที่หน้าหลัก",
        );

        (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
    }
}

/// The fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
