use askama::Template;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::extractors::Layout;
use crate::flash::Flash;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Render a full page. A flash that arrived by cookie has now been shown,
/// so the cookie is expired on the way out.
pub fn page<T: Template>(layout: &Layout, template: T) -> Response {
    let mut response = Html(template).into_response();
    if layout.flash_cookie && response.status().is_success() {
        if let Ok(value) = HeaderValue::from_str(&Flash::clear_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
