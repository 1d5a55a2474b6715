//! Raw file responses: the embedded stylesheet and the upload directory.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

fn file_response(name: &str, data: Vec<u8>, cache_control: Option<&'static str>) -> Response {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        data,
    )
        .into_response();
    if let Some(cache) = cache_control {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, header::HeaderValue::from_static(cache));
    }
    response
}

/// GET /assets/{*path}
pub async fn asset(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(file) => file_response(&path, file.data.into_owned(), Some("public, max-age=86400")),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /uploads/{*path} — any stored upload, to anyone who asks for it by name.
pub async fn upload(State(state): State<AppState>, Path(path): Path<String>) -> AppResult<Response> {
    let file_path = state.uploads.resolve(&path).ok_or(AppError::NotFound)?;

    match tokio::fs::metadata(&file_path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(AppError::NotFound),
    }

    let data = tokio::fs::read(&file_path).await?;
    Ok(file_response(&path, data, None))
}
