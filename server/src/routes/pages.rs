use std::io::ErrorKind;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;

/// `GET /`: the host page that boots the map client.
pub async fn index(State(state): State<AppState>) -> Response {
    match tokio::fs::read_to_string(state.index_page.as_path()).await {
        Ok(body) => {
            let mut response = Html(body).into_response();
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            response
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::error!(path = %state.index_page.display(), "host page is missing");
            (StatusCode::NOT_FOUND, "host page not found").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, path = %state.index_page.display(), "failed to read host page");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read host page").into_response()
        }
    }
}
