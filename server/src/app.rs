use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let static_assets = Router::new()
        .fallback_service(ServeDir::new(state.public_dir.as_path()))
        .layer(middleware::from_fn(set_static_cache_control));

    Router::new()
        .route("/", get(routes::pages::index))
        .fallback_service(static_assets)
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    // Map SVGs, building photos and stylesheets
    if path.starts_with("/style/") {
        return Some("public, max-age=86400");
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::{scratch_dir, write};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/pkg/campus-map-client-71578f6b278221f3_bg.wasm"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            cache_control_for_path("/campus-map-client-a93762ff3bf6d63a.js"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[test]
    fn day_cache_for_map_and_photo_assets() {
        assert_eq!(
            cache_control_for_path("/style/maps/osu/osu-base.svg"),
            Some("public, max-age=86400")
        );
        assert_eq!(
            cache_control_for_path("/style/images/buildings/buxton-hall.jpg"),
            Some("public, max-age=86400")
        );
    }

    #[test]
    fn no_cache_header_override_for_page_and_dataset() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/buildings.json"), None);
        assert_eq!(cache_control_for_path("/js/map.js"), None);
    }

    fn fixture(name: &str) -> AppState {
        let dir = scratch_dir(name);
        write(&dir, "views/html/index.html", "<!doctype html><div id=\"app\"></div>");
        write(&dir, "public/buildings.json", "[]");
        write(&dir, "public/style/maps/osu/osu-base.svg", "<svg/>");
        AppState::new(dir.join("public"), dir.join("views/html/index.html"))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("infallible router")
    }

    #[tokio::test]
    async fn root_serves_host_page() {
        let app = build_app(fixture("root"));
        let response = get(app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(String::from_utf8_lossy(&body).contains("id=\"app\""));
    }

    #[tokio::test]
    async fn static_assets_come_from_public_dir() {
        let app = build_app(fixture("static"));
        let response = get(app.clone(), "/style/maps/osu/osu-base.svg").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("public, max-age=86400")
        );

        let response = get(app, "/buildings.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn missing_assets_are_not_found_without_cache_header() {
        let app = build_app(fixture("missing"));
        let response = get(app, "/style/images/buildings/ghost.jpg").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn missing_host_page_is_not_found() {
        let dir = scratch_dir("no-index");
        let app = build_app(AppState::new(dir.join("public"), dir.join("nope.html")));
        let response = get(app, "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
