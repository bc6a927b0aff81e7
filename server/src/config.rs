use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 42069;
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_INDEX_PAGE: &str = "views/html/index.html";

pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Directory served as static assets (map SVGs, photos, dataset, client bundle).
pub fn public_dir() -> PathBuf {
    non_empty_path("PUBLIC_DIR").unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR))
}

/// Host page returned for `GET /`.
pub fn index_page() -> PathBuf {
    non_empty_path("INDEX_PAGE").unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PAGE))
}

fn non_empty_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
