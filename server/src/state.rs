use std::path::PathBuf;
use std::sync::Arc;

use crate::config;

#[derive(Clone)]
pub struct AppState {
    pub public_dir: Arc<PathBuf>,
    pub index_page: Arc<PathBuf>,
}

impl AppState {
    pub fn new(public_dir: impl Into<PathBuf>, index_page: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: Arc::new(public_dir.into()),
            index_page: Arc::new(index_page.into()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::public_dir(), config::index_page())
    }
}
