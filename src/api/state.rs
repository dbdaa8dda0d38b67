use std::sync::Arc;

use crate::fetch::PlaylistSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PlaylistSource>,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(source: Arc<dyn PlaylistSource>) -> Self {
        Self {
            source,
            cors_origin: "*".to_string(),
        }
    }
}
