use std::path::PathBuf;
use std::sync::Arc;

use choropleth_shared::MapController;

/// Shared, immutable server state. The map is loaded once at startup;
/// `None` means the data files could not be loaded.
#[derive(Clone)]
pub struct AppState {
    pub map: Option<Arc<MapController>>,
    pub load_error: Option<Arc<str>>,
    pub static_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(static_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            map: None,
            load_error: None,
            static_dir,
            data_dir,
        }
    }

    pub fn with_load_result(mut self, result: Result<MapController, String>) -> Self {
        match result {
            Ok(map) => {
                self.map = Some(Arc::new(map));
                self.load_error = None;
            }
            Err(e) => {
                self.map = None;
                self.load_error = Some(e.into());
            }
        }
        self
    }
}
