use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

pub type SpaService = ServeDir<ServeFile>;

/// Serve files from the built front end, answering unknown paths with
/// `index.html` so client-side routes survive a reload.
///
/// Returns `None` when the directory has not been built.
pub fn spa_service(static_dir: &Path) -> Option<SpaService> {
    if !static_dir.is_dir() {
        warn!(
            dir = %static_dir.display(),
            "Static directory not found; front end will not be served"
        );
        return None;
    }

    info!(dir = %static_dir.display(), "Serving front end");
    let index = static_dir.join("index.html");
    Some(ServeDir::new(static_dir).fallback(ServeFile::new(index)))
}
