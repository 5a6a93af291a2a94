use std::sync::Arc;

/// Receives one human-readable line per capture step.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub(crate) fn log_progress(progress: &Option<ProgressCallback>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}
