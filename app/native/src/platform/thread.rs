use std::thread::{self, JoinHandle};

use crate::constants::APP_NAME;

/// Spawns a background thread named `fluidbg-{name}`.
///
/// Spawn failures are logged and reported as `None`; callers treat them as
/// "the work did not start".
pub fn spawn_named_thread<F>(name: &str, task: F) -> Option<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("{APP_NAME}-{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
            None
        }
    }
}
