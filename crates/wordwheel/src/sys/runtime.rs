use crate::config;
use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;
use wordmath::WordVectors;

pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("failed to create tokio runtime");

        rt.block_on(async {
            tokio::spawn(config::run_async_watcher(tx));
            std::future::pending::<()>().await;
        });
    });
}

/// Parse the embeddings file off the GUI thread and report back over the
/// event channel. Without a configured path the built-in demo set loads
/// immediately.
pub fn load_vectors_in_background(path: Option<PathBuf>, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let event = match path {
            Some(path) => match WordVectors::load(&path) {
                Ok(vectors) => {
                    log::info!(
                        "loaded {} vectors with {} dimensions from {}",
                        vectors.len(),
                        vectors.dimensionality(),
                        path.display()
                    );
                    AppEvent::VectorsLoaded(Arc::new(vectors))
                }
                Err(e) => AppEvent::VectorsFailed(format!("{}: {e}", path.display())),
            },
            None => {
                log::info!("no embeddings configured, using the built-in demo set");
                AppEvent::VectorsLoaded(Arc::new(WordVectors::demo()))
            }
        };
        let _ = tx.send_blocking(event);
    });
}
