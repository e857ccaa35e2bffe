use std::sync::Arc;
use wordmath::WordVectors;

#[derive(Debug, Clone)]
pub enum AppEvent {
    VectorsLoaded(Arc<WordVectors>),
    VectorsFailed(String),
    ConfigReload,
}
