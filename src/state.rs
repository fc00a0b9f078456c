use crate::config::Config;
use crate::render::Renderer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<Renderer>,
    pub config: Arc<Config>,
}
