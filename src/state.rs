use crate::recognition::FoodRecognizer;
use crate::store::FoodStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<FoodStore>>,
    pub recognizer: Arc<dyn FoodRecognizer>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: FoodStore, recognizer: Arc<dyn FoodRecognizer>) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            recognizer,
        }
    }
}
