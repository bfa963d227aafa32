use crate::book::CounterBook;
use crate::clock::Clock;
use crate::display::DisplayBoard;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub book: Arc<Mutex<CounterBook>>,
    pub clock: Arc<dyn Clock>,
    pub display: DisplayBoard,
}

impl AppState {
    pub fn new(data_path: PathBuf, book: CounterBook, clock: Arc<dyn Clock>) -> Self {
        Self {
            data_path,
            book: Arc::new(Mutex::new(book)),
            clock,
            display: DisplayBoard::new(),
        }
    }
}
