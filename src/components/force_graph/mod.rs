mod component;
mod render;
mod state;
mod storage;

pub use component::SystemMapCanvas;
pub use storage::BrowserPositionStore;
