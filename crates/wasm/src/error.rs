use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("failed to register `{event}` listener: {message}")]
    Listener { event: &'static str, message: String },
}

impl SourceError {
    pub(crate) fn listener(event: &'static str, cause: &JsValue) -> Self {
        SourceError::Listener {
            event,
            message: format!("{cause:?}"),
        }
    }
}
