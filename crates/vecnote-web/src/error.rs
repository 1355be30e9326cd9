//! Host errors.

use thiserror::Error;
use vecnote_render::RendererError;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Element not found: {0}")]
    MissingElement(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error("JavaScript error: {0}")]
    Js(String),
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = WebError::MissingElement("vecnote-canvas".to_string());
        assert_eq!(err.to_string(), "Element not found: vecnote-canvas");

        let err: WebError = RendererError::InitFailed("no 2d".to_string()).into();
        assert_eq!(err.to_string(), "Initialization failed: no 2d");
    }
}
