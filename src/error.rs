#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown fractal engine: {0}")]
    UnknownEngine(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
