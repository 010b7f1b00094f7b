use thiserror::Error;

pub type Result<T> = std::result::Result<T, EncoderError>;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Model assets missing: {0}")]
    ModelAssets(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}
