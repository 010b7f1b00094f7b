use consent_embeddings::EncoderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(
        "no embedding backend configured; construct the engine with an encoder or use the line-based mode"
    )]
    ModelUnavailable,

    #[error("encoder error: {0}")]
    Encoder(#[from] EncoderError),
}
