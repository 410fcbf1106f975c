use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The payload does not fit in a QR symbol at the configured level.
    #[error("payload of {bytes} bytes does not fit in a QR code at level {level}")]
    Capacity { bytes: usize, level: &'static str },

    #[error("qr encoding failed: {0}")]
    Qr(String),

    #[error("invalid label configuration: {0}")]
    Config(String),
}
