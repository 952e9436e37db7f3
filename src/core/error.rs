use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("QR encoding error: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Logo file too large ({actual} bytes, max {max})")]
    OversizedUpload { actual: u64, max: u64 },

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
}

pub type AppResult<T> = Result<T, AppError>;
