use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Failed to decode frame")]
    Image(#[from] image::ImageError),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Invalid HSV colour: {0}")]
    InvalidColor(String),
    #[error("Invalid HSV range: lower bound exceeds upper bound")]
    InvalidRange,
    #[error("Capture thread panicked")]
    CaptureThread,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
