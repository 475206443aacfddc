use thiserror::Error;

/// Rasterization and encoding failures. Never retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("non-finite value reached the renderer: {what}")]
    NonFinite { what: String },
    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
