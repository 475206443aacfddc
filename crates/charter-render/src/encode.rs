//! PNG and base64 output.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::canvas::Canvas;
use crate::error::RenderError;

/// The eight bytes every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Encode the canvas as an RGBA8 PNG.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer).write_image(
        canvas.as_bytes(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgba8,
    )?;
    log::debug!(
        "Encoded {}x{} PNG ({} bytes)",
        canvas.width(),
        canvas.height(),
        buffer.len()
    );
    Ok(buffer)
}

/// Standard base64 (with padding) of `bytes`.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
