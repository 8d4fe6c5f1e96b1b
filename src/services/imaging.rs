use image::{ImageError, ImageReader};
use std::io::Cursor;

/// Decode `bytes` as an image and return the perimeter of its pixel bounds,
/// `2 * (width + height)`.
///
/// The format is sniffed from the content, and the whole image is decoded so
/// truncated or corrupt files are rejected rather than measured from their
/// header.
pub fn perimeter(bytes: &[u8]) -> Result<u64, ImageError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    Ok(2 * (u64::from(image.width()) + u64::from(image.height())))
}
