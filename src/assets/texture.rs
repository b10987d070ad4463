//! Image decoding for surface maps.

use crate::scene::material::Texture;

/// Decode PNG or JPEG bytes into an RGBA8 texture.
pub fn decode_texture(bytes: &[u8]) -> Result<Texture, String> {
    let image = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Texture::from_rgba8(width, height, rgba.into_raw())
        .ok_or_else(|| format!("empty image ({width}x{height})"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    #[test]
    fn png_decodes_to_rgba() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let texture = decode_texture(&bytes).unwrap();
        assert_eq!((texture.width(), texture.height()), (3, 2));
        assert_eq!(&texture.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn unknown_format_is_an_error() {
        assert!(decode_texture(b"definitely not an image").is_err());
    }
}
