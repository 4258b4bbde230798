//! Badge images (e.g. a clock icon) drawn into the inset panel

use crate::error::MapError;
use image::RgbaImage;

/// Turns an encoded vector image into a square raster of `size_px` pixels with
/// straight (non-premultiplied) alpha
pub trait ImageDecoder {
    fn decode(&self, source: &[u8], size_px: u32) -> Result<RgbaImage, MapError>;
}

/// The decoder compiled into this build, if any
pub fn default_decoder() -> Option<Box<dyn ImageDecoder>> {
    #[cfg(feature = "svg-badge")]
    {
        Some(Box::new(SvgDecoder))
    }
    #[cfg(not(feature = "svg-badge"))]
    {
        None
    }
}

/// Error returned when a badge is requested but no decoder is available
pub fn missing_decoder() -> MapError {
    MapError::MissingCapability {
        capability: "SVG badge rendering",
        hint: "rebuild with `--features svg-badge` to enable it",
    }
}

/// Rasterizes SVG documents with resvg
#[cfg(feature = "svg-badge")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgDecoder;

#[cfg(feature = "svg-badge")]
impl ImageDecoder for SvgDecoder {
    fn decode(&self, source: &[u8], size_px: u32) -> Result<RgbaImage, MapError> {
        use resvg::{tiny_skia, usvg};

        if size_px == 0 {
            return Err(MapError::Badge("badge size must be positive".to_string()));
        }

        let options = usvg::Options::default();
        let tree =
            usvg::Tree::from_data(source, &options).map_err(|e| MapError::Badge(e.to_string()))?;

        let svg_size = tree.size();
        let mut pixmap = tiny_skia::Pixmap::new(size_px, size_px)
            .ok_or_else(|| MapError::Badge(format!("cannot allocate {size_px}px pixmap")))?;

        // Stretch to a square, like the badge slot it is drawn into
        let transform = tiny_skia::Transform::from_scale(
            size_px as f32 / svg_size.width(),
            size_px as f32 / svg_size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let raw: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        RgbaImage::from_raw(size_px, size_px, raw)
            .ok_or_else(|| MapError::Badge(format!("pixmap does not fill {size_px}x{size_px}")))
    }
}

#[cfg(all(test, feature = "svg-badge"))]
mod tests {
    use super::*;

    const CLOCK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">
        <rect x="0" y="0" width="5" height="10" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_decode_svg_to_requested_size() {
        let image = SvgDecoder.decode(CLOCK.as_bytes(), 20).unwrap();
        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(image.get_pixel(2, 10).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(17, 10).0[3], 0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = SvgDecoder.decode(b"definitely not svg", 16).unwrap_err();
        assert!(matches!(err, MapError::Badge(_)));
    }

    #[test]
    fn test_default_decoder_present() {
        assert!(default_decoder().is_some());
    }

    #[test]
    fn test_missing_decoder_message() {
        assert!(missing_decoder().to_string().contains("--features svg-badge"));
    }
}
