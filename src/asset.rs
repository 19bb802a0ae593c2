use crate::layout::Rect;

/// A decoded image as straight (non-premultiplied) 8-bit RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    pub fn has_alpha(&self) -> bool {
        self.rgba.chunks_exact(4).any(|p| p[3] < 255)
    }

    pub fn rgb(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    pub fn alpha(&self) -> Vec<u8> {
        self.rgba.chunks_exact(4).map(|p| p[3]).collect()
    }

    /// Largest rectangle with this image's aspect ratio that fits in `bounds`,
    /// centered in it.
    pub fn fit_into(&self, bounds: Rect) -> Rect {
        if self.width == 0 || self.height == 0 {
            return bounds;
        }
        let scale = (bounds.width / self.width as f32).min(bounds.height / self.height as f32);
        let w = self.width as f32 * scale;
        let h = self.height as f32 * scale;
        Rect::new(
            bounds.x + (bounds.width - w) / 2.0,
            bounds.y + (bounds.height - h) / 2.0,
            w,
            h,
        )
    }
}

/// Outcome of decoding the optional logo. A logo that can't be decoded is
/// skipped and the report is built without it.
#[derive(Clone, Debug, PartialEq)]
pub enum LogoAsset {
    Ready(RasterImage),
    Skipped(String),
}

impl LogoAsset {
    pub fn image(&self) -> Option<&RasterImage> {
        match self {
            LogoAsset::Ready(img) => Some(img),
            LogoAsset::Skipped(_) => None,
        }
    }
}

/// Decode PNG or JPEG bytes.
pub fn decode_logo(bytes: &[u8]) -> LogoAsset {
    let t0 = std::time::Instant::now();
    if bytes.is_empty() {
        log::warn!("logo skipped: empty file");
        return LogoAsset::Skipped("empty file".into());
    }
    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            log::debug!(
                "decode_logo: {width}x{height} in {:.1}ms",
                t0.elapsed().as_secs_f64() * 1000.0
            );
            LogoAsset::Ready(RasterImage {
                width,
                height,
                rgba: rgba.into_raw(),
            })
        }
        Err(e) => {
            log::warn!("logo skipped: {e}");
            LogoAsset::Skipped(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, alpha]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let LogoAsset::Ready(img) = decode_logo(&png(4, 2, 255)) else {
            panic!("expected a decoded image");
        };
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.rgba.len(), 4 * 2 * 4);
        assert!(!img.has_alpha());
        assert_eq!(&img.rgb()[..3], &[10, 20, 30]);
    }

    #[test]
    fn translucent_png_keeps_alpha() {
        let img = decode_logo(&png(2, 2, 128));
        assert!(img.image().unwrap().has_alpha());
        assert_eq!(img.image().unwrap().alpha(), vec![128; 4]);
    }

    #[test]
    fn garbage_is_skipped() {
        assert!(matches!(decode_logo(b"not an image"), LogoAsset::Skipped(_)));
        assert!(matches!(decode_logo(&[]), LogoAsset::Skipped(_)));
    }

    #[test]
    fn wide_image_fits_box_width_and_is_centered() {
        let img = RasterImage {
            width: 300,
            height: 50,
            rgba: vec![0; 300 * 50 * 4],
        };
        let r = img.fit_into(Rect::new(10.0, 100.0, 90.0, 30.0));
        assert!((r.width - 90.0).abs() < 1e-4);
        assert!((r.height - 15.0).abs() < 1e-4);
        assert!((r.y - 107.5).abs() < 1e-4);
        assert!((r.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn tall_image_fits_box_height() {
        let img = RasterImage {
            width: 10,
            height: 20,
            rgba: vec![0; 10 * 20 * 4],
        };
        let r = img.fit_into(Rect::new(0.0, 0.0, 90.0, 30.0));
        assert!((r.height - 30.0).abs() < 1e-4);
        assert!((r.width - 15.0).abs() < 1e-4);
        assert!((r.x - 37.5).abs() < 1e-4);
    }
}
