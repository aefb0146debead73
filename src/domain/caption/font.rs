use fontdue::{Font, FontSettings};
use image::{Rgb, RgbImage};
use std::path::Path;

/// DejaVu Sans, compiled in so captions always have glyphs.
static BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Font used to measure and draw captions.
pub struct CaptionFont {
    font: Box<Font>,
}

impl CaptionFont {
    /// Load `path`, falling back to the bundled font when it is unusable.
    pub fn load_or_fallback(path: &Path) -> Result<Self, String> {
        match Self::load(path) {
            Ok(font) => Ok(font),
            Err(e) => {
                tracing::warn!(
                    font_path = %path.display(),
                    error = %e,
                    "Failed to load caption font, using bundled font"
                );
                Self::bundled()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Self::from_bytes(bytes)
    }

    pub fn bundled() -> Result<Self, String> {
        Self::from_bytes(BUNDLED_FONT)
    }

    pub fn from_bytes<B>(bytes: B) -> Result<Self, String>
    where
        B: std::ops::Deref<Target = [u8]>,
    {
        Font::from_bytes(bytes, FontSettings::default())
            .map(|font| Self {
                font: Box::new(font),
            })
            .map_err(|e| format!("failed to parse font: {}", e))
    }

    /// Rendered width of `text` at `px`.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px).advance_width)
            .sum()
    }

    /// Ascent (positive) and descent (negative) at `px`.
    pub fn vertical_metrics(&self, px: f32) -> (f32, f32) {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2))
    }

    /// Height of one line box (ascent to descent) at `px`.
    pub fn line_box_height(&self, px: f32) -> f32 {
        let (ascent, descent) = self.vertical_metrics(px);
        ascent - descent
    }

    /// Draw `text` with its line box top-left corner at (`x`, `top`).
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        x: f32,
        top: f32,
        px: f32,
        color: Rgb<u8>,
    ) {
        let (ascent, _) = self.vertical_metrics(px);
        let baseline = (top + ascent).round() as i32;
        let mut pen_x = x;

        for c in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(c, px);
            let glyph_x = pen_x.round() as i32 + metrics.xmin;
            let glyph_top = baseline - metrics.height as i32 - metrics.ymin;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let cx = glyph_x + gx as i32;
                    let cy = glyph_top + gy as i32;
                    if cx < 0
                        || cy < 0
                        || cx >= canvas.width() as i32
                        || cy >= canvas.height() as i32
                    {
                        continue;
                    }
                    let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
                    *pixel = blend(*pixel, color, coverage);
                }
            }

            pen_x += metrics.advance_width;
        }
    }
}

/// Alpha-blend `src` over `dst` with coverage `alpha`.
pub fn blend(dst: Rgb<u8>, src: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    Rgb([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
    ])
}
