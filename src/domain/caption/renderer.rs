use super::font::{blend, CaptionFont};
use super::layout::{center_offset, layout_block};
use super::{
    BackgroundImage, BackgroundMode, CaptionStyle, Color, FrameSize, PromoContent,
    HORIZONTAL_MARGIN, LINE_HEIGHT_FACTOR,
};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

/// Draws full-frame caption images.
///
/// Rendering is deterministic: the same text and style always give the same
/// pixels. Output is always exactly `frame` sized, text that does not fit
/// vertically overflows the frame edges.
pub struct CaptionRenderer {
    font: CaptionFont,
    frame: FrameSize,
}

impl CaptionRenderer {
    pub fn new(font: CaptionFont, frame: FrameSize) -> Self {
        Self { font, frame }
    }

    /// Render `text` word-wrapped and centered over the style's background.
    pub fn render(&self, text: &str, style: &CaptionStyle) -> RgbImage {
        let mut canvas = compose_background(
            self.frame,
            style.background_color,
            style.background.as_ref(),
            None,
        );

        let px = style.font_size as f32;
        let line_height = px * LINE_HEIGHT_FACTOR;
        let placed = layout_block(text, self.frame, HORIZONTAL_MARGIN, line_height, |line| {
            self.font.measure(line, px)
        });

        tracing::debug!(
            line_count = placed.len(),
            font_size = style.font_size,
            "Caption laid out"
        );

        for line in &placed {
            self.font
                .draw(&mut canvas, &line.text, line.x, line.top, px, style.text_color.to_rgb());
        }

        canvas
    }

    /// Render the trailing promotional frame.
    ///
    /// The background image, if any, is always stretched. The optional logo is
    /// resized and alpha-composited at the configured corner, then two title
    /// lines and a smaller subtitle are drawn, each centered on its own.
    pub fn render_promotional(
        &self,
        promo: &PromoContent,
        style: &CaptionStyle,
        logo: Option<&RgbaImage>,
    ) -> RgbImage {
        let mut canvas = compose_background(
            self.frame,
            style.background_color,
            style.background.as_ref(),
            Some(BackgroundMode::Stretch),
        );

        if let Some(logo) = logo {
            let resized =
                imageops::resize(logo, promo.logo_size, promo.logo_size, FilterType::Triangle);
            composite_rgba(&mut canvas, &resized, promo.logo_position);
        }

        let color = style.text_color.to_rgb();
        let title_px = promo.title_font_size as f32;
        let subtitle_px = promo.subtitle_font_size() as f32;
        let title_height = self.font.line_box_height(title_px);

        let title_top =
            ((self.frame.height as f32 - 2.0 * title_height) / 2.0).floor() - promo.spacing;

        for (i, line) in promo.title_lines.iter().enumerate() {
            let x = center_offset(self.frame.width, self.font.measure(line, title_px));
            let top = title_top + i as f32 * title_height;
            self.font.draw(&mut canvas, line, x, top, title_px, color);
        }

        let subtitle_top = title_top + 2.0 * title_height + promo.spacing;
        let x = center_offset(self.frame.width, self.font.measure(&promo.subtitle, subtitle_px));
        self.font
            .draw(&mut canvas, &promo.subtitle, x, subtitle_top, subtitle_px, color);

        canvas
    }
}

/// Build the frame background: a solid fill, or the image fitted by its mode.
///
/// `force_mode` overrides the image's own mode.
pub fn compose_background(
    frame: FrameSize,
    color: Color,
    background: Option<&BackgroundImage>,
    force_mode: Option<BackgroundMode>,
) -> RgbImage {
    let Some(background) = background else {
        return RgbImage::from_pixel(frame.width, frame.height, color.to_rgb());
    };

    match force_mode.unwrap_or(background.mode) {
        BackgroundMode::Stretch => imageops::resize(
            &background.image,
            frame.width,
            frame.height,
            FilterType::Triangle,
        ),
        BackgroundMode::Letterbox => {
            let fitted = shrink_to_fit(&background.image, frame);
            let mut canvas = RgbImage::from_pixel(frame.width, frame.height, color.to_rgb());
            let x = (frame.width - fitted.width()) / 2;
            let y = (frame.height - fitted.height()) / 2;
            imageops::overlay(&mut canvas, &fitted, x as i64, y as i64);
            canvas
        }
    }
}

/// Scale `image` down, keeping its aspect ratio, until it fits in `frame`.
/// Images that already fit are returned unchanged.
fn shrink_to_fit(image: &RgbImage, frame: FrameSize) -> RgbImage {
    let (w, h) = image.dimensions();
    if w <= frame.width && h <= frame.height {
        return image.clone();
    }

    let scale = f64::min(
        frame.width as f64 / w as f64,
        frame.height as f64 / h as f64,
    );
    let new_w = ((w as f64 * scale).round() as u32).clamp(1, frame.width);
    let new_h = ((h as f64 * scale).round() as u32).clamp(1, frame.height);
    imageops::resize(image, new_w, new_h, FilterType::Triangle)
}

fn composite_rgba(canvas: &mut RgbImage, overlay: &RgbaImage, (left, top): (u32, u32)) {
    for (ox, oy, pixel) in overlay.enumerate_pixels() {
        let (x, y) = (left + ox, top + oy);
        if x >= canvas.width() || y >= canvas.height() {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        let dst = canvas.get_pixel_mut(x, y);
        *dst = blend(*dst, Rgb([r, g, b]), a);
    }
}
