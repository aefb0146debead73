pub mod font;
pub mod layout;
pub mod promo;
pub mod renderer;
pub mod style;

pub use font::CaptionFont;
pub use promo::PromoContent;
pub use renderer::CaptionRenderer;
pub use style::{BackgroundImage, BackgroundMode, CaptionStyle, Color, ColorParseError, FrameSize};

/// Vertical 9:16 frame used for every caption and promotional image.
pub const VIDEO_FRAME: FrameSize = FrameSize {
    width: 1080,
    height: 1920,
};

pub const DEFAULT_FONT_SIZE: u32 = 50;
pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 200;

/// Total horizontal space kept free around a caption line.
pub const HORIZONTAL_MARGIN: u32 = 120;

/// Caption line advance, as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;
