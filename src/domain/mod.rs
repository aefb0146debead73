pub mod caption;
pub mod segment;
pub mod tts;
pub mod video;
