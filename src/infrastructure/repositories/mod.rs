pub mod google_tts_repository;
pub mod logo_repository;
pub mod tts_repository;

pub use google_tts_repository::GoogleTtsRepository;
pub use logo_repository::{HttpLogoRepository, LogoRepository};
pub use tts_repository::{TtsProviderError, TtsRepository};
