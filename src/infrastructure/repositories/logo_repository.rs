use async_trait::async_trait;
use image::RgbaImage;

/// Source of the channel logo shown on the promotional card.
#[async_trait]
pub trait LogoRepository: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RgbaImage, String>;
}

/// Downloads the logo over HTTP and decodes whatever image format comes back.
pub struct HttpLogoRepository {
    http_client: reqwest::Client,
}

impl HttpLogoRepository {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl LogoRepository for HttpLogoRepository {
    async fn fetch(&self, url: &str) -> Result<RgbaImage, String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("logo request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("logo request returned {}", response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read logo body: {}", e))?;

        let logo = image::load_from_memory(&bytes)
            .map_err(|e| format!("failed to decode logo: {}", e))?
            .to_rgba8();

        tracing::debug!(
            url = url,
            width = logo.width(),
            height = logo.height(),
            "Logo downloaded"
        );

        Ok(logo)
    }
}
