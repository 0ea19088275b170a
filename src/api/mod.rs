pub mod emoji_client;
pub mod font_client;
pub mod traits;

use crate::{
    config::ApiConfig,
    error::{EmojiError, Result},
    models::{BinaryImage, FontCategory, RenderRequest},
};
use async_trait::async_trait;
use reqwest::Client;

pub use emoji_client::EmojiClient;
pub use font_client::{group_fonts, FontClient};
pub use traits::EmojiApi;

/// HTTP access to the emoji API: the font directory and the render endpoint
/// share one connection pool and base URL.
#[derive(Clone)]
pub struct EmojiApiClient {
    font_client: FontClient,
    emoji_client: EmojiClient,
    base_url: String,
}

impl EmojiApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| EmojiError::Config("API base URL is required".into()))?;

        let mut builder = Client::builder().user_agent(concat!("emojigen/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| EmojiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            font_client: FontClient::new(client.clone(), base_url.clone()),
            emoji_client: EmojiClient::new(client, base_url.clone()),
            base_url,
        })
    }

    pub fn fonts(&self) -> &FontClient {
        &self.font_client
    }

    pub fn emoji(&self) -> &EmojiClient {
        &self.emoji_client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EmojiApi for EmojiApiClient {
    async fn fetch_font_directory(&self) -> Result<Vec<FontCategory>> {
        self.font_client.fetch_font_directory().await
    }

    async fn render_emoji(&self, request: &RenderRequest) -> Result<BinaryImage> {
        self.emoji_client.render(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_base_url() {
        let err = EmojiApiClient::new(ApiConfig::new()).err().unwrap();
        assert!(matches!(err, EmojiError::Config(_)));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client =
            EmojiApiClient::new(ApiConfig::new().with_base_url("http://localhost:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
