use crate::{
    error::{EmojiError, Result},
    logger,
    models::{BinaryImage, RenderRequest},
};
use reqwest::{header::CONTENT_TYPE, Client};

#[derive(Clone)]
pub struct EmojiClient {
    client: Client,
    base_url: String,
}

impl EmojiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<BinaryImage> {
        let url = format!("{}/emoji", self.base_url);
        let _timer = logger::timer("render emoji");

        log::info!(
            "Rendering '{}' with typeface {}",
            request.text,
            request.typeface_name
        );
        log::debug!(
            "Render request payload: {}",
            serde_json::to_string(request).unwrap_or_default()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmojiError::Request(format!("Render request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Render endpoint returned {}", status);
            return Err(EmojiError::fetch(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EmojiError::Request(format!("Failed to read image body: {}", e)))?;

        log::debug!("Received {} image bytes", bytes.len());

        Ok(BinaryImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
