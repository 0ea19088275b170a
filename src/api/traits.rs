use crate::{
    error::Result,
    models::{BinaryImage, FontCategory, RenderRequest},
};
use async_trait::async_trait;

/// The remote operations the generation controller depends on.
#[async_trait]
pub trait EmojiApi: Send + Sync {
    async fn fetch_font_directory(&self) -> Result<Vec<FontCategory>>;

    async fn render_emoji(&self, request: &RenderRequest) -> Result<BinaryImage>;
}
