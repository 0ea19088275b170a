pub mod api;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod generator;
pub mod logger;
pub mod models;
pub mod view;

pub use api::{EmojiApi, EmojiApiClient, EmojiClient, FontClient};
pub use color::{hex_to_rgba, rgba_to_hex, Channel, ColorParseError, RgbaColor, PRESET_COLORS};
pub use config::{ApiConfig, Config, GeneratorConfig};
pub use error::{EmojiError, Result};
pub use generator::{
    ColorTarget, GenerationController, GenerationState, ImageHandle, ImageStore, ObjectUrl,
};
pub use models::*;
