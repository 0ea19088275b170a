use std::env;
use std::time::Duration;

use crate::models::{EMOJI_HEIGHT, EMOJI_WIDTH};

pub const BASE_URL_ENV: &str = "EMOJI_API_BASE_URL";
pub const DEBOUNCE_ENV: &str = "EMOJI_DEBOUNCE_MS";

/// Delay between the last edit and the render request.
pub const DEFAULT_DEBOUNCE_MS: u64 = 750;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub debounce_ms: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub generator: GeneratorConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: None,
            use_system_proxy: true,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV).ok().filter(|url| !url.trim().is_empty());

        ApiConfig {
            base_url,
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            width: EMOJI_WIDTH,
            height: EMOJI_HEIGHT,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let debounce_ms = env::var(DEBOUNCE_ENV)
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        GeneratorConfig {
            debounce_ms,
            ..Default::default()
        }
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            api: ApiConfig::from_env(),
            generator: GeneratorConfig::from_env(),
        }
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }
}
