use std::fmt;
use std::str::FromStr;

use crate::{
    color::TRANSPARENT,
    config::GeneratorConfig,
    models::{FontCategory, RenderRequest, TextAlign},
};

use super::image_store::ImageHandle;

pub const DEFAULT_TEXT: &str = "絵文字";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffffff";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#000000ff";

/// Which of the two color inputs an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Text,
    Background,
}

impl fmt::Display for ColorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorTarget::Text => f.write_str("text"),
            ColorTarget::Background => f.write_str("background"),
        }
    }
}

impl FromStr for ColorTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "fg" => Ok(ColorTarget::Text),
            "bg" | "background" => Ok(ColorTarget::Background),
            other => Err(format!("unknown color target '{}'", other)),
        }
    }
}

/// Everything the form shows. `image`, `is_loading` and `error` are written
/// only by the render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationState {
    pub text: String,
    pub typeface: String,
    pub text_color: String,
    pub background_color: String,
    pub use_background_color: bool,
    pub align: TextAlign,
    pub size_fixed: bool,
    pub stretch_disabled: bool,
    pub font_categories: Vec<FontCategory>,
    pub image: Option<ImageHandle>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for GenerationState {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            typeface: String::new(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            use_background_color: false,
            align: TextAlign::Center,
            size_fixed: false,
            stretch_disabled: false,
            font_categories: Vec::new(),
            image: None,
            is_loading: false,
            error: None,
        }
    }
}

impl GenerationState {
    pub fn color(&self, target: ColorTarget) -> &str {
        match target {
            ColorTarget::Text => &self.text_color,
            ColorTarget::Background => &self.background_color,
        }
    }

    pub(crate) fn color_mut(&mut self, target: ColorTarget) -> &mut String {
        match target {
            ColorTarget::Text => &mut self.text_color,
            ColorTarget::Background => &mut self.background_color,
        }
    }

    /// The background sent to the renderer: transparent whenever the
    /// background is switched off, whatever the stored color says.
    pub fn effective_background(&self) -> &str {
        if self.use_background_color {
            &self.background_color
        } else {
            TRANSPARENT
        }
    }

    /// Builds the request for the current inputs. `None` while the text is
    /// empty or no typeface has been chosen.
    pub fn render_request(&self, config: &GeneratorConfig) -> Option<RenderRequest> {
        if self.text.is_empty() || self.typeface.is_empty() {
            return None;
        }

        Some(RenderRequest {
            text: self.text.clone(),
            width: config.width,
            height: config.height,
            align: self.align,
            color: self.text_color.clone(),
            background_color: self.effective_background().to_string(),
            typeface_name: self.typeface.clone(),
            size_fixed: self.size_fixed,
            disable_stretch: self.stretch_disabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready_state() -> GenerationState {
        GenerationState {
            typeface: "font1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let state = GenerationState::default();
        assert_eq!(state.text, "絵文字");
        assert_eq!(state.align, TextAlign::Center);
        assert!(!state.use_background_color);
        assert!(state.image.is_none());
        assert!(state.render_request(&GeneratorConfig::default()).is_none());
    }

    #[test]
    fn test_disabled_background_is_transparent() {
        let mut state = ready_state();
        state.background_color = "#ff000080".into();

        let request = state.render_request(&GeneratorConfig::default()).unwrap();
        assert_eq!(request.background_color, "#00000000");

        state.use_background_color = true;
        let request = state.render_request(&GeneratorConfig::default()).unwrap();
        assert_eq!(request.background_color, "#ff000080");
    }

    #[test]
    fn test_request_wire_format() {
        let mut state = ready_state();
        state.align = TextAlign::Right;
        state.size_fixed = true;

        let request = state.render_request(&GeneratorConfig::default()).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "text": "絵文字",
                "width": 128,
                "height": 128,
                "align": "right",
                "color": "#ffffffff",
                "background_color": "#00000000",
                "typeface_name": "font1",
                "size_fixed": true,
                "disable_stretch": false
            })
        );
    }

    #[test]
    fn test_empty_text_builds_nothing() {
        let state = GenerationState {
            text: String::new(),
            ..ready_state()
        };
        assert!(state.render_request(&GeneratorConfig::default()).is_none());
    }
}
