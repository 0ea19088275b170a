//! Pure views over [`GenerationState`]: what the preview shows, what the font
//! selector lists, and what a download would write.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use colored::*;

use crate::{
    color::{hex_to_rgba, is_preset_active, PRESET_COLORS},
    error::{EmojiError, Result},
    generator::{ColorTarget, GenerationState, ImageHandle, ImageStore, ERROR_PLACEHOLDER_IMAGE},
    models::FontCategory,
};

pub const DEFAULT_DOWNLOAD_NAME: &str = "emoji.png";
pub const FONTS_LOADING_LABEL: &str = "Loading fonts...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    Loading,
    Image(ImageHandle),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub body: PreviewBody,
    pub error: Option<String>,
    pub download_name: Option<String>,
}

pub fn preview(state: &GenerationState) -> PreviewView {
    let body = match (&state.image, state.is_loading) {
        (_, true) => PreviewBody::Loading,
        (Some(handle), false) => PreviewBody::Image(handle.clone()),
        (None, false) => PreviewBody::Empty,
    };
    let download_name = match body {
        PreviewBody::Image(_) => Some(download_name(&state.text)),
        _ => None,
    };

    PreviewView {
        body,
        error: state.error.clone(),
        download_name,
    }
}

/// `<text>.png` with path separators replaced, or `emoji.png` for empty text.
pub fn download_name(text: &str) -> String {
    if text.is_empty() {
        return DEFAULT_DOWNLOAD_NAME.to_string();
    }
    let safe: String = text
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}.png", safe)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn path_in(&self, dir: impl Into<PathBuf>) -> PathBuf {
        dir.into().join(&self.file_name)
    }
}

/// The file a download would produce right now, if the preview offers one.
pub fn download(state: &GenerationState, images: &ImageStore) -> Result<Option<Download>> {
    let view = preview(state);
    let (PreviewBody::Image(handle), Some(file_name)) = (view.body, view.download_name) else {
        return Ok(None);
    };

    let bytes = match &handle {
        ImageHandle::Object(url) => match images.resolve(url) {
            Some(image) => image.bytes.clone(),
            None => {
                log::warn!("{} was already released", url);
                return Ok(None);
            }
        },
        ImageHandle::Placeholder => placeholder_bytes()?,
    };

    Ok(Some(Download { file_name, bytes }))
}

/// Decodes the embedded placeholder data URL into SVG bytes.
pub fn placeholder_bytes() -> Result<Vec<u8>> {
    let encoded = ERROR_PLACEHOLDER_IMAGE
        .split_once(";base64,")
        .map(|(_, data)| data)
        .ok_or_else(|| EmojiError::Unknown("placeholder is not a base64 data URL".into()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| EmojiError::Unknown(format!("placeholder decode failed: {}", e)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontOption {
    pub group: String,
    pub label: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSelector {
    /// Disabled while the directory has not loaded.
    Loading,
    Options(Vec<FontOption>),
}

pub fn font_selector(categories: &[FontCategory], selected: &str) -> FontSelector {
    if categories.is_empty() {
        return FontSelector::Loading;
    }
    FontSelector::Options(
        categories
            .iter()
            .flat_map(|category| {
                category.fonts.iter().map(move |font| FontOption {
                    group: category.name.clone(),
                    label: font.name.clone(),
                    value: font.value.clone(),
                    selected: font.value == selected,
                })
            })
            .collect(),
    )
}

fn swatch(hex: &str) -> String {
    match hex_to_rgba(hex) {
        Ok(c) => "  ".on_truecolor(c.r, c.g, c.b).to_string(),
        Err(_) => "  ".to_string(),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn render_settings(state: &GenerationState) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", "text:".bold(), state.text),
        format!(
            "{} {}",
            "font:".bold(),
            if state.typeface.is_empty() {
                "-"
            } else {
                state.typeface.as_str()
            }
        ),
        format!(
            "{} {} {}",
            "text color:".bold(),
            swatch(&state.text_color),
            state.text_color
        ),
        format!(
            "{} {} {} ({})",
            "background:".bold(),
            swatch(&state.background_color),
            state.background_color,
            on_off(state.use_background_color)
        ),
        format!(
            "{} {}  {} {}  {} {}",
            "align:".bold(),
            state.align,
            "fixed size:".bold(),
            on_off(state.size_fixed),
            "no stretch:".bold(),
            on_off(state.stretch_disabled)
        ),
    ];

    let active: Vec<&str> = PRESET_COLORS
        .iter()
        .copied()
        .filter(|preset| is_preset_active(state.color(ColorTarget::Text), preset))
        .collect();
    if !active.is_empty() {
        lines.push(format!("{} {}", "preset:".bold(), active.join(", ")));
    }
    lines
}

pub fn render_preview(view: &PreviewView) -> Vec<String> {
    let mut lines = Vec::new();
    match &view.body {
        PreviewBody::Loading => lines.push("⏳ generating...".yellow().to_string()),
        PreviewBody::Image(ImageHandle::Placeholder) => {
            lines.push("🖼️  (placeholder)".bright_black().to_string())
        }
        PreviewBody::Image(handle) => lines.push(format!("🖼️  {}", handle.url().green())),
        PreviewBody::Empty => lines.push("(nothing to show)".bright_black().to_string()),
    }
    if let Some(error) = &view.error {
        lines.push(error.red().to_string());
    }
    if let Some(name) = &view.download_name {
        lines.push(format!("💾 save → {}", name));
    }
    lines
}

pub fn render_fonts(selector: &FontSelector) -> Vec<String> {
    match selector {
        FontSelector::Loading => vec![FONTS_LOADING_LABEL.bright_black().to_string()],
        FontSelector::Options(options) => {
            let mut lines = Vec::new();
            let mut group: Option<&str> = None;
            for option in options {
                if group != Some(option.group.as_str()) {
                    lines.push(option.group.bold().to_string());
                    group = Some(option.group.as_str());
                }
                let marker = if option.selected { "*" } else { " " };
                lines.push(format!(" {} {}", marker, option.label));
            }
            lines
        }
    }
}
