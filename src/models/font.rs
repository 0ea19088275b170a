use serde::{Deserialize, Serialize};

/// Category used for directory entries that do not declare one.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCategory {
    pub name: String,
    pub fonts: Vec<Font>,
}

impl FontCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fonts: Vec::new(),
        }
    }

    pub fn with_font(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fonts.push(Font {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// First font of the first category, the default selection.
pub fn first_font(categories: &[FontCategory]) -> Option<&Font> {
    categories.first().and_then(|category| category.fonts.first())
}

pub fn contains_font(categories: &[FontCategory], value: &str) -> bool {
    categories
        .iter()
        .flat_map(|category| category.fonts.iter())
        .any(|font| font.value == value)
}
