use crate::{
    error::{EmojiError, Result},
    models::{Font, FontCategory, UNCATEGORIZED},
};
use reqwest::Client;
use serde_json::Value;

#[derive(Clone)]
pub struct FontClient {
    client: Client,
    base_url: String,
}

impl FontClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_font_directory(&self) -> Result<Vec<FontCategory>> {
        let url = format!("{}/fonts", self.base_url);
        log::debug!("Fetching font directory from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EmojiError::Request(format!("Font directory request failed: {}", e)))?;

        if !response.status().is_success() {
            log::error!("Font directory returned {}", response.status());
            return Err(EmojiError::fetch(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EmojiError::Schema(format!("Font directory is not valid JSON: {}", e)))?;

        let categories = group_fonts(&body)?;
        log::info!(
            "Loaded {} fonts in {} categories",
            categories.iter().map(|c| c.fonts.len()).sum::<usize>(),
            categories.len()
        );
        Ok(categories)
    }
}

/// Groups `available_fonts` entries by their `typeface` field, keeping the
/// order in which categories first appear.
pub fn group_fonts(body: &Value) -> Result<Vec<FontCategory>> {
    let available = body
        .get("available_fonts")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            EmojiError::Schema("API response did not contain 'available_fonts' field.".into())
        })?;

    let mut categories: Vec<FontCategory> = Vec::new();
    for (font_name, info) in available {
        let category_name = info
            .get("typeface")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNCATEGORIZED);

        let font = Font {
            name: font_name.clone(),
            value: font_name.clone(),
        };

        match categories.iter_mut().find(|c| c.name == category_name) {
            Some(category) => category.fonts.push(font),
            None => categories.push(FontCategory {
                name: category_name.to_string(),
                fonts: vec![font],
            }),
        }
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_groups_in_first_seen_order() {
        let body = json!({
            "available_fonts": {
                "mplus-bold": { "typeface": "Gothic" },
                "noto-serif": { "typeface": "Mincho" },
                "mplus-light": { "typeface": "Gothic" },
                "mystery": {},
                "blank": { "typeface": "" }
            }
        });

        let categories = group_fonts(&body).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Gothic", "Mincho", "Uncategorized"]);

        let gothic: Vec<&str> = categories[0].fonts.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(gothic, vec!["mplus-bold", "mplus-light"]);
        assert_eq!(categories[2].fonts.len(), 2);
        assert_eq!(categories[0].fonts[0].name, "mplus-bold");
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let err = group_fonts(&json!({ "fonts": [] })).unwrap_err();
        assert!(matches!(err, EmojiError::Schema(_)));

        let err = group_fonts(&json!({ "available_fonts": null })).unwrap_err();
        assert!(matches!(err, EmojiError::Schema(_)));
    }

    #[test]
    fn test_empty_directory() {
        let categories = group_fonts(&json!({ "available_fonts": {} })).unwrap();
        assert!(categories.is_empty());
    }
}
