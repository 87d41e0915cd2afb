//! Multipart intake for the endpoints that mix text fields with an image
//! upload (posts, cats, profile).

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::images::ImageUpload;

pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn required_text(&self, name: &str, message: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::Validation(message.to_string()))
    }
}

/// Drain a multipart body. The field named `image_field` (when carrying a
/// file) becomes the upload; everything else is collected as text.
pub async fn read_form(mut mp: Multipart, image_field: &str) -> Result<FormData, ApiError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == image_field && field.file_name().is_some() {
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".into());
            let body = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            image = Some(ImageUpload { body, content_type });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok(FormData { fields, image })
}

pub fn check_max_len(value: &str, max: usize, message: &str) -> Result<(), ApiError> {
    if value.chars().count() > max {
        Err(ApiError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> FormData {
        FormData {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn empty_text_counts_as_absent() {
        let f = form(&[("description", "")]);
        assert_eq!(f.text("description"), None);
        assert!(f
            .required_text("description", "La descripción es obligatoria.")
            .is_err());
    }

    #[test]
    fn required_text_returns_value() {
        let f = form(&[("name", "Garfield")]);
        assert_eq!(f.required_text("name", "obligatorio").unwrap(), "Garfield");
    }

    #[test]
    fn max_len_counts_chars_not_bytes() {
        let three_chars = "ñññ";
        assert!(check_max_len(three_chars, 3, "demasiado largo").is_ok());
        assert!(check_max_len(three_chars, 2, "demasiado largo").is_err());
    }
}
