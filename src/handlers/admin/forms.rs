use std::collections::HashMap;

use axum::extract::Multipart;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::media::ImageFile;

/// A fully drained multipart form: text fields and file fields, both
/// repeatable (gallery uploads and deletion lists arrive as repeats).
#[derive(Debug, Default)]
pub struct AdminForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<ImageFile>>,
}

impl AdminForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = AdminForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed form data: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed file field: {}", e)))?;
                form.files.entry(name).or_default().push(ImageFile {
                    file_name: Some(file_name),
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed text field: {}", e)))?;
                form.fields.entry(name).or_default().push(text);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn texts(&self, name: &str) -> Vec<String> {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// First value, trimmed, with empty treated as absent.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// First value trimmed, or the empty string when absent. Requiredness
    /// is enforced by workflow validation, not here.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().trim().to_string()
    }

    pub fn parse_i32(&self, name: &str) -> Option<i32> {
        self.non_empty(name).and_then(|s| s.parse().ok())
    }

    pub fn parse_f64(&self, name: &str) -> Option<f64> {
        self.non_empty(name).and_then(|s| s.parse().ok())
    }

    pub fn parse_uuid(&self, name: &str) -> Option<Uuid> {
        self.non_empty(name).and_then(|s| Uuid::parse_str(&s).ok())
    }

    /// First non-empty file for the field, if any.
    pub fn file(&self, name: &str) -> Option<ImageFile> {
        self.files
            .get(name)
            .and_then(|files| files.iter().find(|f| !f.is_empty()))
            .cloned()
    }

    /// All non-empty files for the field, in submission order.
    pub fn all_files(&self, name: &str) -> Vec<ImageFile> {
        self.files
            .get(name)
            .map(|files| files.iter().filter(|f| !f.is_empty()).cloned().collect())
            .unwrap_or_default()
    }

    /// Echo of the submitted text fields for form re-display on failure.
    pub fn values(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, values) in &self.fields {
            if values.len() == 1 {
                map.insert(name.clone(), json!(values[0]));
            } else {
                map.insert(name.clone(), json!(values));
            }
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_yields_empty_not_an_error() {
        let form = AdminForm::default();
        assert_eq!(form.text_or_empty("title"), "");
        assert_eq!(form.non_empty("title"), None);
        assert!(form.texts("imagesToDelete").is_empty());
    }

    #[test]
    fn text_or_empty_trims() {
        let mut form = AdminForm::default();
        form.fields
            .insert("title".to_string(), vec!["  Villa  ".to_string()]);
        assert_eq!(form.text_or_empty("title"), "Villa");
    }
}
