use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;
use tracing::info;

use crate::config::CloudinaryConfig;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Image service is not configured")]
    NotConfigured,

    #[error("Image service rejected the upload: {0}")]
    Rejected(String),

    #[error("Image upload transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// An image file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Hosted image storage boundary: raw bytes in, stable public URL out.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, folder: &str) -> Result<String, UploadError>;
}

/// Cloudinary-backed uploader using the signed upload endpoint.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryError>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryError {
    message: String,
}

static SHARED: Lazy<CloudinaryUploader> = Lazy::new(|| {
    CloudinaryUploader::new(crate::config::config().cloudinary.clone())
});

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Process-wide instance built from the config singleton.
    pub fn shared() -> &'static CloudinaryUploader {
        &SHARED
    }

    fn is_configured(&self) -> bool {
        !self.config.cloud_name.is_empty()
            && !self.config.api_key.is_empty()
            && !self.config.api_secret.is_empty()
    }

    /// Cloudinary request signature: SHA-1 over the sorted parameter string
    /// with the API secret appended.
    fn sign(&self, folder: &str, timestamp: i64) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}{}",
            folder, timestamp, self.config.api_secret
        );
        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, bytes: Vec<u8>, folder: &str) -> Result<String, UploadError> {
        if !self.is_configured() {
            return Err(UploadError::NotConfigured);
        }

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(folder, timestamp);

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature)
            .text("folder", folder.to_string());

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let payload: CloudinaryResponse = response.json().await?;

        if let Some(error) = payload.error {
            return Err(UploadError::Rejected(error.message));
        }

        match payload.secure_url {
            Some(secure_url) => {
                info!(url = %secure_url, "uploaded image");
                Ok(secure_url)
            }
            None => Err(UploadError::Rejected(
                "upload response missing secure_url".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            property_folder: "props".to_string(),
            agent_folder: "agents".to_string(),
        }
    }

    #[test]
    fn signature_covers_folder_timestamp_and_secret() {
        let uploader = CloudinaryUploader::new(test_config());
        // SHA1("folder=props&timestamp=1700000000secret")
        let sig = uploader.sign("props", 1_700_000_000);
        assert_eq!(sig.len(), 40);
        assert_eq!(sig, uploader.sign("props", 1_700_000_000));
        assert_ne!(sig, uploader.sign("agents", 1_700_000_000));
    }

    #[tokio::test]
    async fn unconfigured_uploader_refuses() {
        let uploader = CloudinaryUploader::new(CloudinaryConfig {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            property_folder: "props".to_string(),
            agent_folder: "agents".to_string(),
        });
        let result = uploader.upload(vec![1, 2, 3], "props").await;
        assert!(matches!(result, Err(UploadError::NotConfigured)));
    }
}
