//! Image hosting seam. Files are forwarded to an external service and only
//! the URL it hands back is stored.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::CloudinaryConfig;

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload `bytes` and return the public URL of the stored image.
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String>;
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResult {
    secure_url: String,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .part("file", part);

        let result: UploadResult = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .context("image upload request failed")?
            .error_for_status()?
            .json()
            .await
            .context("unexpected image upload response")?;

        tracing::debug!(url = %result.secure_url, "image uploaded");
        Ok(result.secure_url)
    }
}
