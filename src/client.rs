use std::future::Future;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::{
    config::EndpointConfig,
    error::{ConfigError, SubmitError},
    selection::SelectedImage,
};

/// Anything that can turn an image into an analysis payload.
pub trait Analyzer {
    fn analyze(
        &self,
        image: &SelectedImage,
    ) -> impl Future<Output = Result<Value, SubmitError>> + Send;
}

// --- Client Implementation ---

pub struct AnalysisClient {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl AnalysisClient {
    pub fn new(config: EndpointConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(config.headers().clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    async fn send_request(&self, image: &SelectedImage) -> Result<Value, SubmitError> {
        let part = Part::stream_with_length(image.bytes().clone(), image.len() as u64)
            .file_name(image.file_name().to_string())
            .mime_str(image.content_type())
            .map_err(SubmitError::Request)?;
        let form = Form::new().part(self.config.field_name().to_string(), part);

        info!(
            "uploading {} ({} bytes, {}) to {}",
            image.file_name(),
            image.len(),
            image.content_type(),
            self.config.endpoint()
        );

        let response = self
            .client
            .post(self.config.endpoint().clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("endpoint answered {} with {} bytes", status, text.len());
        Ok(serde_json::from_str(&text)?)
    }
}

impl Analyzer for AnalysisClient {
    async fn analyze(&self, image: &SelectedImage) -> Result<Value, SubmitError> {
        self.send_request(image).await
    }
}
