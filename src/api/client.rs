//! HTTP client for the generation service.

use crate::api::types::{OptionsRequest, SdModel, Txt2ImgRequest, Txt2ImgResponse};
use crate::config::DEFAULT_BASE_URL;
use crate::error::{Result, SheetError};

/// Builder for [`SdClient`].
#[derive(Debug, Clone, Default)]
pub struct SdClientBuilder {
    base_url: Option<String>,
}

impl SdClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service base URL. Defaults to the local WebUI address.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> SdClient {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        SdClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Client for the Stable Diffusion WebUI API.
pub struct SdClient {
    client: reqwest::Client,
    base_url: String,
}

impl SdClient {
    /// Creates a new [`SdClientBuilder`].
    pub fn builder() -> SdClientBuilder {
        SdClientBuilder::new()
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists every model the service knows about.
    pub async fn models(&self) -> Result<Vec<SdModel>> {
        let url = format!("{}/sdapi/v1/sd-models", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await?;
        let models: Vec<SdModel> = serde_json::from_str(&text)
            .map_err(|e| SheetError::MalformedResponse(e.to_string()))?;
        tracing::debug!(count = models.len(), "fetched model list");
        Ok(models)
    }

    /// Switches the active checkpoint. The service applies this as a
    /// side effect; the response body is not inspected.
    pub async fn set_options(&self, checkpoint: &str, clip_skip: u32) -> Result<()> {
        let url = format!("{}/sdapi/v1/options", self.base_url);
        let body = OptionsRequest {
            sd_model_checkpoint: checkpoint.to_string(),
            clip_stop_at_last_layers: clip_skip,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        tracing::debug!(checkpoint, "checkpoint activated");
        Ok(())
    }

    /// Submits a synchronous generation request and returns the encoded
    /// images. A body that is not valid JSON aborts with
    /// [`SheetError::MalformedResponse`].
    pub async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResponse> {
        let url = format!("{}/sdapi/v1/txt2img", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await?;
        let parsed: Txt2ImgResponse = serde_json::from_str(&text)
            .map_err(|e| SheetError::MalformedResponse(e.to_string()))?;
        tracing::debug!(images = parsed.images.len(), "generation complete");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default_base_url() {
        let client = SdClient::builder().build();
        assert_eq!(client.base_url(), "http://127.0.0.1:7860");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = SdClient::builder().base_url("http://localhost:7860/").build();
        assert_eq!(client.base_url(), "http://localhost:7860");
    }
}
