//! Typed payloads for the WebUI endpoints.

use crate::config::RunConfig;
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};

/// A model descriptor returned by `GET /sdapi/v1/sd-models`.
#[derive(Debug, Clone, Deserialize)]
pub struct SdModel {
    /// Checkpoint title; this is the value accepted by the options endpoint.
    pub title: String,
    /// Short model name.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Checkpoint hash.
    #[serde(default)]
    pub hash: Option<String>,
    /// On-disk checkpoint path.
    #[serde(default)]
    pub filename: Option<String>,
    /// Inference config path, when the checkpoint ships one.
    #[serde(default)]
    pub config: Option<String>,
}

/// Payload for `POST /sdapi/v1/options`, switching the active checkpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OptionsRequest {
    /// Checkpoint title to activate.
    pub sd_model_checkpoint: String,
    /// CLIP skip setting applied alongside the checkpoint switch.
    #[serde(rename = "CLIP_stop_at_last_layers")]
    pub clip_stop_at_last_layers: u32,
}

/// Payload for `POST /sdapi/v1/txt2img`, submitted once per model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Txt2ImgRequest {
    /// Full prompt for this model, keywords included.
    pub prompt: String,
    /// Negative prompt.
    pub negative_prompt: String,
    /// Images per generation call.
    pub batch_size: u32,
    /// Sampling steps.
    pub steps: u32,
    /// Seed; the same value is sent for every model in a run.
    pub seed: i64,
    /// Hi-res fix toggle.
    pub enable_hr: bool,
    /// De-noising strength.
    pub denoising_strength: f64,
    /// Classifier-free guidance scale.
    pub cfg_scale: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Face restoration toggle.
    pub restore_faces: bool,
}

impl Txt2ImgRequest {
    /// Builds the per-model request: shared config plus this model's
    /// keywords appended to the prompt. An empty keyword string leaves
    /// the prompt untouched.
    pub fn for_model(config: &RunConfig, seed: i64, keywords: &str) -> Self {
        let prompt = if keywords.is_empty() {
            config.prompt.clone()
        } else {
            format!("{}, {}", config.prompt, keywords)
        };

        Self {
            prompt,
            negative_prompt: config.negative_prompt.clone(),
            batch_size: config.batch_size,
            steps: config.steps,
            seed,
            enable_hr: config.hires,
            denoising_strength: config.denoise,
            cfg_scale: config.cfg_scale,
            width: config.width,
            height: config.height,
            restore_faces: config.restore_faces,
        }
    }
}

/// Response from `POST /sdapi/v1/txt2img`.
#[derive(Debug, Clone, Deserialize)]
pub struct Txt2ImgResponse {
    /// Base64-encoded images, in generation order. Entries may carry a
    /// metadata prefix separated from the payload by a comma.
    pub images: Vec<String>,
}

/// Decodes one image entry, stripping any metadata prefix up to the
/// first comma before base64-decoding.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    use base64::Engine;

    let data = match encoded.split_once(',') {
        Some((_, payload)) => payload,
        None => encoded,
    };

    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| SheetError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn test_config() -> RunConfig {
        RunConfig {
            prompt: "a watercolor fox".into(),
            negative_prompt: "blurry".into(),
            batch_size: 3,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_for_model_appends_keywords() {
        let req = Txt2ImgRequest::for_model(&test_config(), 7, "(modern disney style)");
        assert_eq!(req.prompt, "a watercolor fox, (modern disney style)");
        assert_eq!(req.negative_prompt, "blurry");
        assert_eq!(req.seed, 7);
    }

    #[test]
    fn test_for_model_empty_keywords_leaves_prompt_alone() {
        let req = Txt2ImgRequest::for_model(&test_config(), 7, "");
        assert_eq!(req.prompt, "a watercolor fox");
    }

    #[test]
    fn test_request_serializes_webui_field_names() {
        let req = Txt2ImgRequest::for_model(&test_config(), 123, "");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["prompt"], "a watercolor fox");
        assert_eq!(json["negative_prompt"], "blurry");
        assert_eq!(json["batch_size"], 3);
        assert_eq!(json["steps"], 25);
        assert_eq!(json["seed"], 123);
        assert_eq!(json["enable_hr"], false);
        assert_eq!(json["denoising_strength"], 0.7);
        assert_eq!(json["cfg_scale"], 7.0);
        assert_eq!(json["width"], 512);
        assert_eq!(json["height"], 512);
        assert_eq!(json["restore_faces"], true);
    }

    #[test]
    fn test_options_request_clip_field_name() {
        let req = OptionsRequest {
            sd_model_checkpoint: "anything-v4.5.ckpt".into(),
            clip_stop_at_last_layers: 2,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["sd_model_checkpoint"], "anything-v4.5.ckpt");
        assert_eq!(json["CLIP_stop_at_last_layers"], 2);
    }

    #[test]
    fn test_model_list_deserialization() {
        let json = r#"[
            {"title": "anything-v4.5.ckpt [7f96a1a9]", "model_name": "anything-v4.5", "hash": "7f96a1a9"},
            {"title": "bare.safetensors"}
        ]"#;
        let models: Vec<SdModel> = serde_json::from_str(json).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].title, "anything-v4.5.ckpt [7f96a1a9]");
        assert!(models[1].model_name.is_none());
    }

    #[test]
    fn test_decode_image_plain_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"imagebytes");
        assert_eq!(decode_image(&encoded).unwrap(), b"imagebytes");
    }

    #[test]
    fn test_decode_image_strips_metadata_prefix() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"imagebytes");
        let with_prefix = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_image(&with_prefix).unwrap(), b"imagebytes");
    }

    #[test]
    fn test_decode_image_invalid_base64_is_error() {
        let err = decode_image("not base64 at all!!!").unwrap_err();
        assert!(matches!(err, SheetError::Decode(_)));
    }
}
