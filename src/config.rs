//! Run configuration: defaults, prompt file fallbacks, and the model list.

use crate::error::{Result, SheetError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default generation service endpoint (local Stable Diffusion WebUI).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7860";
/// Default directory for finished contact sheets.
pub const DEFAULT_SAVE_DIR: &str = "comparisons";
/// Default number of images generated per model.
pub const DEFAULT_BATCH_SIZE: u32 = 5;
/// Default sampling steps.
pub const DEFAULT_STEPS: u32 = 25;
/// Default seed; -1 draws a random seed once per run.
pub const DEFAULT_SEED: i64 = -1;
/// Default de-noising strength for the hi-res fix.
pub const DEFAULT_DENOISE: f64 = 0.7;
/// Default classifier-free guidance scale.
pub const DEFAULT_CFG_SCALE: f64 = 7.0;
/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 512;
/// Default output height in pixels.
pub const DEFAULT_HEIGHT: u32 = 512;
/// Default CLIP skip sent when activating a checkpoint.
pub const DEFAULT_CLIP_SKIP: u32 = 2;
/// Default ImageMagick binary name.
pub const DEFAULT_MAGICK_BIN: &str = "convert";

/// Shared settings for one comparison run, applied to every model.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base URL of the generation service.
    pub base_url: String,
    /// Directory the finished sheet and sidecar are written to.
    pub save_dir: PathBuf,
    /// Positive prompt shared by all models.
    pub prompt: String,
    /// Negative prompt shared by all models.
    pub negative_prompt: String,
    /// Images generated per model (one row's worth).
    pub batch_size: u32,
    /// Sampling steps.
    pub steps: u32,
    /// Seed; -1 means draw once per run and reuse for every model.
    pub seed: i64,
    /// Enable the hi-res fix.
    pub hires: bool,
    /// De-noising strength.
    pub denoise: f64,
    /// Classifier-free guidance scale.
    pub cfg_scale: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// CLIP skip applied when switching checkpoints.
    pub clip_skip: u32,
    /// Ask the service to restore faces.
    pub restore_faces: bool,
    /// ImageMagick binary used for composition.
    pub magick_bin: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            prompt: String::new(),
            negative_prompt: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            steps: DEFAULT_STEPS,
            seed: DEFAULT_SEED,
            hires: false,
            denoise: DEFAULT_DENOISE,
            cfg_scale: DEFAULT_CFG_SCALE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            clip_skip: DEFAULT_CLIP_SKIP,
            restore_faces: true,
            magick_bin: DEFAULT_MAGICK_BIN.to_string(),
        }
    }
}

/// One checkpoint to compare, with keywords appended to the prompt
/// for this model only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Checkpoint title as the service reports it.
    pub model: String,
    /// Extra prompt keywords for this model; empty means none.
    #[serde(default)]
    pub keywords: String,
}

impl ModelEntry {
    /// Creates an entry with no extra keywords.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            keywords: String::new(),
        }
    }
}

/// Resolves the run seed: -1 draws a random seed, anything else passes
/// through. Called once per run so every model shares the same seed.
pub fn resolve_seed(seed: i64) -> i64 {
    if seed == -1 {
        rand::thread_rng().gen_range(0..i64::MAX)
    } else {
        seed
    }
}

/// Returns the CLI-provided prompt, or falls back to reading `fallback`
/// when the flag is absent or empty.
pub fn load_prompt(value: Option<String>, fallback: &Path) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => fs::read_to_string(fallback)
            .map(|s| s.trim_end().to_string())
            .map_err(|source| SheetError::PromptFile {
                path: fallback.to_path_buf(),
                source,
            }),
    }
}

/// Loads an explicit model list from a JSON file:
/// `[{"model": "...", "keywords": "..."}, ...]`.
pub fn load_models_file(path: &Path) -> Result<Vec<ModelEntry>> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
