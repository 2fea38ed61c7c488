#![warn(missing_docs)]
//! sdsheet - contact sheets for Stable Diffusion model comparisons.
//!
//! Generates a batch of images for each model known to a local Stable
//! Diffusion WebUI instance, labels each batch with its model name, and
//! tiles everything into a single contact sheet so the same prompt can
//! be compared across checkpoints at a glance. Image composition is
//! delegated to the ImageMagick CLI.
//!
//! # Quick Start
//!
//! ```no_run
//! use sdsheet::api::SdClient;
//! use sdsheet::compose::Compositor;
//! use sdsheet::RunConfig;
//!
//! #[tokio::main]
//! async fn main() -> sdsheet::Result<()> {
//!     let config = RunConfig {
//!         prompt: "a red fox in the snow".into(),
//!         ..RunConfig::default()
//!     };
//!     let client = SdClient::builder().base_url(&config.base_url).build();
//!     let compositor = Compositor::new(&config.magick_bin);
//!
//!     // An empty model list compares every checkpoint the service reports.
//!     let artifacts = sdsheet::sheet::run(&config, &[], &client, &compositor).await?;
//!     println!("wrote {}", artifacts.sheet.display());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod compose;
pub mod config;
mod error;
pub mod sheet;

pub use config::{ModelEntry, RunConfig};
pub use error::{Result, SheetError};
