//! Client for the Stable Diffusion WebUI HTTP API.

mod client;
mod types;

pub use client::{SdClient, SdClientBuilder};
pub use types::{decode_image, OptionsRequest, SdModel, Txt2ImgRequest, Txt2ImgResponse};
