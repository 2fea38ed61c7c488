//! CLI for sdsheet - Stable Diffusion model comparison contact sheets.

use clap::Parser;
use sdsheet::api::SdClient;
use sdsheet::compose::Compositor;
use sdsheet::{config, ModelEntry, RunConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sdsheet")]
#[command(about = "Generate batches of Stable Diffusion outputs for multiple models to easily compare the same prompt")]
#[command(version)]
struct Cli {
    /// Text prompt to run. Leave blank to load ./prompt.txt
    #[arg(short = 'p', long)]
    prompt: Option<String>,

    /// Negative prompt. Leave blank to load ./prompt_neg.txt
    #[arg(short = 'n', long)]
    negative_prompt: Option<String>,

    /// Number of images to generate per model
    #[arg(short = 'b', long, default_value_t = config::DEFAULT_BATCH_SIZE)]
    batch_size: u32,

    /// Sampling steps
    #[arg(short = 's', long, default_value_t = config::DEFAULT_STEPS)]
    steps: u32,

    /// Seed to use for every model; -1 picks a random seed once per run
    #[arg(short = 'd', long, default_value_t = config::DEFAULT_SEED, allow_hyphen_values = true)]
    seed: i64,

    /// Enable hi-res fix
    #[arg(short = 'H', long)]
    hires: bool,

    /// De-noising strength
    #[arg(short = 'D', long, default_value_t = config::DEFAULT_DENOISE)]
    denoise: f64,

    /// Config scale
    #[arg(short = 'c', long, default_value_t = config::DEFAULT_CFG_SCALE)]
    cfg: f64,

    /// Base URL of the generation service
    #[arg(long, default_value = config::DEFAULT_BASE_URL)]
    url: String,

    /// Directory the contact sheet and metadata are written to
    #[arg(long, default_value = config::DEFAULT_SAVE_DIR)]
    save_dir: PathBuf,

    /// Output image width
    #[arg(long, default_value_t = config::DEFAULT_WIDTH)]
    width: u32,

    /// Output image height
    #[arg(long, default_value_t = config::DEFAULT_HEIGHT)]
    height: u32,

    /// CLIP skip applied when switching checkpoints
    #[arg(long, default_value_t = config::DEFAULT_CLIP_SKIP)]
    clip_skip: u32,

    /// JSON file listing the models to compare; omit to compare every
    /// model the service reports
    #[arg(long)]
    models_file: Option<PathBuf>,

    /// Disable face restoration
    #[arg(long)]
    no_restore_faces: bool,

    /// ImageMagick binary used for composition
    #[arg(long, default_value = config::DEFAULT_MAGICK_BIN)]
    magick_bin: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let models: Vec<ModelEntry> = match &cli.models_file {
        Some(path) => config::load_models_file(path)?,
        None => Vec::new(),
    };

    let run_config = RunConfig {
        base_url: cli.url,
        save_dir: cli.save_dir,
        prompt: config::load_prompt(cli.prompt, Path::new("prompt.txt"))?,
        negative_prompt: config::load_prompt(cli.negative_prompt, Path::new("prompt_neg.txt"))?,
        batch_size: cli.batch_size,
        steps: cli.steps,
        seed: cli.seed,
        hires: cli.hires,
        denoise: cli.denoise,
        cfg_scale: cli.cfg,
        width: cli.width,
        height: cli.height,
        clip_skip: cli.clip_skip,
        restore_faces: !cli.no_restore_faces,
        magick_bin: cli.magick_bin,
    };

    let client = SdClient::builder().base_url(&run_config.base_url).build();
    let compositor = Compositor::new(&run_config.magick_bin);

    let artifacts = sdsheet::sheet::run(&run_config, &models, &client, &compositor).await?;

    println!(
        "Contact sheet for {} models: {}",
        artifacts.models,
        artifacts.sheet.display()
    );
    println!("Generation parameters: {}", artifacts.sidecar.display());

    Ok(())
}
