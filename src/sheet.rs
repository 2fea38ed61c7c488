//! The generation workflow: one row per model, stacked into a contact
//! sheet with a sidecar recording the generation parameters.

use crate::api::{decode_image, SdClient, Txt2ImgRequest};
use crate::compose::Compositor;
use crate::config::{resolve_seed, ModelEntry, RunConfig};
use crate::error::{Result, SheetError};
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Paths of the artifacts a finished run produced.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// The contact sheet PNG.
    pub sheet: PathBuf,
    /// The sidecar text file holding the last generation payload.
    pub sidecar: PathBuf,
    /// Number of models compared (rows in the sheet).
    pub models: usize,
}

/// Derives the short display label for a checkpoint: the last path
/// segment when the identifier nests the model in subfolders.
pub fn display_label(model: &str) -> &str {
    model.rsplit(['\\', '/']).next().unwrap_or(model)
}

/// Runs the full comparison pipeline.
///
/// Models are processed strictly in order, one generation request in
/// flight at a time, with the compositor awaited before the next step.
/// An empty `models` slice enumerates every checkpoint the service
/// reports. Intermediate images live in a run-scoped temporary
/// directory that is removed when the run ends, successful or not.
pub async fn run(
    config: &RunConfig,
    models: &[ModelEntry],
    client: &SdClient,
    compositor: &Compositor,
) -> Result<RunArtifacts> {
    let models: Vec<ModelEntry> = if models.is_empty() {
        client
            .models()
            .await?
            .into_iter()
            .map(|m| ModelEntry::new(m.title))
            .collect()
    } else {
        models.to_vec()
    };

    if models.is_empty() {
        return Err(SheetError::NoModels);
    }

    let seed = resolve_seed(config.seed);
    let started = Local::now();
    let stamp = started.format("%y%m%d_%H%M%S").to_string();
    let tmp = tempfile::tempdir()?;

    let total = models.len();
    let mut rows: Vec<PathBuf> = Vec::with_capacity(total);
    let mut last_payload: Option<Txt2ImgRequest> = None;

    for (index, entry) in models.iter().enumerate() {
        tracing::info!(
            index = index + 1,
            total,
            model = %entry.model,
            "activating checkpoint"
        );
        client.set_options(&entry.model, config.clip_skip).await?;

        let request = Txt2ImgRequest::for_model(config, seed, &entry.keywords);
        tracing::info!(
            batch = request.batch_size,
            steps = request.steps,
            "generating images"
        );
        let response = client.txt2img(&request).await?;
        last_payload = Some(request);

        if response.images.is_empty() {
            return Err(SheetError::MalformedResponse(
                "no images in generation response".into(),
            ));
        }

        tracing::info!(count = response.images.len(), "saving generated images");
        let mut images: Vec<PathBuf> = Vec::with_capacity(response.images.len());
        for (i, encoded) in response.images.iter().enumerate() {
            let bytes = decode_image(encoded)?;
            let path = tmp.path().join(format!("model{index:03}_img{i:03}.png"));
            fs::write(&path, bytes)?;
            images.push(path);
        }

        let labeled = tmp.path().join(format!("model{index:03}_labeled.png"));
        compositor
            .label_image(&images[0], display_label(&entry.model), &labeled)
            .await?;

        let mut row_inputs = vec![labeled.clone()];
        row_inputs.extend(images.iter().skip(1).cloned());

        let row = tmp.path().join(format!("row{index:03}.png"));
        compositor.append_row(&row_inputs, &row).await?;

        for path in images.iter().chain(std::iter::once(&labeled)) {
            fs::remove_file(path)?;
        }
        rows.push(row);
    }

    tracing::info!("combining rows and saving generation metadata");
    fs::create_dir_all(&config.save_dir)?;

    let sheet = config.save_dir.join(format!("{stamp}.png"));
    compositor.stack_rows(&rows, &sheet).await?;
    for row in &rows {
        fs::remove_file(row)?;
    }

    let sidecar = config.save_dir.join(format!("{stamp}.txt"));
    if let Some(payload) = &last_payload {
        fs::write(&sidecar, serde_json::to_string_pretty(payload)?)?;
    }

    let elapsed = Local::now().signed_duration_since(started);
    tracing::info!(
        sheet = %sheet.display(),
        minutes = elapsed.num_seconds() / 60,
        seconds = elapsed.num_seconds() % 60,
        "contact sheet complete"
    );

    Ok(RunArtifacts {
        sheet,
        sidecar,
        models: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_backslash_path() {
        assert_eq!(
            display_label(r"_Model\anything-v4.5-pruned.ckpt"),
            "anything-v4.5-pruned.ckpt"
        );
        assert_eq!(
            display_label(r"_Style\nested\moDi-v1-pruned.ckpt"),
            "moDi-v1-pruned.ckpt"
        );
    }

    #[test]
    fn test_display_label_forward_slash_path() {
        assert_eq!(display_label("subdir/model.safetensors"), "model.safetensors");
    }

    #[test]
    fn test_display_label_no_separator() {
        assert_eq!(display_label("plain.ckpt"), "plain.ckpt");
    }
}
