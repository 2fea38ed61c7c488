//! ImageMagick driver for labeling and tiling rows.
//!
//! All composition is delegated to the ImageMagick CLI; this module only
//! builds argument lists and runs the binary, awaiting each invocation
//! before the pipeline moves on.

use crate::error::{Result, SheetError};
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command;

/// Point size used for row labels.
const LABEL_POINTSIZE: &str = "24";

/// Runs the external image tool for row and sheet composition.
#[derive(Debug, Clone)]
pub struct Compositor {
    binary: String,
}

impl Compositor {
    /// Creates a compositor driving the given ImageMagick binary,
    /// typically `convert` or `magick`.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Attaches a rotated text label to the left edge of `input`,
    /// writing the result to `output`.
    pub async fn label_image(&self, input: &Path, label: &str, output: &Path) -> Result<()> {
        self.run(label_args(input, label, output)).await
    }

    /// Horizontally appends `inputs` into a single row at `output`.
    pub async fn append_row(&self, inputs: &[impl AsRef<Path>], output: &Path) -> Result<()> {
        self.run(append_args(inputs, output, true)).await
    }

    /// Vertically stacks row images into the final sheet at `output`.
    pub async fn stack_rows(&self, inputs: &[impl AsRef<Path>], output: &Path) -> Result<()> {
        self.run(append_args(inputs, output, false)).await
    }

    async fn run(&self, args: Vec<OsString>) -> Result<()> {
        tracing::debug!(binary = %self.binary, ?args, "running compositor");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| SheetError::Compositor(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SheetError::Compositor(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Arguments for the rotate + label + re-rotate pass on a row's first
/// image: the image is turned sideways, the caption appended above it,
/// and the pair rotated back so the text reads bottom-to-top.
fn label_args(input: &Path, label: &str, output: &Path) -> Vec<OsString> {
    vec![
        input.into(),
        "-rotate".into(),
        "90".into(),
        "-background".into(),
        "black".into(),
        "-fill".into(),
        "white".into(),
        "-pointsize".into(),
        LABEL_POINTSIZE.into(),
        format!("label:{label}").into(),
        "+swap".into(),
        "-gravity".into(),
        "Center".into(),
        "-append".into(),
        "-rotate".into(),
        "270".into(),
        output.into(),
    ]
}

/// Arguments for `+append` (horizontal) or `-append` (vertical) over an
/// explicit input list.
fn append_args(inputs: &[impl AsRef<Path>], output: &Path, horizontal: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(inputs.len() + 2);
    args.push(if horizontal { "+append" } else { "-append" }.into());
    for input in inputs {
        args.push(input.as_ref().into());
    }
    args.push(output.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_label_args() {
        let args = label_args(
            Path::new("first.png"),
            "anything-v4.5.ckpt",
            Path::new("labeled.png"),
        );
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "first.png",
                "-rotate",
                "90",
                "-background",
                "black",
                "-fill",
                "white",
                "-pointsize",
                "24",
                "label:anything-v4.5.ckpt",
                "+swap",
                "-gravity",
                "Center",
                "-append",
                "-rotate",
                "270",
                "labeled.png",
            ]
        );
    }

    #[test]
    fn test_append_args_horizontal_keeps_input_order() {
        let inputs = [
            PathBuf::from("a.png"),
            PathBuf::from("b.png"),
            PathBuf::from("c.png"),
        ];
        let args = append_args(&inputs, Path::new("row.png"), true);
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args, vec!["+append", "a.png", "b.png", "c.png", "row.png"]);
    }

    #[test]
    fn test_append_args_vertical() {
        let inputs = [PathBuf::from("row0.png"), PathBuf::from("row1.png")];
        let args = append_args(&inputs, Path::new("sheet.png"), false);
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args, vec!["-append", "row0.png", "row1.png", "sheet.png"]);
    }
}
