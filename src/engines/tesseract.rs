//! Tesseract OCR engine.

use std::fs::read_to_string;

use tokio::process::Command;

use crate::{
    command::{check_for_command_failure, run_command},
    error::RecognizeError,
    prelude::*,
};

use super::Recognizer;

/// Tesseract's complaint when the requested `.traineddata` isn't installed.
const MISSING_LANGUAGE_MARKER: &str = "Failed loading language";

/// OCR engine wrapping the `tesseract` CLI tool.
pub struct TesseractRecognizer {
    /// Path to `tesseract`.
    tesseract_cmd: PathBuf,
}

impl TesseractRecognizer {
    /// Create a new `tesseract` engine.
    pub fn new(tesseract_cmd: PathBuf) -> Self {
        Self { tesseract_cmd }
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    #[instrument(level = "debug", skip_all, fields(image = %image_path.display(), language = %language))]
    async fn recognize(
        &self,
        image_path: &Path,
        language: &str,
    ) -> Result<String, RecognizeError> {
        // Tesseract wants an output base name, and adds `.txt` itself.
        let tmpdir = tempfile::TempDir::with_prefix("tesseract").map_err(|err| {
            RecognizeError::Failed(format!("cannot create tesseract output directory: {err}"))
        })?;
        let output_base = tmpdir.path().join("output");
        let output_path = output_base.with_extension("txt");

        // Run tesseract on the input file.
        let mut cmd = Command::new(&self.tesseract_cmd);
        cmd.arg(image_path)
            .arg(&output_base)
            .arg("-l")
            .arg(language);
        let output = run_command("tesseract", &self.tesseract_cmd, &mut cmd).await?;

        if let Err(err) = check_for_command_failure("tesseract", &output, None) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(if stderr.contains(MISSING_LANGUAGE_MARKER) {
                RecognizeError::Unavailable {
                    engine: "tesseract".to_owned(),
                    reason: format!("language data for {language:?} is not installed"),
                }
            } else {
                RecognizeError::Failed(format!("{err:#}"))
            });
        }

        // Read the output file.
        read_to_string(&output_path).map_err(|err| {
            RecognizeError::Failed(format!("cannot read tesseract output file: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tesseract_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("blank.png");
        image::GrayImage::new(8, 8).save(&image_path).unwrap();

        let recognizer =
            TesseractRecognizer::new(PathBuf::from("/nonexistent/bin/tesseract"));
        let result = recognizer.recognize(&image_path, "tam").await;
        assert!(matches!(result, Err(RecognizeError::Unavailable { .. })));
    }

    #[tokio::test]
    #[ignore = "Requires tesseract to be installed"]
    async fn blank_images_have_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("blank.png");
        image::GrayImage::from_pixel(200, 200, image::Luma([255]))
            .save(&image_path)
            .unwrap();

        let recognizer = TesseractRecognizer::new(PathBuf::from("tesseract"));
        let text = recognizer.recognize(&image_path, "eng").await.unwrap();
        assert_eq!(text.trim(), "");
    }

    #[tokio::test]
    #[ignore = "Requires tesseract to be installed"]
    async fn missing_languages_are_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("blank.png");
        image::GrayImage::new(8, 8).save(&image_path).unwrap();

        let recognizer = TesseractRecognizer::new(PathBuf::from("tesseract"));
        let result = recognizer.recognize(&image_path, "zz_not_a_language").await;
        assert!(matches!(result, Err(RecognizeError::Unavailable { .. })));
    }
}
