// file: src/recognition/mod.rs
// description: image to text capability backed by an external ocr command
// reference: https://docs.rs/tokio/latest/tokio/process

use crate::config::RecognitionConfig;
use crate::error::{ResolverError, Result};
use crate::models::RecognizedText;
use crate::utils::Validator;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

const IMAGE_PLACEHOLDER: &str = "{image}";

/// Extracts text from a captured image. Returning empty text is not an error.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<RecognizedText>;
}

/// Runs an OCR program and treats each non-empty stdout line as one
/// recognized observation.
pub struct CommandRecognizer {
    config: RecognitionConfig,
}

impl CommandRecognizer {
    pub fn new(config: RecognitionConfig) -> Self {
        Self { config }
    }

    pub fn command_args(&self, image: &Path) -> Vec<String> {
        let image = image.display().to_string();
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace(IMAGE_PLACEHOLDER, &image))
            .collect();

        if !self.config.args.iter().any(|arg| arg.contains(IMAGE_PLACEHOLDER)) {
            args.push(image);
        }

        args
    }
}

#[async_trait]
impl TextRecognizer for CommandRecognizer {
    async fn recognize(&self, image: &Path) -> Result<RecognizedText> {
        Validator::validate_image_path(image)?;

        info!("Recognizing text in {}", image.display());

        let output = Command::new(&self.config.command)
            .args(self.command_args(image))
            .output()
            .await
            .map_err(|e| {
                ResolverError::Recognition(format!(
                    "failed to launch '{}': {}",
                    self.config.command, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolverError::Recognition(format!(
                "'{}' exited with {}: {}",
                self.config.command,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = RecognizedText::from_lines(stdout.lines());
        debug!(
            "Recognized text: {}",
            Validator::truncate_text(text.as_str(), 120)
        );

        Ok(text)
    }
}
