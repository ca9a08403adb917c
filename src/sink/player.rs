// file: src/sink/player.rs
// description: hands the resolved video url to an external media player
// reference: https://docs.rs/tokio/latest/tokio/process

use crate::config::PlaybackConfig;
use crate::error::{ResolverError, Result};
use crate::models::ResolvedResult;
use crate::pipeline::Resolution;
use crate::sink::{ConsoleSink, ResultSink};
use crate::utils::Validator;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

const URL_PLACEHOLDER: &str = "{url}";

/// Plays found videos; not-found results fall back to a console notice.
pub struct PlayerSink {
    config: PlaybackConfig,
    notifier: ConsoleSink,
}

impl PlayerSink {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            notifier: ConsoleSink::new(false),
        }
    }

    /// Substitutes the url into the configured arguments, appending it when
    /// no argument carries the placeholder.
    pub fn player_args(&self, url: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace(URL_PLACEHOLDER, url))
            .collect();

        if !self.config.args.iter().any(|arg| arg.contains(URL_PLACEHOLDER)) {
            args.push(url.to_string());
        }

        args
    }

    async fn play(&self, url: &str) -> Result<()> {
        Validator::validate_playable_url(url)?;

        info!("Starting playback with {}: {}", self.config.command, url);

        let status = Command::new(&self.config.command)
            .args(self.player_args(url))
            .status()
            .await
            .map_err(|e| {
                ResolverError::Playback(format!(
                    "failed to launch '{}': {}",
                    self.config.command, e
                ))
            })?;

        if !status.success() {
            return Err(ResolverError::Playback(format!(
                "'{}' exited with {}",
                self.config.command, status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ResultSink for PlayerSink {
    async fn deliver(&self, resolution: &Resolution) -> Result<()> {
        match &resolution.result {
            ResolvedResult::Found(url) => self.play(url).await,
            ResolvedResult::NotFound => self.notifier.deliver(resolution).await,
        }
    }
}
