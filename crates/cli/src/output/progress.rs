//! Progress display for multi-file transfers

use super::OutputConfig;

/// File-count progress bar, hidden in quiet or JSON mode or with --no-progress
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a bar for `total` files
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        if config.quiet || config.json || config.no_progress || total < 2 {
            return Self { bar: None };
        }

        let bar = indicatif::ProgressBar::new(total);
        match indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
        {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!(error = %e, "invalid progress template"),
        }
        Self { bar: Some(bar) }
    }

    /// Show the file currently being transferred
    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}
