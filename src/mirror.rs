//! Hook run by the host media pipeline after a file has been saved locally.
//!
//! Saved files are mirrored to the image provider unless they live in the
//! media root's temporary area.

use crate::image::Image;
use crate::provider::ImageProvider;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{info, warn};

/// Result reported by the host's file uploader: the directory and the file
/// name it saved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub path: String,
    pub file: String,
}

pub struct MediaMirror {
    provider: Box<dyn ImageProvider>,
    media_root: String,
    synchronised: Mutex<HashMap<String, String>>,
}

impl MediaMirror {
    pub fn new(provider: Box<dyn ImageProvider>, media_root: impl Into<String>) -> Self {
        let media_root = media_root.into();
        Self {
            provider,
            media_root: media_root.trim_end_matches('/').to_string(),
            synchronised: Mutex::new(HashMap::new()),
        }
    }

    /// Remote identifier to media-relative path for every image this mirror
    /// has uploaded.
    pub fn synchronised(&self) -> HashMap<String, String> {
        self.synchronised
            .lock()
            .map(|images| images.clone())
            .unwrap_or_default()
    }

    pub fn is_synchronised(&self, identifier: &str) -> bool {
        self.synchronised
            .lock()
            .map(|images| images.contains_key(identifier))
            .unwrap_or(false)
    }

    /// Mirror the saved file and hand the host's result back unchanged.
    pub async fn after_save(&self, result: SaveResult) -> Result<SaveResult> {
        let filepath = absolute_path(&result);

        if self.is_temporary_path(&filepath) {
            warn!("Skipping temporary upload {}", filepath);
            return Ok(result);
        }

        let relative = self.media_relative_path(&filepath).to_string();
        let image = Image::from_path_with_relative(filepath, relative)?;
        self.provider.upload(&image).await?;
        info!(
            "Mirrored {} ({})",
            image,
            image.relative_path().unwrap_or_default()
        );

        if let Ok(mut images) = self.synchronised.lock() {
            images.insert(
                image.identifier().to_string(),
                image.relative_path().unwrap_or_default().to_string(),
            );
        }

        Ok(result)
    }

    fn is_temporary_path(&self, filepath: &str) -> bool {
        filepath.starts_with(&format!("{}/tmp/", self.media_root))
    }

    fn media_relative_path<'a>(&self, filepath: &'a str) -> &'a str {
        filepath
            .strip_prefix(&self.media_root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(filepath)
    }
}

fn absolute_path(result: &SaveResult) -> String {
    format!(
        "{}/{}",
        result.path.trim_end_matches('/'),
        result.file.trim_start_matches('/')
    )
}
