//! The [`Image`] value object passed into and returned from providers.

use crate::{Error, Result};
use reqwest::Url;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    path: String,
    relative_path: Option<String>,
}

impl Image {
    /// Wrap a filesystem path or URL.
    pub fn from_path(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(Error::InvalidFormat("image path is empty".to_string()));
        }
        if split_file_name(file_name(&path)).0.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "image path '{}' has no file name",
                path
            )));
        }

        Ok(Self {
            path,
            relative_path: None,
        })
    }

    /// Wrap a path together with its media-root-relative form.
    pub fn from_path_with_relative(
        path: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Result<Self> {
        let mut image = Self::from_path(path)?;
        image.relative_path = Some(relative_path.into());
        Ok(image)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    /// Remote identifier: the file name without directories or its final
    /// extension. `media/catalog/summer.sale.jpg` becomes `summer.sale`.
    pub fn identifier(&self) -> &str {
        split_file_name(file_name(&self.path)).0
    }

    /// Final extension of the file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        split_file_name(file_name(&self.path)).1
    }
}

/// Last path segment. The query string and fragment are dropped only for
/// http(s) URLs; `?` and `#` are ordinary characters in local file names.
pub(crate) fn file_name(path: &str) -> &str {
    let path = if is_web_url(path) {
        path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path)
    } else {
        path
    };
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

fn is_web_url(path: &str) -> bool {
    Url::parse(path)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Split `name.ext` into `(name, Some(ext))`. Dot-files keep their name.
pub(crate) fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
