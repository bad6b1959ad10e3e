//! Credentials, cloud identity and environment configuration
//!
//! Credentials are plain values handed to each provider instance; nothing in
//! the crate keeps them in process-wide state.

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";
pub const DEFAULT_MEDIA_ROOT: &str = "pub/media";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

/// The account (cloud name) that owns the uploaded images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloud(String);

impl Cloud {
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub cloud: Cloud,
    pub credentials: Credentials,
    pub api_base: String,
    pub delivery_base: String,
    pub media_root: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        ignore_missing_env_file(dotenvy::dotenv())?;

        Ok(Self {
            cloud: Cloud::from_name(required("CLOUDINARY_CLOUD_NAME")?),
            credentials: Credentials::new(
                required("CLOUDINARY_API_KEY")?,
                required("CLOUDINARY_API_SECRET")?,
            ),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            delivery_base: std::env::var("CLOUDINARY_DELIVERY_BASE")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_BASE.to_string()),
            media_root: absolute_path(
                &std::env::var("MEDIA_ROOT").unwrap_or_else(|_| DEFAULT_MEDIA_ROOT.to_string()),
            )?,
        })
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn ignore_missing_env_file<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Resolve `path` against the working directory so it can be compared with
/// absolute paths reported by the host.
pub fn absolute_path(path: &str) -> Result<String> {
    let path = Path::new(path);
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(resolved.to_string_lossy().to_string())
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} not set", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials::new("aKey", "aSecret");
        let debug = format!("{:?}", credentials);

        assert!(debug.contains("aKey"));
        assert!(!debug.contains("aSecret"));
        assert_eq!(credentials.secret(), "aSecret");
    }

    #[test]
    fn test_cloud_display() {
        assert_eq!(Cloud::from_name("aCloudName").to_string(), "aCloudName");
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));

        assert!(ignore_missing_env_file(result).is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".env");
        std::fs::write(&file, "CDN_IMAGE_MIRROR_BROKEN='unterminated\n").unwrap();

        let err = ignore_missing_env_file(dotenvy::from_path(&file)).unwrap_err();
        assert!(matches!(err, Error::EnvVar(_)));
    }

    #[test]
    fn test_absolute_path_resolves_relative_media_root() {
        let resolved = absolute_path("pub/media").unwrap();

        assert!(Path::new(&resolved).is_absolute());
        assert!(resolved.ends_with("pub/media"));
        assert_eq!(absolute_path("/srv/pub/media").unwrap(), "/srv/pub/media");
    }

    #[test]
    fn test_required_reports_missing_variable() {
        let err = required("CDN_IMAGE_MIRROR_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(err.to_string().contains("CDN_IMAGE_MIRROR_TEST_UNSET_VARIABLE not set"));
    }
}
