//! Image provider integration for mirroring and transforming media
//!
//! Uploads originals to a hosted image CDN and builds delivery URLs for
//! transformed variants. Each provider instance carries its own credentials
//! and cloud name.

pub mod client;
pub mod mock;
pub mod signing;
pub mod url;

pub use client::RemoteImageProvider;
pub use mock::MockImageProvider;

use crate::image::Image;
use crate::transformation::Transformation;
use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Extra `key=value` pairs appended verbatim to a delivery URL.
pub type UrlOptions = BTreeMap<String, String>;

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Upload the file at the image's path under its derived identifier,
    /// replacing any existing remote copy.
    async fn upload(&self, image: &Image) -> Result<()>;

    /// Remove the remote copy. Succeeds whether or not it existed.
    async fn delete_image(&self, image: &Image) -> Result<()>;

    fn get_image_url_by_name(&self, name: &str, options: &UrlOptions) -> Result<String>;

    /// Returns a new image whose path is the delivery URL of the transformed
    /// variant. Makes no remote call.
    fn transform_image(&self, image: &Image, transformation: &Transformation) -> Result<Image>;
}
