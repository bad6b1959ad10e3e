use super::url::{transformation_query, DeliveryUrl};
use super::{ImageProvider, UrlOptions};
use crate::image::Image;
use crate::transformation::Transformation;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory provider that records uploads by identifier.
#[derive(Clone)]
pub struct MockImageProvider {
    images: Arc<Mutex<HashMap<String, String>>>,
    base_url: String,
    cloud: String,
    upload_count: Arc<Mutex<usize>>,
    delete_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self {
            images: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-cdn.example.com".to_string(),
            cloud: "mock-cloud".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            delete_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_cloud(mut self, cloud: String) -> Self {
        self.cloud = cloud;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_delete_count(&self) -> usize {
        *self.delete_count.lock().unwrap()
    }

    /// Identifier to source path for every image currently stored.
    pub fn get_images(&self) -> HashMap<String, String> {
        self.images.lock().unwrap().clone()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.images.lock().unwrap().contains_key(identifier)
    }

    fn check_failure(&self) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Provider("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn upload(&self, image: &Image) -> Result<()> {
        self.check_failure()?;

        *self.upload_count.lock().unwrap() += 1;
        self.images
            .lock()
            .unwrap()
            .insert(image.identifier().to_string(), image.path().to_string());
        Ok(())
    }

    async fn delete_image(&self, image: &Image) -> Result<()> {
        self.check_failure()?;

        *self.delete_count.lock().unwrap() += 1;
        self.images.lock().unwrap().remove(image.identifier());
        Ok(())
    }

    fn get_image_url_by_name(&self, name: &str, options: &UrlOptions) -> Result<String> {
        DeliveryUrl::new(&self.base_url, &self.cloud).build_for_name(name, options)
    }

    fn transform_image(&self, image: &Image, transformation: &Transformation) -> Result<Image> {
        let url = DeliveryUrl::new(&self.base_url, &self.cloud).build(
            image.identifier(),
            image.extension(),
            transformation_query(transformation),
        )?;
        Image::from_path(url)
    }
}
