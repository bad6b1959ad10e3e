use super::signing::sign;
use super::url::{transformation_query, DeliveryUrl};
use super::{ImageProvider, UrlOptions};
use crate::image::Image;
use crate::mime::detect_image_mime;
use crate::models::{Cloud, Config, Credentials, DEFAULT_API_BASE, DEFAULT_DELIVERY_BASE};
use crate::transformation::Transformation;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(default)]
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Image provider backed by the hosted CDN's upload and delivery APIs.
pub struct RemoteImageProvider {
    client: Client,
    credentials: Credentials,
    cloud: Cloud,
    api_base: String,
    delivery_base: String,
}

impl RemoteImageProvider {
    pub fn new(credentials: Credentials, cloud: Cloud) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            credentials,
            cloud,
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(
            Self::new(config.credentials.clone(), config.cloud.clone())?
                .with_api_base(config.api_base.clone())
                .with_delivery_base(config.delivery_base.clone()),
        )
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_delivery_base(mut self, delivery_base: String) -> Self {
        self.delivery_base = delivery_base;
        self
    }

    fn delivery_url(&self) -> DeliveryUrl<'_> {
        DeliveryUrl::new(&self.delivery_base, self.cloud.name())
    }

    /// Sign `params` with this provider's credentials and POST them as a form
    /// together with the `unsigned` fields.
    async fn post_signed(
        &self,
        action: &str,
        mut params: BTreeMap<&str, String>,
        unsigned: Vec<(&str, String)>,
    ) -> Result<String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, self.credentials.secret());

        let mut form: Vec<(&str, String)> = params.into_iter().collect();
        form.extend(unsigned);
        form.push(("api_key", self.credentials.key().to_string()));
        form.push(("signature", signature));

        let url = format!("{}/v1_1/{}/image/{}", self.api_base, self.cloud, action);
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send {} request: {}", action, e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::error!("Image provider {} error (status {}): {}", action, status, message);
            return Err(Error::Provider(format!(
                "{} failed (status {}): {}",
                action, status, message
            )));
        }

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
            return Err(Error::Provider(format!("{} failed: {}", action, error.error.message)));
        }

        Ok(body)
    }
}

#[async_trait]
impl ImageProvider for RemoteImageProvider {
    async fn upload(&self, image: &Image) -> Result<()> {
        let bytes = tokio::fs::read(image.path()).await?;
        let mime = detect_image_mime(&bytes, image.extension());
        let data_uri = format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(&bytes)
        );

        let mut params = BTreeMap::new();
        params.insert("public_id", image.identifier().to_string());
        params.insert("overwrite", "true".to_string());

        let body = self
            .post_signed("upload", params, vec![("file", data_uri)])
            .await?;

        let response: UploadResponse = serde_json::from_str(&body)?;
        tracing::info!(
            "Uploaded {} as {} ({})",
            image,
            response.public_id,
            response.secure_url.as_deref().unwrap_or("no url")
        );
        Ok(())
    }

    async fn delete_image(&self, image: &Image) -> Result<()> {
        let mut params = BTreeMap::new();
        params.insert("public_id", image.identifier().to_string());
        params.insert("invalidate", "true".to_string());

        let body = self.post_signed("destroy", params, Vec::new()).await?;
        let response: DestroyResponse = serde_json::from_str(&body)?;
        tracing::info!("Destroyed {}: {}", image.identifier(), response.result);
        Ok(())
    }

    fn get_image_url_by_name(&self, name: &str, options: &UrlOptions) -> Result<String> {
        let url = self.delivery_url().build_for_name(name, options)?;
        tracing::debug!("Resolved {} to {}", name, url);
        Ok(url)
    }

    fn transform_image(&self, image: &Image, transformation: &Transformation) -> Result<Image> {
        let url = self.delivery_url().build(
            image.identifier(),
            image.extension(),
            transformation_query(transformation),
        )?;
        tracing::debug!("Transformed {} to {}", image, url);
        Image::from_path(url)
    }
}
