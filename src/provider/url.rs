//! Delivery URL construction.
//!
//! URLs take the form
//! `{base}/{cloud}/image/upload/{identifier}.{ext}?width=..&height=..&crop=..&quality=..&fetch_format=auto`.
//! Transformation keys always appear in that order, followed by passthrough
//! options sorted by key.

use crate::image::{file_name, split_file_name};
use crate::transformation::Transformation;
use crate::{Error, Result};
use reqwest::Url;

pub const FETCH_FORMAT_KEY: &str = "fetch_format";
pub const FETCH_FORMAT_AUTO: &str = "auto";

/// Query pairs describing a transformation, in canonical order.
pub fn transformation_query(transformation: &Transformation) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    if let Some(dimensions) = transformation.dimensions() {
        pairs.push(("width".to_string(), dimensions.width().to_string()));
        pairs.push(("height".to_string(), dimensions.height().to_string()));
    }
    if let Some(crop) = transformation.crop() {
        pairs.push(("crop".to_string(), crop.to_string()));
    }
    if let Some(quality) = transformation.quality() {
        pairs.push(("quality".to_string(), quality.to_string()));
    }
    if transformation.is_optimised() {
        pairs.push((FETCH_FORMAT_KEY.to_string(), FETCH_FORMAT_AUTO.to_string()));
    }

    pairs
}

pub struct DeliveryUrl<'a> {
    base: &'a str,
    cloud: &'a str,
}

impl<'a> DeliveryUrl<'a> {
    pub fn new(base: &'a str, cloud: &'a str) -> Self {
        Self { base, cloud }
    }

    /// Build the URL for `identifier` with an optional extension.
    pub fn build<I, K, V>(&self, identifier: &str, extension: Option<&str>, query: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = Url::parse(self.base)
            .map_err(|e| Error::Url(format!("{}: {}", self.base, e)))?;

        let asset = match extension {
            Some(ext) => format!("{}.{}", identifier, ext),
            None => identifier.to_string(),
        };

        url.path_segments_mut()
            .map_err(|_| Error::Url(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend([self.cloud, "image", "upload", asset.as_str()]);

        let mut query = query.into_iter().peekable();
        if query.peek().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key.as_ref(), value.as_ref());
            }
        }

        Ok(url.to_string())
    }

    /// Build the URL for a logical name such as `cat.jpg` or `catalog/cat`.
    pub fn build_for_name<I, K, V>(&self, name: &str, query: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (identifier, extension) = split_file_name(file_name(name));
        if identifier.is_empty() {
            return Err(Error::InvalidFormat(format!("image name '{}' is empty", name)));
        }
        self.build(identifier, extension, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformation::{Dimensions, Quality};
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://res.cloudinary.com";

    #[test]
    fn test_default_transformation_only_adds_fetch_format() {
        let query = transformation_query(&Transformation::builder());
        assert_eq!(
            query,
            vec![("fetch_format".to_string(), "auto".to_string())]
        );
    }

    #[test]
    fn test_full_transformation_order() {
        let transformation = Transformation::builder()
            .with_quality(Quality::from_string("80").unwrap())
            .with_crop("fill")
            .with_dimensions(Dimensions::from_width_and_height(100, 200).unwrap());

        let url = DeliveryUrl::new(BASE, "demo")
            .build("cat", Some("jpg"), transformation_query(&transformation))
            .unwrap();

        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/cat.jpg?width=100&height=200&crop=fill&quality=80&fetch_format=auto"
        );
    }

    #[test]
    fn test_no_query_leaves_no_trailing_question_mark() {
        let transformation = Transformation::builder().with_optimisation_disabled();
        let url = DeliveryUrl::new(BASE, "demo")
            .build("cat", None, transformation_query(&transformation))
            .unwrap();

        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/cat");
    }

    #[test]
    fn test_base_with_path_prefix() {
        let url = DeliveryUrl::new("http://localhost:8080/cdn/", "demo")
            .build("dog", Some("png"), Vec::<(String, String)>::new())
            .unwrap();

        assert_eq!(url, "http://localhost:8080/cdn/demo/image/upload/dog.png");
    }

    #[test]
    fn test_build_for_name_strips_directories() {
        let url = DeliveryUrl::new(BASE, "demo")
            .build_for_name("catalog/product/cat.jpg", [("angle", "90")])
            .unwrap();

        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/cat.jpg?angle=90"
        );
    }

    #[test]
    fn test_invalid_base_is_reported() {
        let err = DeliveryUrl::new("not a url", "demo")
            .build("cat", None, Vec::<(String, String)>::new())
            .unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(DeliveryUrl::new(BASE, "demo")
            .build_for_name("catalog/", Vec::<(String, String)>::new())
            .is_err());
    }
}
