//! Immutable descriptions of how the CDN should render an image
//!
//! A [`Transformation`] starts from [`Transformation::builder`] and is refined
//! with `with_*` calls, each of which returns a new value and leaves the
//! receiver untouched.

pub mod dimensions;
pub mod quality;

pub use dimensions::Dimensions;
pub use quality::Quality;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    dimensions: Option<Dimensions>,
    quality: Option<Quality>,
    crop: Option<String>,
    optimise: bool,
}

impl Transformation {
    /// Default rendering: original size and quality, automatic format on.
    pub fn builder() -> Self {
        Self {
            dimensions: None,
            quality: None,
            crop: None,
            optimise: true,
        }
    }

    pub fn with_dimensions(&self, dimensions: Dimensions) -> Self {
        Self {
            dimensions: Some(dimensions),
            ..self.clone()
        }
    }

    pub fn with_quality(&self, quality: Quality) -> Self {
        Self {
            quality: Some(quality),
            ..self.clone()
        }
    }

    /// Crop mode passed through to the CDN as-is (`fill`, `fit`, `scale`...).
    pub fn with_crop(&self, crop: impl Into<String>) -> Self {
        Self {
            crop: Some(crop.into()),
            ..self.clone()
        }
    }

    pub fn with_optimisation_disabled(&self) -> Self {
        Self {
            optimise: false,
            ..self.clone()
        }
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }

    pub fn crop(&self) -> Option<&str> {
        self.crop.as_deref()
    }

    pub fn is_optimised(&self) -> bool {
        self.optimise
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::builder()
    }
}
