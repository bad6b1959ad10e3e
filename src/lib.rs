//! Mirrors merchant product images to a hosted image CDN
//!
//! Uploaded media is copied to the remote store, and image URLs are rewritten
//! to point at transformed (resized, quality-adjusted, auto-formatted)
//! variants served by the CDN.

pub mod error;
pub mod image;
pub mod mime;
pub mod mirror;
pub mod models;
pub mod provider;
pub mod transformation;

pub use error::{Error, Result};
pub use image::Image;
pub use transformation::{Dimensions, Quality, Transformation};
