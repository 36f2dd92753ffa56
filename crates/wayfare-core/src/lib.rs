pub mod content;
pub mod domain;
pub mod dto;
pub mod error;
pub mod image;

pub use content::{split_content, ContentBlock};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use image::{
    avatar_url, fullscreen_url, gallery_url, optimize_image, quick_optimize, thumbnail_url,
    CdnMatcher, HostMatcher, ImageOptimizer, ImageTransformRequest, Passthrough, Policy,
    PolicyDefaults, SubstringMatcher,
};
