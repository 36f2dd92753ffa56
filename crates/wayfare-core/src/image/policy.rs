use crate::error::CoreError;
use crate::image::ImageTransformRequest;
use serde::{Deserialize, Serialize};

pub const THUMBNAIL_WIDTH: u32 = 400;
pub const FULLSCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_GALLERY_WIDTH: u32 = 1200;
pub const DEFAULT_AVATAR_SIZE: u32 = 150;
pub const DEFAULT_QUICK_MAX_WIDTH: u32 = 800;
pub const MAX_DIMENSION: u32 = 10_000;

pub const QUALITY_BEST: &str = "auto:best";
pub const QUALITY_GOOD: &str = "auto:good";

/// Named presets the image components use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Thumbnail,
    Gallery,
    Fullscreen,
    Avatar,
    Quick,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Thumbnail => "thumbnail",
            Policy::Gallery => "gallery",
            Policy::Fullscreen => "fullscreen",
            Policy::Avatar => "avatar",
            Policy::Quick => "quick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDefaults {
    pub gallery_width: u32,
    pub avatar_size: u32,
    pub quick_max_width: u32,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            gallery_width: DEFAULT_GALLERY_WIDTH,
            avatar_size: DEFAULT_AVATAR_SIZE,
            quick_max_width: DEFAULT_QUICK_MAX_WIDTH,
        }
    }
}

pub fn validate_dimension(value: u32) -> Result<u32, CoreError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(CoreError::InvalidDimension(value));
    }
    Ok(value)
}

pub fn thumbnail_request() -> ImageTransformRequest {
    ImageTransformRequest::default()
        .with_width(THUMBNAIL_WIDTH)
        .with_crop_mode("fill")
}

pub fn gallery_request(width: u32) -> ImageTransformRequest {
    ImageTransformRequest::default().with_width(width)
}

pub fn fullscreen_request() -> ImageTransformRequest {
    ImageTransformRequest::default()
        .with_width(FULLSCREEN_WIDTH)
        .with_quality(QUALITY_BEST)
}

pub fn avatar_request(size: u32) -> ImageTransformRequest {
    ImageTransformRequest::default()
        .with_width(size)
        .with_height(size)
        .with_quality(QUALITY_GOOD)
        .with_crop_mode("fill")
}
