//! Rewrites CDN image URLs so the CDN serves a resized, recompressed variant.
//!
//! Only URLs the configured [`CdnMatcher`] recognizes, and whose path has an
//! `upload` segment, are rewritten. Everything else comes back unchanged: an
//! unoptimized image still renders, a mangled URL does not.
//!
//! Rewriting is not idempotent. Passing an already transformed URL inserts a
//! second directive segment, so callers should only hand in original URLs.

pub mod directives;
pub mod matcher;
pub mod policy;

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub use directives::directive_segment;
pub use matcher::{CdnMatcher, HostMatcher, SubstringMatcher, DEFAULT_CDN_MARKERS};
pub use policy::{Policy, PolicyDefaults};

const UPLOAD_SEGMENT: &str = "upload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTransformRequest {
    pub width: Option<String>,
    pub height: Option<String>,
    pub quality: String,
    pub format: String,
    pub crop_mode: Option<String>,
    pub lazy_placeholder: bool,
}

impl Default for ImageTransformRequest {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: directives::AUTO.to_string(),
            format: directives::AUTO.to_string(),
            crop_mode: Some("limit".to_string()),
            lazy_placeholder: false,
        }
    }
}

impl ImageTransformRequest {
    pub fn with_width(mut self, width: impl ToString) -> Self {
        self.width = Some(width.to_string());
        self
    }

    pub fn with_height(mut self, height: impl ToString) -> Self {
        self.height = Some(height.to_string());
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_crop_mode(mut self, crop_mode: impl Into<String>) -> Self {
        self.crop_mode = Some(crop_mode.into());
        self
    }

    pub fn without_crop(mut self) -> Self {
        self.crop_mode = None;
        self
    }

    pub fn with_lazy_placeholder(mut self, enabled: bool) -> Self {
        self.lazy_placeholder = enabled;
        self
    }
}

/// Why a URL was handed back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Passthrough {
    #[error("empty url")]
    Empty,
    #[error("not a cdn url")]
    NotCdn,
    #[error("malformed url: {0}")]
    Malformed(#[from] url::ParseError),
    #[error("no upload segment in path")]
    MissingUploadSegment,
}

impl Passthrough {
    /// Only a CDN URL that fails to parse is worth a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Passthrough::Malformed(_))
    }
}

#[derive(Debug)]
pub struct ImageOptimizer {
    matcher: Box<dyn CdnMatcher>,
    defaults: PolicyDefaults,
}

impl ImageOptimizer {
    pub fn new(matcher: Box<dyn CdnMatcher>, defaults: PolicyDefaults) -> Self {
        Self { matcher, defaults }
    }

    pub fn defaults(&self) -> PolicyDefaults {
        self.defaults
    }

    pub fn is_transformable(&self, url: &str) -> bool {
        self.matcher.is_transformable(url)
    }

    /// Rewrites `url`, or reports why it was left alone.
    pub fn transform(
        &self,
        url: &str,
        request: &ImageTransformRequest,
    ) -> Result<String, Passthrough> {
        if url.is_empty() {
            return Err(Passthrough::Empty);
        }
        if !self.matcher.is_transformable(url) {
            return Err(Passthrough::NotCdn);
        }

        let mut parsed = Url::parse(url)?;
        let directive = directive_segment(request);
        let path = parsed.path().to_string();
        let mut segments: Vec<&str> = path.split('/').collect();
        let upload_index = segments
            .iter()
            .position(|segment| *segment == UPLOAD_SEGMENT)
            .ok_or(Passthrough::MissingUploadSegment)?;

        segments.insert(upload_index + 1, &directive);
        parsed.set_path(&segments.join("/"));
        Ok(parsed.to_string())
    }

    /// Like [`ImageOptimizer::transform`], but always yields a usable URL.
    pub fn optimize(&self, url: &str, request: &ImageTransformRequest) -> String {
        match self.transform(url, request) {
            Ok(rewritten) => rewritten,
            Err(reason) => {
                if reason.is_warning() {
                    warn!(url = %url, error = %reason, "image url left unoptimized");
                } else {
                    debug!(url = %url, reason = %reason, "image url passed through");
                }
                url.to_string()
            }
        }
    }

    pub fn thumbnail(&self, url: &str) -> String {
        self.optimize(url, &policy::thumbnail_request())
    }

    pub fn gallery(&self, url: &str, width: Option<u32>) -> String {
        let width = width.unwrap_or(self.defaults.gallery_width);
        self.optimize(url, &policy::gallery_request(width))
    }

    pub fn fullscreen(&self, url: &str) -> String {
        self.optimize(url, &policy::fullscreen_request())
    }

    pub fn avatar(&self, url: &str, size: Option<u32>) -> String {
        let size = size.unwrap_or(self.defaults.avatar_size);
        self.optimize(url, &policy::avatar_request(size))
    }

    /// Plain string replacement of the first `/upload/`, no URL parsing.
    pub fn quick(&self, url: &str, max_width: Option<u32>) -> String {
        if url.is_empty() || !self.matcher.is_transformable(url) {
            return url.to_string();
        }
        let max_width = max_width.unwrap_or(self.defaults.quick_max_width);
        let replacement = format!("/{UPLOAD_SEGMENT}/w_{max_width},q_auto,f_auto,c_limit/");
        url.replacen("/upload/", &replacement, 1)
    }

    /// `size` is the width for gallery and quick, the edge length for
    /// avatar, and ignored by the fixed-width presets.
    pub fn apply(&self, policy: Policy, url: &str, size: Option<u32>) -> String {
        match policy {
            Policy::Thumbnail => self.thumbnail(url),
            Policy::Gallery => self.gallery(url, size),
            Policy::Fullscreen => self.fullscreen(url),
            Policy::Avatar => self.avatar(url, size),
            Policy::Quick => self.quick(url, size),
        }
    }
}

impl Default for ImageOptimizer {
    fn default() -> Self {
        Self::new(Box::new(SubstringMatcher::default()), PolicyDefaults::default())
    }
}

fn builtin_optimizer() -> &'static ImageOptimizer {
    static OPTIMIZER: OnceLock<ImageOptimizer> = OnceLock::new();
    OPTIMIZER.get_or_init(ImageOptimizer::default)
}

pub fn optimize_image(url: &str, request: &ImageTransformRequest) -> String {
    builtin_optimizer().optimize(url, request)
}

pub fn quick_optimize(url: &str, max_width: u32) -> String {
    builtin_optimizer().quick(url, Some(max_width))
}

pub fn thumbnail_url(url: &str) -> String {
    builtin_optimizer().thumbnail(url)
}

pub fn gallery_url(url: &str, width: u32) -> String {
    builtin_optimizer().gallery(url, Some(width))
}

pub fn fullscreen_url(url: &str) -> String {
    builtin_optimizer().fullscreen(url)
}

pub fn avatar_url(url: &str, size: u32) -> String {
    builtin_optimizer().avatar(url, Some(size))
}

#[cfg(test)]
mod tests {
    use super::{
        avatar_url, fullscreen_url, gallery_url, optimize_image, quick_optimize, thumbnail_url,
        HostMatcher, ImageOptimizer, ImageTransformRequest, Passthrough, Policy, PolicyDefaults,
    };

    const SAMPLE: &str = "https://res.cloudinary.com/demo/image/upload/v1700000000/sample.jpg";

    fn request_800() -> ImageTransformRequest {
        ImageTransformRequest::default().with_width(800)
    }

    #[test]
    fn inserts_directives_after_upload() {
        let url = optimize_image(SAMPLE, &request_800());
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/w_800,q_auto,f_auto,c_limit/v1700000000/sample.jpg"
        );
    }

    #[test]
    fn inserts_without_version_segment() {
        let url = optimize_image(
            "https://res.cloudinary.com/demo/image/upload/trips/goa.png?cache=1",
            &request_800(),
        );
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/w_800,q_auto,f_auto,c_limit/trips/goa.png?cache=1"
        );
    }

    #[test]
    fn non_cdn_urls_pass_through() {
        for url in [
            "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee",
            "/static/banner.jpg",
            "not a url",
        ] {
            assert_eq!(optimize_image(url, &request_800()), url);
        }
    }

    #[test]
    fn empty_url_passes_through() {
        assert_eq!(optimize_image("", &request_800()), "");
        let optimizer = ImageOptimizer::default();
        assert_eq!(
            optimizer.transform("", &request_800()),
            Err(Passthrough::Empty)
        );
    }

    #[test]
    fn malformed_cdn_url_is_reported_and_passed_through() {
        let url = "cloudinary.com not a url";
        let optimizer = ImageOptimizer::default();
        let err = optimizer.transform(url, &request_800()).unwrap_err();
        assert!(matches!(err, Passthrough::Malformed(_)));
        assert!(err.is_warning());
        assert_eq!(optimizer.optimize(url, &request_800()), url);
    }

    #[test]
    fn missing_upload_segment_passes_through() {
        let url = "https://res.cloudinary.com/demo/image/fetch/sample.jpg";
        let optimizer = ImageOptimizer::default();
        assert_eq!(
            optimizer.transform(url, &request_800()),
            Err(Passthrough::MissingUploadSegment)
        );
        assert_eq!(optimizer.optimize(url, &request_800()), url);
    }

    #[test]
    fn upload_must_be_a_whole_segment() {
        let url = "https://res.cloudinary.com/demo/image/uploads/sample.jpg";
        assert_eq!(optimize_image(url, &request_800()), url);
    }

    #[test]
    fn second_pass_inserts_second_segment() {
        let once = optimize_image(SAMPLE, &request_800());
        let twice = optimize_image(&once, &request_800());
        assert_eq!(
            twice,
            "https://res.cloudinary.com/demo/image/upload/w_800,q_auto,f_auto,c_limit/w_800,q_auto,f_auto,c_limit/v1700000000/sample.jpg"
        );
    }

    #[test]
    fn lazy_placeholder_adds_blur() {
        let request = ImageTransformRequest::default()
            .with_width(40)
            .with_lazy_placeholder(true);
        let url = optimize_image(SAMPLE, &request);
        assert!(url.contains("/upload/w_40,q_auto,f_auto,c_limit,e_blur:1000/v1700000000/"));
    }

    #[test]
    fn named_policies() {
        assert!(thumbnail_url(SAMPLE).contains("/upload/w_400,q_auto,f_auto,c_fill/"));
        assert!(gallery_url(SAMPLE, 1200).contains("/upload/w_1200,q_auto,f_auto,c_limit/"));
        assert!(fullscreen_url(SAMPLE).contains("/upload/w_1920,q_auto:best,f_auto,c_limit/"));
        assert!(avatar_url(SAMPLE, 150).contains("/upload/w_150,h_150,q_auto:good,f_auto,c_fill/"));
    }

    #[test]
    fn quick_optimize_replaces_first_upload() {
        assert_eq!(
            quick_optimize(SAMPLE, 640),
            "https://res.cloudinary.com/demo/image/upload/w_640,q_auto,f_auto,c_limit/v1700000000/sample.jpg"
        );
        let plain = "https://example.com/upload/a.jpg";
        assert_eq!(quick_optimize(plain, 640), plain);
        assert_eq!(quick_optimize("", 640), "");
    }

    #[test]
    fn optimizer_defaults_drive_policies() {
        let optimizer = ImageOptimizer::new(
            Box::new(HostMatcher::default()),
            PolicyDefaults {
                gallery_width: 900,
                avatar_size: 64,
                quick_max_width: 500,
            },
        );
        assert!(optimizer
            .apply(Policy::Gallery, SAMPLE, None)
            .contains("/upload/w_900,"));
        assert!(optimizer
            .apply(Policy::Avatar, SAMPLE, None)
            .contains("/upload/w_64,h_64,"));
        assert!(optimizer
            .apply(Policy::Quick, SAMPLE, None)
            .contains("/upload/w_500,"));
        assert!(optimizer
            .apply(Policy::Gallery, SAMPLE, Some(300))
            .contains("/upload/w_300,"));

        let proxied = "https://proxy.example.com/upload/a.jpg?src=res.cloudinary.com";
        assert_eq!(optimizer.apply(Policy::Thumbnail, proxied, None), proxied);
    }

    #[test]
    fn substring_matcher_accepts_proxied_urls() {
        let proxied = "https://proxy.example.com/upload/a.jpg?src=res.cloudinary.com";
        assert_eq!(
            optimize_image(proxied, &request_800()),
            "https://proxy.example.com/upload/w_800,q_auto,f_auto,c_limit/a.jpg?src=res.cloudinary.com"
        );
    }
}
