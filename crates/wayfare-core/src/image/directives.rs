use crate::image::ImageTransformRequest;

pub const AUTO: &str = "auto";
pub const LAZY_PLACEHOLDER_DIRECTIVE: &str = "e_blur:1000";

/// Builds the comma-joined directive segment, e.g. `w_800,q_auto,f_auto,c_limit`.
///
/// Order is fixed: width, height, quality, format, crop, placeholder blur.
/// Quality and format are always present.
pub fn directive_segment(request: &ImageTransformRequest) -> String {
    let mut directives: Vec<String> = Vec::with_capacity(6);

    if let Some(width) = supplied(request.width.as_deref()) {
        directives.push(format!("w_{width}"));
    }
    if let Some(height) = supplied(request.height.as_deref()) {
        directives.push(format!("h_{height}"));
    }

    let quality = supplied(Some(request.quality.as_str())).unwrap_or(AUTO);
    directives.push(format!("q_{quality}"));

    match supplied(Some(request.format.as_str())) {
        Some(format) if format != AUTO => directives.push(format!("f_{format}")),
        _ => directives.push("f_auto".to_string()),
    }

    if let Some(crop) = supplied(request.crop_mode.as_deref()) {
        directives.push(format!("c_{crop}"));
    }
    if request.lazy_placeholder {
        directives.push(LAZY_PLACEHOLDER_DIRECTIVE.to_string());
    }

    directives.join(",")
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
