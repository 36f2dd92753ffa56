use crate::domain::ParsedPhone;
use crate::image::Passthrough;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneParseDto {
    pub input: String,
    pub country_code: String,
    pub local_number: String,
    pub full: String,
    pub valid: bool,
}

impl PhoneParseDto {
    pub fn new(input: &str, parsed: ParsedPhone) -> Self {
        let full = parsed.to_full();
        let valid = crate::domain::is_valid_phone(&full);
        Self {
            input: input.to_string(),
            country_code: parsed.country_code,
            local_number: parsed.local_number,
            full,
            valid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneValidationDto {
    pub input: String,
    pub digits: usize,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResultDto {
    pub source: String,
    pub url: String,
    pub transformed: bool,
    pub reason: Option<String>,
}

impl ImageResultDto {
    pub fn from_outcome(source: &str, outcome: Result<String, Passthrough>) -> Self {
        match outcome {
            Ok(url) => Self {
                source: source.to_string(),
                url,
                transformed: true,
                reason: None,
            },
            Err(reason) => Self {
                source: source.to_string(),
                url: source.to_string(),
                transformed: false,
                reason: Some(reason.to_string()),
            },
        }
    }

    /// For rewrites that do not report a reason (named policies).
    pub fn from_rewrite(source: &str, url: String) -> Self {
        let transformed = url != source;
        Self {
            source: source.to_string(),
            url,
            transformed,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageResultDto, PhoneParseDto};
    use crate::domain::parse_phone_value;
    use crate::image::Passthrough;

    #[test]
    fn phone_dto_carries_full_form() {
        let dto = PhoneParseDto::new("+44 7911 123456", parse_phone_value("+44 7911 123456"));
        assert_eq!(dto.full, "+44 7911123456");
        assert!(dto.valid);
    }

    #[test]
    fn image_dto_keeps_source_on_passthrough() {
        let dto = ImageResultDto::from_outcome("x.jpg", Err(Passthrough::NotCdn));
        assert_eq!(dto.url, "x.jpg");
        assert!(!dto.transformed);
        assert_eq!(dto.reason.as_deref(), Some("not a cdn url"));
    }
}
