use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid dial code: {0}")]
    InvalidDialCode(String),
    #[error("country name is required")]
    EmptyCountryName,
    #[error("unknown default country code: {0}")]
    UnknownDefaultCountry(String),
    #[error("invalid image dimension: {0}")]
    InvalidDimension(u32),
    #[error("invalid cdn marker")]
    InvalidCdnMarker,
}
