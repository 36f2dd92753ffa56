pub mod country;
pub mod phone;

pub use country::{CountryCatalog, CountryCodeEntry};
pub use phone::{
    format_full_phone, is_valid_phone, parse_phone_value, ParsedPhone, PhoneParser,
    DEFAULT_COUNTRY_CODE, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS,
};
