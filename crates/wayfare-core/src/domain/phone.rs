use crate::domain::country::{CountryCatalog, MAX_DIAL_DIGITS};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

pub const DEFAULT_COUNTRY_CODE: &str = "+91";
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

/// A phone value split the way the form shows it: dial code selector plus
/// a digits-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPhone {
    pub country_code: String,
    pub local_number: String,
}

impl ParsedPhone {
    pub fn to_full(&self) -> String {
        format_full_phone(&self.country_code, &self.local_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneParser {
    catalog: CountryCatalog,
    default_code: String,
}

impl PhoneParser {
    pub fn new(catalog: CountryCatalog) -> Self {
        Self {
            catalog,
            default_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }

    /// The default must be one of the catalog's dial prefixes.
    pub fn with_default_country(mut self, code: &str) -> Result<Self, CoreError> {
        let entry = self
            .catalog
            .find_by_prefix(code.trim())
            .ok_or_else(|| CoreError::UnknownDefaultCountry(code.to_string()))?;
        self.default_code = entry.dial_prefix.clone();
        Ok(self)
    }

    pub fn catalog(&self) -> &CountryCatalog {
        &self.catalog
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    /// Splits a typed or pasted phone value. Never fails: anything that does
    /// not look like `+<code> <number>` falls back to the default code.
    pub fn parse(&self, raw: &str) -> ParsedPhone {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.with_default(String::new());
        }

        if let Some((code_digits, remainder)) = self.split_dial_code(trimmed) {
            return ParsedPhone {
                country_code: self.resolve_code(code_digits),
                local_number: digits_only(remainder),
            };
        }

        let digits = digits_only(trimmed);
        if trimmed.starts_with('+') && digits.len() <= MAX_DIAL_DIGITS {
            // Still typing the dial code.
            let country_code = match self.catalog.lookup_fragment(trimmed) {
                Some(entry) => entry.dial_prefix.clone(),
                None => self.default_code.clone(),
            };
            return ParsedPhone {
                country_code,
                local_number: String::new(),
            };
        }

        self.with_default(digits)
    }

    fn split_dial_code<'a>(&self, trimmed: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = trimmed.strip_prefix('+')?;
        let run_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if run_len == 0 {
            return None;
        }

        if run_len <= MAX_DIAL_DIGITS {
            let remainder = rest[run_len..].trim_start();
            if remainder.is_empty() {
                return None;
            }
            return Some((&rest[..run_len], remainder));
        }

        // No separator after the code: take the longest known code, or the
        // first four digits when nothing in the catalog matches.
        let run = &rest[..run_len];
        let code_len = self
            .catalog
            .longest_prefix_of(run)
            .map(|entry| entry.dial_digits.len())
            .unwrap_or(MAX_DIAL_DIGITS);
        Some((&rest[..code_len], &rest[code_len..]))
    }

    fn resolve_code(&self, digits: &str) -> String {
        match self.catalog.find_by_digits(digits) {
            Some(entry) => entry.dial_prefix.clone(),
            None => {
                debug!(code = %digits, "unknown dial code, using default");
                self.default_code.clone()
            }
        }
    }

    fn with_default(&self, local_number: String) -> ParsedPhone {
        ParsedPhone {
            country_code: self.default_code.clone(),
            local_number,
        }
    }
}

impl Default for PhoneParser {
    fn default() -> Self {
        Self::new(CountryCatalog::builtin())
    }
}

fn builtin_parser() -> &'static PhoneParser {
    static PARSER: OnceLock<PhoneParser> = OnceLock::new();
    PARSER.get_or_init(PhoneParser::default)
}

/// Parses against the built-in catalog with `+91` as the default code.
pub fn parse_phone_value(raw: &str) -> ParsedPhone {
    builtin_parser().parse(raw)
}

/// Joins a dial code and number into the canonical `"+91 9876543210"` form.
///
/// With no digits yet, the code is still shown (`"+91 "`) so a half-filled
/// input keeps its prefix.
pub fn format_full_phone(country_code: &str, local_number: &str) -> String {
    let digits = digits_only(local_number);
    if digits.is_empty() {
        if country_code.is_empty() {
            return String::new();
        }
        return format!("{country_code} ");
    }

    let code = if country_code.is_empty() {
        DEFAULT_COUNTRY_CODE
    } else {
        country_code
    };
    format!("{code} {digits}")
}

/// Loose sanity check: 10 to 15 digits once formatting is stripped.
pub fn is_valid_phone(value: &str) -> bool {
    let count = value.chars().filter(|ch| ch.is_ascii_digit()).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&count)
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::{format_full_phone, is_valid_phone, parse_phone_value, ParsedPhone, PhoneParser};
    use crate::domain::country::{CountryCatalog, CountryCodeEntry};
    use crate::error::CoreError;

    fn parsed(code: &str, local: &str) -> ParsedPhone {
        ParsedPhone {
            country_code: code.to_string(),
            local_number: local.to_string(),
        }
    }

    #[test]
    fn parse_empty_uses_default() {
        assert_eq!(parse_phone_value(""), parsed("+91", ""));
        assert_eq!(parse_phone_value("   "), parsed("+91", ""));
    }

    #[test]
    fn parse_splits_code_and_number() {
        assert_eq!(parse_phone_value("+44 7911123456"), parsed("+44", "7911123456"));
        assert_eq!(
            parse_phone_value("  +971   50-123 4567 "),
            parsed("+971", "501234567")
        );
    }

    #[test]
    fn parse_plain_digits_defaults_country() {
        assert_eq!(parse_phone_value("9876543210"), parsed("+91", "9876543210"));
        assert_eq!(parse_phone_value("(987) 654-3210"), parsed("+91", "9876543210"));
    }

    #[test]
    fn parse_code_fragment_while_typing() {
        assert_eq!(parse_phone_value("+44"), parsed("+44", ""));
        assert_eq!(parse_phone_value("+9"), parsed("+91", ""));
        assert_eq!(parse_phone_value("+"), parsed("+91", ""));
        assert_eq!(parse_phone_value("+9999"), parsed("+91", ""));
    }

    #[test]
    fn parse_unseparated_number_uses_known_code() {
        assert_eq!(parse_phone_value("+447911123456"), parsed("+44", "7911123456"));
        assert_eq!(parse_phone_value("+9779812345678"), parsed("+977", "9812345678"));
    }

    #[test]
    fn parse_unknown_code_falls_back_to_default() {
        assert_eq!(parse_phone_value("+999 12345"), parsed("+91", "12345"));
        assert_eq!(parse_phone_value("+55555123"), parsed("+91", "5123"));
    }

    #[test]
    fn parse_plus_without_code_keeps_digits() {
        assert_eq!(parse_phone_value("+ 9876543210"), parsed("+91", "9876543210"));
        assert_eq!(parse_phone_value("call me"), parsed("+91", ""));
    }

    #[test]
    fn parser_uses_injected_catalog() {
        let catalog = CountryCatalog::new(vec![
            CountryCodeEntry::new("372", "Estonia").unwrap(),
            CountryCodeEntry::new("91", "India").unwrap(),
        ]);
        let parser = PhoneParser::new(catalog)
            .with_default_country("+372")
            .unwrap();
        assert_eq!(parser.default_code(), "+372");
        assert_eq!(parser.parse("5123 4567"), parsed("+372", "51234567"));
        assert_eq!(parser.parse("+44 7911123456"), parsed("+372", "7911123456"));
        assert_eq!(parser.parse("+91 98765 43210"), parsed("+91", "9876543210"));
    }

    #[test]
    fn default_country_must_be_known() {
        let err = PhoneParser::default()
            .with_default_country("+999")
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownDefaultCountry("+999".to_string()));
    }

    #[test]
    fn format_strips_non_digits() {
        assert_eq!(format_full_phone("+44", "7911 123456"), "+44 7911123456");
        assert_eq!(format_full_phone("", "98765-43210"), "+91 9876543210");
    }

    #[test]
    fn format_keeps_prefix_while_number_is_empty() {
        assert_eq!(format_full_phone("+91", ""), "+91 ");
        assert_eq!(format_full_phone("+91", "--"), "+91 ");
        assert_eq!(format_full_phone("", ""), "");
    }

    #[test]
    fn parsed_phone_formats_back() {
        let value = parse_phone_value("+44 7911 123456");
        assert_eq!(value.to_full(), "+44 7911123456");
        assert_eq!(parse_phone_value(&value.to_full()), value);
    }

    #[test]
    fn valid_phone_digit_bounds() {
        assert!(!is_valid_phone("987654321"));
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn valid_phone_ignores_formatting() {
        assert!(is_valid_phone("+91 98765-43210"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("not a phone"));
    }
}
