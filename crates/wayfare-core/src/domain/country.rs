use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const MAX_DIAL_DIGITS: usize = 4;

const BUILTIN_COUNTRIES: &[(&str, &str)] = &[
    ("91", "India"),
    ("1", "United States"),
    ("44", "United Kingdom"),
    ("971", "United Arab Emirates"),
    ("1", "Canada"),
    ("61", "Australia"),
    ("65", "Singapore"),
    ("60", "Malaysia"),
    ("66", "Thailand"),
    ("977", "Nepal"),
    ("94", "Sri Lanka"),
    ("880", "Bangladesh"),
    ("975", "Bhutan"),
    ("960", "Maldives"),
    ("966", "Saudi Arabia"),
    ("974", "Qatar"),
    ("965", "Kuwait"),
    ("968", "Oman"),
    ("973", "Bahrain"),
    ("49", "Germany"),
    ("33", "France"),
    ("39", "Italy"),
    ("34", "Spain"),
    ("31", "Netherlands"),
    ("41", "Switzerland"),
    ("353", "Ireland"),
    ("64", "New Zealand"),
    ("81", "Japan"),
    ("86", "China"),
    ("852", "Hong Kong"),
    ("62", "Indonesia"),
    ("84", "Vietnam"),
    ("7", "Russia"),
    ("27", "South Africa"),
    ("254", "Kenya"),
    ("230", "Mauritius"),
];

/// A dial code the phone selector offers, e.g. `+91 India`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCodeEntry {
    pub dial_prefix: String,
    pub display_name: String,
    pub dial_digits: String,
}

impl CountryCodeEntry {
    /// Accepts the digits with or without a leading `+`.
    pub fn new(dial_code: &str, display_name: &str) -> Result<Self, CoreError> {
        let trimmed = dial_code.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty()
            || digits.len() > MAX_DIAL_DIGITS
            || !digits.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(CoreError::InvalidDialCode(dial_code.to_string()));
        }

        let name = display_name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyCountryName);
        }

        Ok(Self {
            dial_prefix: format!("+{digits}"),
            display_name: name.to_string(),
            dial_digits: digits.to_string(),
        })
    }
}

/// Ordered list of known dial codes. Order is display order only; lookups
/// return the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCatalog {
    entries: Vec<CountryCodeEntry>,
}

impl CountryCatalog {
    pub fn new(entries: Vec<CountryCodeEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_COUNTRIES
            .iter()
            .map(|(digits, name)| CountryCodeEntry {
                dial_prefix: format!("+{digits}"),
                display_name: (*name).to_string(),
                dial_digits: (*digits).to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Appends entries after the existing ones.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = CountryCodeEntry>,
    {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[CountryCodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<&CountryCodeEntry> {
        self.entries.iter().find(|entry| entry.dial_prefix == prefix)
    }

    pub fn find_by_digits(&self, digits: &str) -> Option<&CountryCodeEntry> {
        self.entries.iter().find(|entry| entry.dial_digits == digits)
    }

    /// Matches a partially typed code such as `+44` or `44`.
    pub fn lookup_fragment(&self, fragment: &str) -> Option<&CountryCodeEntry> {
        let digits: String = fragment.chars().filter(|ch| ch.is_ascii_digit()).collect();
        self.entries
            .iter()
            .find(|entry| entry.dial_prefix == fragment || entry.dial_digits == digits)
    }

    /// Longest known dial code that `digits` starts with.
    pub fn longest_prefix_of(&self, digits: &str) -> Option<&CountryCodeEntry> {
        self.entries
            .iter()
            .filter(|entry| digits.starts_with(entry.dial_digits.as_str()))
            .fold(None, |best: Option<&CountryCodeEntry>, entry| match best {
                Some(current) if current.dial_digits.len() >= entry.dial_digits.len() => {
                    Some(current)
                }
                _ => Some(entry),
            })
    }

    /// Case-insensitive match on the country name or dial code.
    pub fn search(&self, query: &str) -> Vec<&CountryCodeEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        let digits = needle.trim_start_matches('+');
        self.entries
            .iter()
            .filter(|entry| {
                entry.display_name.to_lowercase().contains(&needle)
                    || (!digits.is_empty() && entry.dial_digits.starts_with(digits))
            })
            .collect()
    }
}

impl Default for CountryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
