use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use wayfare_core::domain::{CountryCatalog, CountryCodeEntry, PhoneParser};
use wayfare_core::image::matcher::DEFAULT_CDN_MARKERS;
use wayfare_core::image::policy::validate_dimension;
use wayfare_core::image::{
    CdnMatcher, HostMatcher, ImageOptimizer, PolicyDefaults, SubstringMatcher,
};
use wayfare_core::CoreError;

const APP_DIR: &str = "wayfare";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub phone: PhoneParser,
    pub images: ImagesConfig,
}

#[derive(Debug, Clone)]
pub struct ImagesConfig {
    pub matcher: MatcherConfig,
    pub defaults: PolicyDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherConfig {
    Substring(SubstringMatcher),
    Host(HostMatcher),
}

impl MatcherConfig {
    pub fn is_strict(&self) -> bool {
        matches!(self, MatcherConfig::Host(_))
    }

    fn boxed(&self) -> Box<dyn CdnMatcher> {
        match self {
            MatcherConfig::Substring(matcher) => Box::new(matcher.clone()),
            MatcherConfig::Host(matcher) => Box::new(matcher.clone()),
        }
    }
}

impl AppConfig {
    pub fn image_optimizer(&self) -> ImageOptimizer {
        ImageOptimizer::new(self.images.matcher.boxed(), self.images.defaults)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            phone: PhoneParser::default(),
            images: ImagesConfig {
                matcher: MatcherConfig::Substring(SubstringMatcher::default()),
                defaults: PolicyDefaults::default(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid phone.countries entry {index}: {source}")]
    InvalidCountry {
        index: usize,
        #[source]
        source: CoreError,
    },
    #[error("invalid phone.default_country value: {0}")]
    InvalidDefaultCountry(String),
    #[error("invalid images.{field} value: {value}")]
    InvalidImageDimension { field: &'static str, value: u32 },
    #[error("invalid images.cdn_markers value")]
    InvalidCdnMarkers,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    phone: Option<PhoneFile>,
    images: Option<ImagesFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    default_country: Option<String>,
    #[serde(default)]
    countries: Vec<CountryFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CountryFile {
    prefix: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImagesFile {
    cdn_markers: Option<Vec<String>>,
    strict_host: Option<bool>,
    gallery_width: Option<u32>,
    avatar_size: Option<u32>,
    quick_max_width: Option<u32>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(phone) = parsed.phone {
        config.phone = merge_phone(phone)?;
    }
    if let Some(images) = parsed.images {
        config.images = merge_images(images)?;
    }

    Ok(config)
}

fn merge_phone(phone: PhoneFile) -> Result<PhoneParser> {
    let mut catalog = CountryCatalog::builtin();
    let mut extra = Vec::with_capacity(phone.countries.len());
    for (index, country) in phone.countries.iter().enumerate() {
        let entry = CountryCodeEntry::new(&country.prefix, &country.name)
            .map_err(|source| ConfigError::InvalidCountry { index, source })?;
        extra.push(entry);
    }
    catalog.extend(extra);

    let parser = PhoneParser::new(catalog);
    match phone.default_country {
        Some(code) => parser
            .with_default_country(&code)
            .map_err(|_| ConfigError::InvalidDefaultCountry(code)),
        None => Ok(parser),
    }
}

fn merge_images(images: ImagesFile) -> Result<ImagesConfig> {
    let mut defaults = PolicyDefaults::default();
    if let Some(width) = images.gallery_width {
        defaults.gallery_width = dimension("gallery_width", width)?;
    }
    if let Some(size) = images.avatar_size {
        defaults.avatar_size = dimension("avatar_size", size)?;
    }
    if let Some(width) = images.quick_max_width {
        defaults.quick_max_width = dimension("quick_max_width", width)?;
    }

    let markers = images
        .cdn_markers
        .unwrap_or_else(|| DEFAULT_CDN_MARKERS.iter().map(|m| m.to_string()).collect());
    let matcher = if images.strict_host.unwrap_or(false) {
        let matcher = HostMatcher::new(&markers).map_err(|_| ConfigError::InvalidCdnMarkers)?;
        MatcherConfig::Host(matcher)
    } else {
        let matcher =
            SubstringMatcher::new(&markers).map_err(|_| ConfigError::InvalidCdnMarkers)?;
        MatcherConfig::Substring(matcher)
    };

    Ok(ImagesConfig { matcher, defaults })
}

fn dimension(field: &'static str, value: u32) -> Result<u32> {
    validate_dimension(value).map_err(|_| ConfigError::InvalidImageDimension { field, value })
}

#[cfg(test)]
mod tests {
    use super::{
        load, load_at_path, merge_config, ConfigError, ConfigFile, CountryFile, ImagesFile,
        PhoneFile,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                default_country: Some("+372".to_string()),
                countries: vec![CountryFile {
                    prefix: "+372".to_string(),
                    name: "Estonia".to_string(),
                }],
            }),
            images: Some(ImagesFile {
                cdn_markers: Some(vec!["cdn.example.com".to_string()]),
                strict_host: Some(true),
                gallery_width: Some(900),
                avatar_size: Some(64),
                quick_max_width: Some(500),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.phone.default_code(), "+372");
        assert_eq!(merged.phone.parse("5123 4567").country_code, "+372");
        assert!(merged.images.matcher.is_strict());
        assert_eq!(merged.images.defaults.gallery_width, 900);
        assert_eq!(merged.images.defaults.avatar_size, 64);
        assert_eq!(merged.images.defaults.quick_max_width, 500);

        let optimizer = merged.image_optimizer();
        assert!(optimizer.is_transformable("https://cdn.example.com/upload/a.jpg"));
        assert!(!optimizer.is_transformable("https://res.cloudinary.com/upload/a.jpg"));
    }

    #[test]
    fn merge_config_defaults_when_empty() {
        let merged = merge_config(ConfigFile::default()).expect("merge");
        assert_eq!(merged.phone.default_code(), "+91");
        assert!(!merged.images.matcher.is_strict());
        assert_eq!(merged.images.defaults.gallery_width, 1200);
    }

    #[test]
    fn merge_config_rejects_unknown_default_country() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                default_country: Some("+999".to_string()),
                countries: Vec::new(),
            }),
            images: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDefaultCountry(code) if code == "+999"));
    }

    #[test]
    fn merge_config_rejects_bad_country_entry() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                default_country: None,
                countries: vec![CountryFile {
                    prefix: "+12345".to_string(),
                    name: "Nowhere".to_string(),
                }],
            }),
            images: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCountry { index: 0, .. }));
    }

    #[test]
    fn merge_config_rejects_bad_dimensions_and_markers() {
        let parsed = ConfigFile {
            phone: None,
            images: Some(ImagesFile {
                gallery_width: Some(0),
                ..ImagesFile::default()
            }),
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidImageDimension {
                field: "gallery_width",
                value: 0
            }
        ));

        let parsed = ConfigFile {
            phone: None,
            images: Some(ImagesFile {
                cdn_markers: Some(Vec::new()),
                ..ImagesFile::default()
            }),
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCdnMarkers));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[phone]\ndefault_country = \"+44\"\n\n[[phone.countries]]\nprefix = \"372\"\nname = \"Estonia\"\n\n[images]\ngallery_width = 1000\n",
        )
        .expect("write config");

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.phone.default_code(), "+44");
        assert!(config.phone.catalog().find_by_prefix("+372").is_some());
        assert_eq!(config.images.defaults.gallery_width, 1000);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[images]\nwidth = 10\n").expect("write config");
        let err = load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
