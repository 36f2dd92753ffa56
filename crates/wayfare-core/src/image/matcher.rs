use crate::error::CoreError;
use std::fmt;
use url::Url;

pub const DEFAULT_CDN_MARKERS: [&str; 2] = ["res.cloudinary.com", "cloudinary.com"];

/// Decides whether a URL points at a CDN that understands in-path
/// transformation directives.
pub trait CdnMatcher: fmt::Debug + Send + Sync {
    fn is_transformable(&self, url: &str) -> bool;
}

/// Matches when any marker appears anywhere in the URL, query included.
/// Proxied and rewritten image URLs rely on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringMatcher {
    markers: Vec<String>,
}

impl SubstringMatcher {
    pub fn new<I, S>(markers: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = normalize_markers(markers)?;
        Ok(Self { markers })
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        Self {
            markers: DEFAULT_CDN_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl CdnMatcher for SubstringMatcher {
    fn is_transformable(&self, url: &str) -> bool {
        self.markers.iter().any(|marker| url.contains(marker.as_str()))
    }
}

/// Stricter variant: the parsed host must equal a marker or be a subdomain
/// of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMatcher {
    hosts: Vec<String>,
}

impl HostMatcher {
    pub fn new<I, S>(hosts: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = normalize_markers(hosts)?
            .into_iter()
            .map(|host| host.to_ascii_lowercase())
            .collect();
        Ok(Self { hosts })
    }
}

impl Default for HostMatcher {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_CDN_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl CdnMatcher for HostMatcher {
    fn is_transformable(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.hosts.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

fn normalize_markers<I, S>(markers: I) -> Result<Vec<String>, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for marker in markers {
        let trimmed = marker.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidCdnMarker);
        }
        out.push(trimmed.to_string());
    }
    if out.is_empty() {
        return Err(CoreError::InvalidCdnMarker);
    }
    Ok(out)
}
