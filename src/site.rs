//! The single website the pipeline is allowed to read from.
//!
//! [`SitePolicy`] owns the immutable allowlist data shared by discovery and
//! manual URL intake: the site root, the content-path prefixes worth
//! extracting and the path fragments the fallback link scan must ignore.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SITE_ROOT: &str = "https://www.churchofjesuschrist.org";

pub const DEFAULT_ALLOWED_PREFIXES: &[&str] =
    &["/study/", "/manual/", "/general-conference/", "/scriptures/"];

pub const DEFAULT_DENIED_FRAGMENTS: &[&str] = &["/media/", "/pdf/", "/download/"];

/// Why a URL could not become a [`CandidateUrl`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateRejection {
    #[error("host {0:?} is not part of the site")]
    DisallowedHost(String),

    #[error("path {0:?} is not an allowed content path")]
    DisallowedPath(String),
}

/// An absolute, fragment-free URL on the site's host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateUrl(Url);

impl CandidateUrl {
    fn new(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CandidateUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct SitePolicy {
    root: Url,
    domain: String,
    allowed_prefixes: Vec<String>,
    denied_fragments: Vec<String>,
}

impl SitePolicy {
    /// `root` must be an absolute http(s) URL with a host. The site domain is
    /// the root host without a leading `www.`; subdomains of it count as
    /// on-site.
    pub fn new(
        root: Url,
        allowed_prefixes: impl IntoIterator<Item = impl Into<String>>,
        denied_fragments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let host = root.host_str().unwrap_or_default().to_ascii_lowercase();
        let domain = host.strip_prefix("www.").unwrap_or(&host).to_string();
        Self {
            root,
            domain,
            allowed_prefixes: allowed_prefixes.into_iter().map(Into::into).collect(),
            denied_fragments: denied_fragments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn denied_fragments(&self) -> &[String] {
        &self.denied_fragments
    }

    pub fn is_on_site(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|sub| sub.ends_with('.'))
    }

    pub fn is_allowed_path(&self, url: &Url) -> bool {
        let path = url.path();
        self.allowed_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_denied_path(&self, url: &Url) -> bool {
        let path = url.path();
        self.denied_fragments
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }

    /// Turns an `href` attribute into an absolute on-site URL.
    ///
    /// Root-relative hrefs (including scheme-relative `//host/...`) are joined
    /// onto the site root; absolute http(s) hrefs are taken as-is. Anything
    /// that does not land on the site is dropped.
    pub fn resolve_href(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        let url = if href.starts_with('/') {
            self.root.join(href).ok()?
        } else if href.starts_with("http://") || href.starts_with("https://") {
            Url::parse(href).ok()?
        } else {
            return None;
        };

        self.is_on_site(&url).then_some(url)
    }

    /// Validates an on-site URL against the content-path allowlist.
    pub fn candidate(&self, url: Url) -> Result<CandidateUrl, CandidateRejection> {
        if !self.is_on_site(&url) {
            return Err(CandidateRejection::DisallowedHost(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }
        if !self.is_allowed_path(&url) {
            return Err(CandidateRejection::DisallowedPath(url.path().to_string()));
        }
        Ok(CandidateUrl::new(url))
    }

    /// Accepts any on-site URL whose path avoids the denylist, regardless of
    /// the content-path allowlist.
    pub(crate) fn loose_candidate(&self, url: Url) -> Option<CandidateUrl> {
        (self.is_on_site(&url) && !self.is_denied_path(&url)).then(|| CandidateUrl::new(url))
    }
}

impl Default for SitePolicy {
    fn default() -> Self {
        let root = Url::parse(DEFAULT_SITE_ROOT).expect("default site root is a valid URL");
        Self::new(
            root,
            DEFAULT_ALLOWED_PREFIXES.iter().copied(),
            DEFAULT_DENIED_FRAGMENTS.iter().copied(),
        )
    }
}
