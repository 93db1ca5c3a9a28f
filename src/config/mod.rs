//! Runtime configuration for the discovery pipeline.
//!
//! Values come from `VERBATIM_*` environment variables with defaults that
//! target the live site. `Config::from_env` parses and validates them once;
//! after that the configuration is read-only and handed to the components
//! that need it.

use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::discovery::FallbackScope;
use crate::site::{DEFAULT_ALLOWED_PREFIXES, DEFAULT_DENIED_FRAGMENTS, SitePolicy};

pub const ENV_SITE_ROOT: &str = "VERBATIM_SITE_ROOT";
pub const ENV_USER_AGENT: &str = "VERBATIM_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "VERBATIM_TIMEOUT_SECS";
pub const ENV_MAX_CANDIDATES: &str = "VERBATIM_MAX_CANDIDATES";
pub const ENV_MAX_SOURCES: &str = "VERBATIM_MAX_SOURCES";
pub const ENV_PACING_MS: &str = "VERBATIM_PACING_MS";
pub const ENV_DENIED_PATHS: &str = "VERBATIM_DENIED_PATHS";
pub const ENV_FALLBACK_SCOPE: &str = "VERBATIM_FALLBACK_SCOPE";

pub const DEFAULT_USER_AGENT: &str = concat!("verbatim/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_CANDIDATES: usize = 5;
const DEFAULT_MAX_SOURCES: usize = 3;
const DEFAULT_PACING_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    site_root: Url,
    user_agent: String,
    request_timeout: Duration,
    max_candidates: usize,
    max_sources: usize,
    pacing: Duration,
    allowed_prefixes: Vec<String>,
    denied_fragments: Vec<String>,
    fallback_scope: FallbackScope,
}

impl Config {
    /// Load from environment variables, falling back to defaults for anything
    /// unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(root) = env::var(ENV_SITE_ROOT) {
            config.site_root = parse_site_root(&root)?;
        }
        if let Ok(agent) = env::var(ENV_USER_AGENT) {
            if agent.trim().is_empty() {
                return Err(ConfigError::invalid(ENV_USER_AGENT, "must not be blank"));
            }
            config.user_agent = agent;
        }
        if let Some(secs) = parse_var::<u64>(ENV_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(ConfigError::invalid(ENV_TIMEOUT_SECS, "must be positive"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<usize>(ENV_MAX_CANDIDATES)? {
            config.max_candidates = max;
        }
        if let Some(max) = parse_var::<usize>(ENV_MAX_SOURCES)? {
            config.max_sources = max;
        }
        if let Some(ms) = parse_var::<u64>(ENV_PACING_MS)? {
            config.pacing = Duration::from_millis(ms);
        }
        if let Ok(paths) = env::var(ENV_DENIED_PATHS) {
            config.denied_fragments = split_list(&paths);
        }
        if let Ok(scope) = env::var(ENV_FALLBACK_SCOPE) {
            config.fallback_scope = scope
                .parse()
                .map_err(|reason| ConfigError::invalid(ENV_FALLBACK_SCOPE, reason))?;
        }

        Ok(config)
    }

    pub fn with_site_root(mut self, root: Url) -> Self {
        self.site_root = root;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = max;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_denied_fragments(mut self, fragments: Vec<String>) -> Self {
        self.denied_fragments = fragments;
        self
    }

    pub fn with_fallback_scope(mut self, scope: FallbackScope) -> Self {
        self.fallback_scope = scope;
        self
    }

    pub fn site_root(&self) -> &Url {
        &self.site_root
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    /// Per-request timeout covering connect, headers and body.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    /// How many URLs discovery may hand to the aggregator.
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }
    /// How many web sources a single topic query keeps.
    pub fn max_sources(&self) -> usize {
        self.max_sources
    }
    /// Courtesy delay between processed candidates.
    pub fn pacing(&self) -> Duration {
        self.pacing
    }
    pub fn fallback_scope(&self) -> FallbackScope {
        self.fallback_scope
    }

    pub fn site_policy(&self) -> SitePolicy {
        SitePolicy::new(
            self.site_root.clone(),
            self.allowed_prefixes.iter().cloned(),
            self.denied_fragments.iter().cloned(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_root: SitePolicy::default().root().clone(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_sources: DEFAULT_MAX_SOURCES,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            allowed_prefixes: DEFAULT_ALLOWED_PREFIXES.iter().map(|s| s.to_string()).collect(),
            denied_fragments: DEFAULT_DENIED_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
            fallback_scope: FallbackScope::default(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

fn parse_site_root(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::invalid(ENV_SITE_ROOT, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::invalid(
            ENV_SITE_ROOT,
            "must be an absolute http(s) URL with a host",
        ));
    }
    Ok(url)
}

fn parse_var<T: std::str::FromStr>(field: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(field) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::invalid(field, e.to_string())),
        Err(_) => Ok(None),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment-variable tests must not interleave.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 8] = [
        ENV_SITE_ROOT,
        ENV_USER_AGENT,
        ENV_TIMEOUT_SECS,
        ENV_MAX_CANDIDATES,
        ENV_MAX_SOURCES,
        ENV_PACING_MS,
        ENV_DENIED_PATHS,
        ENV_FALLBACK_SCOPE,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.site_root().as_str(), "https://www.churchofjesuschrist.org/");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(15));
        assert_eq!(cfg.max_candidates(), 5);
        assert_eq!(cfg.max_sources(), 3);
        assert_eq!(cfg.pacing(), Duration::from_secs(1));
        assert_eq!(cfg.fallback_scope(), FallbackScope::AllowedPaths);
        assert!(cfg.user_agent().starts_with("verbatim/"));
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_SITE_ROOT, "http://localhost:9000");
            env::set_var(ENV_USER_AGENT, "test-agent/2.0");
            env::set_var(ENV_TIMEOUT_SECS, "3");
            env::set_var(ENV_MAX_CANDIDATES, "8");
            env::set_var(ENV_MAX_SOURCES, "2");
            env::set_var(ENV_PACING_MS, "0");
            env::set_var(ENV_DENIED_PATHS, "/media/, /audio/ ,,/images/");
            env::set_var(ENV_FALLBACK_SCOPE, "any-on-site");
        }
        let cfg = Config::from_env().unwrap();
        clear_env();

        assert_eq!(cfg.site_root().as_str(), "http://localhost:9000/");
        assert_eq!(cfg.user_agent(), "test-agent/2.0");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.max_candidates(), 8);
        assert_eq!(cfg.max_sources(), 2);
        assert_eq!(cfg.pacing(), Duration::ZERO);
        assert_eq!(cfg.fallback_scope(), FallbackScope::AnyOnSite);
        assert_eq!(
            cfg.site_policy().denied_fragments(),
            ["/media/", "/audio/", "/images/"]
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let _guard = ENV_MUTEX.lock().unwrap();

        clear_env();
        unsafe { env::set_var(ENV_MAX_SOURCES, "three") };
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { field: ENV_MAX_SOURCES, .. })
        ));

        clear_env();
        unsafe { env::set_var(ENV_SITE_ROOT, "ftp://files.example.com") };
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { field: ENV_SITE_ROOT, .. })
        ));

        clear_env();
        unsafe { env::set_var(ENV_TIMEOUT_SECS, "0") };
        assert!(Config::from_env().is_err());

        clear_env();
        unsafe { env::set_var(ENV_FALLBACK_SCOPE, "everything") };
        assert!(Config::from_env().is_err());

        clear_env();
    }
}
