//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the gateway and
//! session store. Nothing in this crate reads environment variables while serving a
//! command.

use crate::constants::DEFAULT_API_BASE_URL;
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    session_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The base URL must be an `http` or `https` origin; a trailing slash is dropped so
    /// endpoint paths can be appended verbatim.
    pub fn new(api_base_url: impl Into<String>, session_file: PathBuf) -> ClinicResult<Self> {
        let api_base_url = normalise_base_url(&api_base_url.into())?;
        Ok(Self {
            api_base_url,
            session_file,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }
}

/// Pick the gateway origin from an optional environment value.
///
/// `None`, empty or whitespace-only values select [`DEFAULT_API_BASE_URL`].
pub fn api_base_url_from_env_value(value: Option<String>) -> ClinicResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => normalise_base_url(&v),
        None => Ok(DEFAULT_API_BASE_URL.to_string()),
    }
}

fn normalise_base_url(raw: &str) -> ClinicResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| {
            ClinicError::Config(format!("API base URL must start with http(s)://: {raw:?}"))
        })?;

    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return Err(ClinicError::Config(format!(
            "API base URL has no valid host: {raw:?}"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_value_uses_fallback() {
        assert_eq!(
            api_base_url_from_env_value(None).unwrap(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            api_base_url_from_env_value(Some("   ".into())).unwrap(),
            DEFAULT_API_BASE_URL
        );
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let url = api_base_url_from_env_value(Some("https://api.clinique.fr/".into())).unwrap();
        assert_eq!(url, "https://api.clinique.fr");
    }

    #[test]
    fn rejects_non_http_origin() {
        let err = CoreConfig::new("ftp://files", PathBuf::from("session.json"))
            .expect_err("ftp is not allowed");
        assert!(matches!(err, ClinicError::Config(_)));

        assert!(CoreConfig::new("http://", PathBuf::from("session.json")).is_err());
    }

    #[test]
    fn keeps_session_path() {
        let cfg = CoreConfig::new("http://localhost:8000", PathBuf::from("/tmp/s.json")).unwrap();
        assert_eq!(cfg.session_file(), Path::new("/tmp/s.json"));
        assert_eq!(cfg.api_base_url(), "http://localhost:8000");
    }
}
