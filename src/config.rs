//! Configuration for the generation endpoint

use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::debug;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default bound on one outbound call
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding `api_base`
pub const API_URL_ENV: &str = "QUILL_API_URL";

/// Environment variable overriding `timeout_secs`
pub const TIMEOUT_ENV: &str = "QUILL_TIMEOUT_SECS";

/// Where and how to reach the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig
{   /// Service base URL, without the `/generate` path
    #[serde(default = "default_api_base")]
    pub api_base: String
  , /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
}

fn default_api_base() -> String
{   DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64
{   DEFAULT_TIMEOUT_SECS
}

impl Default for StudioConfig
{   fn default() -> Self
    {   StudioConfig
        {   api_base: default_api_base()
          , timeout_secs: default_timeout_secs()
        }
    }
}

impl StudioConfig
{   /// Defaults overlaid with `QUILL_API_URL` / `QUILL_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let mut config = StudioConfig::default();
        config.overlay_env_with(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QUILL_API_URL` / `QUILL_TIMEOUT_SECS` without validating,
    /// so callers can layer further overrides before `validate()`
    pub fn overlay_env(&mut self) -> Result<(), crate::error::Error>
    {   self.overlay_env_with(|key| std::env::var(key).ok())
    }

    /// `overlay_env` over an arbitrary lookup. The URL is applied even
    /// when the timeout fails to parse.
    pub fn overlay_env_with<F>(
      &mut self
    , lookup: F
    ) -> Result<(), crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   if let Some(url) = lookup(API_URL_ENV)
          .filter(|u| !u.trim().is_empty())
        {   debug!("{} overrides api_base: {}", API_URL_ENV, url);
            self.api_base = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV)
        {   self.timeout_secs = raw.trim().parse().map_err(|_| {
              crate::error::Error::InvalidConfiguration(
                format!("{} is not a number of seconds: {:?}", TIMEOUT_ENV, raw)
              )
            })?;
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, crate::error::Error>
    {   let config: StudioConfig = serde_json::from_str(text)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject URLs reqwest cannot post to and a zero timeout
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let url = reqwest::Url::parse(&self.api_base).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("api_base {:?}: {}", self.api_base, e)
          )
        })?;

        if url.scheme() != "http" && url.scheme() != "https"
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("api_base must be http(s), got {}", url.scheme())
            ));
        }

        if self.timeout_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be greater than zero".to_string()
            ));
        }
        Ok(())
    }

    /// Full URL of the generate endpoint
    pub fn generate_url(&self) -> String
    {   format!("{}/generate", self.api_base.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration
    {   Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use std::collections::HashMap;

    fn lookup_from(
      pairs: &[(&str, &str)]
    ) -> impl Fn(&str) -> Option<String>
    {   let map: HashMap<String, String> = pairs
          .iter()
          .map(|(k, v)| (k.to_string(), v.to_string()))
          .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_localhost()
    {   let config = StudioConfig::default();
        assert_eq!(config.generate_url(), "http://localhost:8000/generate");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_apply()
    {   let config = StudioConfig::from_lookup(lookup_from(&[
          (API_URL_ENV, "https://gen.example.com/api/")
        , (TIMEOUT_ENV, "15")
        ])).unwrap();
        assert_eq!(
          config.generate_url()
        , "https://gen.example.com/api/generate"
        );
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn blank_url_falls_back_to_default()
    {   let config = StudioConfig::from_lookup(
          lookup_from(&[(API_URL_ENV, "  ")])
        ).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn bad_timeout_is_rejected()
    {   let err = StudioConfig::from_lookup(
          lookup_from(&[(TIMEOUT_ENV, "soon")])
        ).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidConfiguration(_)));
    }

    #[test]
    fn overlay_does_not_validate()
    {   let mut config = StudioConfig::default();
        config.overlay_env_with(
          lookup_from(&[(API_URL_ENV, "not a url")])
        ).unwrap();
        assert_eq!(config.api_base, "not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_fills_missing_fields()
    {   let config = StudioConfig::from_json(
          r#"{ "api_base": "http://10.0.0.5:9000" }"#
        ).unwrap();
        assert_eq!(config.api_base, "http://10.0.0.5:9000");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn validate_rejects_bad_values()
    {   let mut config = StudioConfig::default();
        config.api_base = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config = StudioConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
