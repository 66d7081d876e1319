//! Configuration module
//!
//! Two configuration structures live here: [`UploadPolicy`], the overridable
//! constants the validation engine enforces, and [`ClientConfig`], which tells
//! the API client where the document service lives and how to authenticate.
//! Both load from the environment (with `.env` support) and fall back to
//! built-in defaults.

use std::env;

use crate::error::AppError;

// Common constants
const MAX_FILE_SIZE_MB: f64 = 10.0;
const HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_API_URL: &str = "http://localhost:50505";
const DEFAULT_SCAN_MARKER: &str = ".v-scan";
const DEFAULT_ACCEPTED_EXTENSIONS: &str =
    "pdf,docx,doc,pptx,ppt,xlsx,xls,csv,txt,md,html,htm,png,jpg,jpeg,bmp,tiff";
const DEFAULT_TABULAR_EXTENSIONS: &str = "csv,xls,xlsx";

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validation policy for candidate uploads
#[derive(Clone, Debug, PartialEq)]
pub struct UploadPolicy {
    /// Size ceiling in megabytes, compared against the 2-decimal rounded size
    pub max_file_size_mb: f64,
    /// Extensions (without leading dot) the console accepts at all
    pub accepted_extensions: Vec<String>,
    /// Tabular extensions rejected even when otherwise accepted
    pub tabular_extensions: Vec<String>,
    /// Suffix appended to the transmitted filename when a scan is requested
    pub scan_marker: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size_mb: MAX_FILE_SIZE_MB,
            accepted_extensions: split_list(DEFAULT_ACCEPTED_EXTENSIONS),
            tabular_extensions: split_list(DEFAULT_TABULAR_EXTENSIONS),
            scan_marker: DEFAULT_SCAN_MARKER.to_string(),
        }
    }
}

impl UploadPolicy {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a policy from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_file_size_mb = lookup("DOCDESK_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|| MAX_FILE_SIZE_MB.to_string())
            .parse::<f64>()
            .map_err(|_| AppError::Config("DOCDESK_MAX_FILE_SIZE_MB must be a number".to_string()))?;

        let policy = Self {
            max_file_size_mb,
            accepted_extensions: split_list(
                &lookup("DOCDESK_ACCEPTED_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_ACCEPTED_EXTENSIONS.to_string()),
            ),
            tabular_extensions: split_list(
                &lookup("DOCDESK_TABULAR_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_TABULAR_EXTENSIONS.to_string()),
            ),
            scan_marker: lookup("DOCDESK_SCAN_MARKER")
                .unwrap_or_else(|| DEFAULT_SCAN_MARKER.to_string()),
        };

        policy.validate()?;
        Ok(policy)
    }

    pub fn with_max_file_size_mb(mut self, max_file_size_mb: f64) -> Self {
        self.max_file_size_mb = max_file_size_mb;
        self
    }

    pub fn with_accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tabular_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tabular_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scan_marker(mut self, marker: impl Into<String>) -> Self {
        self.scan_marker = marker.into();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.max_file_size_mb.is_finite() || self.max_file_size_mb <= 0.0 {
            return Err(AppError::Config(
                "DOCDESK_MAX_FILE_SIZE_MB must be greater than zero".to_string(),
            ));
        }

        if self.accepted_extensions.is_empty() {
            return Err(AppError::Config(
                "DOCDESK_ACCEPTED_EXTENSIONS must list at least one extension".to_string(),
            ));
        }

        if !self.scan_marker.starts_with('.') || self.scan_marker.len() < 2 {
            return Err(AppError::Config(
                "DOCDESK_SCAN_MARKER must start with '.' and name a suffix".to_string(),
            ));
        }

        Ok(())
    }
}

/// Connection settings for the document service
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    pub environment: String,
}

impl ClientConfig {
    /// Load from environment: DOCDESK_API_URL (or API_URL), DOCDESK_API_TOKEN,
    /// DOCDESK_HTTP_TIMEOUT_SECS, ENVIRONMENT.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            api_url: lookup("DOCDESK_API_URL")
                .or_else(|| lookup("API_URL"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_token: lookup("DOCDESK_API_TOKEN").filter(|s| !s.is_empty()),
            http_timeout_secs: lookup("DOCDESK_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            environment: lookup("ENVIRONMENT")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the console is running against a production deployment
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppError::Config(
                "DOCDESK_API_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config(
                "DOCDESK_HTTP_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_policy_matches_console_constants() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.max_file_size_mb, 10.0);
        assert_eq!(policy.scan_marker, ".v-scan");
        assert_eq!(policy.tabular_extensions, vec!["csv", "xls", "xlsx"]);
        assert!(policy.accepted_extensions.iter().any(|e| e == "pdf"));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn policy_overrides_from_lookup() {
        let policy = UploadPolicy::from_lookup(lookup(&[
            ("DOCDESK_MAX_FILE_SIZE_MB", "2.5"),
            ("DOCDESK_ACCEPTED_EXTENSIONS", "pdf, txt ,"),
            ("DOCDESK_SCAN_MARKER", ".scan"),
        ]))
        .unwrap();

        assert_eq!(policy.max_file_size_mb, 2.5);
        assert_eq!(policy.accepted_extensions, vec!["pdf", "txt"]);
        assert_eq!(policy.scan_marker, ".scan");
    }

    #[test]
    fn policy_rejects_bad_values() {
        assert!(UploadPolicy::from_lookup(lookup(&[("DOCDESK_MAX_FILE_SIZE_MB", "big")])).is_err());
        assert!(UploadPolicy::from_lookup(lookup(&[("DOCDESK_MAX_FILE_SIZE_MB", "0")])).is_err());
        assert!(UploadPolicy::from_lookup(lookup(&[("DOCDESK_ACCEPTED_EXTENSIONS", " , ")])).is_err());
        assert!(UploadPolicy::default().with_scan_marker("v-scan").validate().is_err());
    }

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:50505");
        assert_eq!(config.api_token, None);
        assert_eq!(config.http_timeout_secs, 60);
        assert!(!config.is_production());
    }

    #[test]
    fn client_config_falls_back_to_api_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("API_URL", "https://docs.example.com"),
            ("DOCDESK_API_TOKEN", ""),
            ("ENVIRONMENT", "Prod"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://docs.example.com");
        assert_eq!(config.api_token, None);
        assert!(config.is_production());
    }

    #[test]
    fn client_config_rejects_non_http_url() {
        let result = ClientConfig::from_lookup(lookup(&[("DOCDESK_API_URL", "ftp://docs")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
