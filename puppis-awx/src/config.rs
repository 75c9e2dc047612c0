//! Client configuration and authentication

use std::time::Duration;

use crate::error::{AwxError, AwxResult};

/// Credentials for an AWX server.
///
/// The [`Debug`] impl redacts secrets to prevent accidental credential
/// exposure in log output.
#[derive(Clone)]
pub enum AwxAuth {
    /// HTTP basic authentication
    Basic { username: String, password: String },
    /// Personal access token
    Bearer { token: String },
}

impl AwxAuth {
    /// Apply authentication to a request builder
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            AwxAuth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            AwxAuth::Bearer { token } => builder.bearer_auth(token),
        }
    }
}

impl std::fmt::Debug for AwxAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Connection settings for an AWX server
#[derive(Debug, Clone)]
pub struct AwxConfig {
    /// Base URL of the server (e.g., "https://awx.example.com")
    pub base_url: String,
    pub auth: AwxAuth,
    pub timeout: Duration,
    /// Verify the server's TLS certificate
    pub verify_tls: bool,
}

impl AwxConfig {
    pub fn new(base_url: impl Into<String>, auth: AwxAuth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            timeout: Duration::from_secs(30),
            verify_tls: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn validate(&self) -> AwxResult<()> {
        if self.base_url.is_empty() {
            return Err(AwxError::InvalidConfig("base URL is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AwxError::InvalidConfig(format!(
                "base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        match &self.auth {
            AwxAuth::Basic { username, .. } if username.is_empty() => Err(
                AwxError::InvalidConfig("basic auth username is empty".to_string()),
            ),
            AwxAuth::Bearer { token } if token.is_empty() => {
                Err(AwxError::InvalidConfig("token is empty".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let auth = AwxAuth::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));

        let auth = AwxAuth::Bearer {
            token: "secret-token".to_string(),
        };
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let auth = AwxAuth::Bearer {
            token: "t".to_string(),
        };
        assert!(AwxConfig::new("", auth.clone()).validate().is_err());
        assert!(
            AwxConfig::new("awx.example.com", auth.clone())
                .validate()
                .is_err()
        );
        assert!(
            AwxConfig::new("https://awx.example.com", auth)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn validate_rejects_empty_credentials() {
        let config = AwxConfig::new(
            "https://awx.example.com",
            AwxAuth::Bearer {
                token: String::new(),
            },
        );
        assert!(config.validate().is_err());

        let config = AwxConfig::new(
            "https://awx.example.com",
            AwxAuth::Basic {
                username: String::new(),
                password: "p".to_string(),
            },
        );
        assert!(config.validate().is_err());
    }
}
