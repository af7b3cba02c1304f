//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup. Missing secrets or webhook
//! targets are fatal; optional values fall back to defaults with a warning.

use std::env;

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::routes::Target;

/// Default prefix for ticket links in the ticketing system's web UI.
pub const DEFAULT_TICKET_BASE_URL: &str = "https://contact.bsmg.dev/#ticket/zoom/";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be defined")]
    Missing(&'static str),

    #[error("environment variable {name} is not a valid http(s) URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Downstream chat webhook URL for every target family.
#[derive(Debug, Clone)]
pub struct TargetUrls {
    pub reports: Url,
    pub contacts: Url,
    pub wiki: Url,
    pub models: Url,
    pub applications: Url,
}

impl TargetUrls {
    /// URL for the given target.
    pub fn url_for(&self, target: Target) -> &Url {
        match target {
            Target::Reports => &self.reports,
            Target::Contacts => &self.contacts,
            Target::Wiki => &self.wiki,
            Target::Models => &self.models,
            Target::Applications => &self.applications,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Shared HMAC secret for `X-Hub-Signature` verification
    pub webhook_secret: String,

    /// Downstream webhook per target family
    pub targets: TargetUrls,

    /// Prefix the ticket id is appended to when building embed links
    pub ticket_base_url: String,

    /// Port for the web server to listen on
    pub port: u16,
}

// The secret stays out of debug output; webhook URLs embed tokens too.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("webhook_secret", &"<redacted>")
            .field("targets", &"<redacted>")
            .field("ticket_base_url", &self.ticket_base_url)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_secret = required(&lookup, "WEBHOOK_SECRET")?;

        let targets = TargetUrls {
            reports: required_url(&lookup, "REPORTS_WEBHOOK")?,
            contacts: required_url(&lookup, "CONTACTS_WEBHOOK")?,
            wiki: required_url(&lookup, "WIKI_WEBHOOK")?,
            models: required_url(&lookup, "MODELS_WEBHOOK")?,
            applications: required_url(&lookup, "APPLICATIONS_WEBHOOK")?,
        };

        let ticket_base_url = lookup("TICKET_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TICKET_BASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(env_var = "PORT", value = %raw, "Invalid port, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Ok(Config {
            webhook_secret,
            targets,
            ticket_base_url,
            port,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Parse a required webhook URL, accepting only absolute http(s) URLs.
fn required_url<F>(lookup: &F, name: &'static str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, name)?;
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
