//! Configuration management for the OTU loader

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::upload::{EnvelopeKind, Target};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub remote: RemoteConfig,
    pub http: HttpConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Graph database extension endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Root of the extension tree, e.g. `http://localhost:7474/db/data/ext`
    pub base_url: String,
}

/// Remote code-hosting repository holding the public nexsons
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Commit list, most recent first
    pub commits_url: String,
    /// Raw file access, addressed as `<raw_base_url>/<revision>/<path>`
    pub raw_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// No timeout when unset
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Directory overriding the embedded page templates
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

const DEFAULT_BACKEND_URL: &str = "http://localhost:7474/db/data/ext";
const DEFAULT_COMMITS_URL: &str =
    "https://bitbucket.org/api/2.0/repositories/blackrim/avatol_nexsons/commits";
const DEFAULT_RAW_URL: &str = "https://bitbucket.org/api/1.0/repositories/blackrim/avatol_nexsons/raw";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            backend: BackendConfig {
                base_url: DEFAULT_BACKEND_URL.to_string(),
            },
            remote: RemoteConfig {
                commits_url: DEFAULT_COMMITS_URL.to_string(),
                raw_base_url: DEFAULT_RAW_URL.to_string(),
            },
            http: HttpConfig {
                timeout: None,
                user_agent: default_user_agent(),
            },
            templates: TemplateConfig { dir: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = match env::var("SERVER_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: "SERVER_PORT", value })?,
            Err(_) => 8080,
        };

        let timeout: Option<Duration> = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(value.parse().map_err(|_| {
                ConfigError::InvalidValue { name: "HTTP_TIMEOUT_SECS", value }
            })?)),
            Err(_) => None,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            backend: BackendConfig {
                base_url: env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            },
            remote: RemoteConfig {
                commits_url: env::var("REMOTE_COMMITS_URL")
                    .unwrap_or_else(|_| DEFAULT_COMMITS_URL.to_string()),
                raw_base_url: env::var("REMOTE_RAW_URL").unwrap_or_else(|_| DEFAULT_RAW_URL.to_string()),
            },
            http: HttpConfig {
                timeout,
                user_agent: env::var("HTTP_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
            },
            templates: TemplateConfig {
                dir: env::var("TEMPLATE_DIR").ok().map(PathBuf::from),
            },
        })
    }
}

impl BackendConfig {
    /// Endpoint receiving an envelope of `kind` for `target`
    pub fn put_url(&self, target: Target, kind: EnvelopeKind) -> String {
        let method = match (target, kind) {
            (Target::Source, EnvelopeKind::Newick) => "putSourceNewickSingle",
            (Target::Source, EnvelopeKind::Nexson) => "putSourceNexsonFile",
            (Target::Study, EnvelopeKind::Newick) => "putStudyNewickSingle",
            (Target::Study, EnvelopeKind::Nexson) => "putStudyNexsonFile",
        };
        self.endpoint(target.plugin(), method)
    }

    pub fn index_remote_studies_url(&self) -> String {
        self.endpoint(Target::Study.plugin(), "indexRemoteStudies")
    }

    fn endpoint(&self, plugin: &str, method: &str) -> String {
        format!("{}/{}/graphdb/{}", self.base_url.trim_end_matches('/'), plugin, method)
    }
}

impl RemoteConfig {
    /// `<raw_base_url>/<revision>/<path>`
    pub fn raw_url(&self, revision: &str, path: &str) -> String {
        format!("{}/{}/{}", self.raw_base_url.trim_end_matches('/'), revision, path)
    }
}

fn default_user_agent() -> String {
    format!("otu-loader/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_urls() {
        let backend = BackendConfig {
            base_url: "http://localhost:7474/db/data/ext/".to_string(),
        };

        assert_eq!(
            backend.put_url(Target::Source, EnvelopeKind::Newick),
            "http://localhost:7474/db/data/ext/sourceJsons/graphdb/putSourceNewickSingle"
        );
        assert_eq!(
            backend.put_url(Target::Study, EnvelopeKind::Nexson),
            "http://localhost:7474/db/data/ext/studyJsons/graphdb/putStudyNexsonFile"
        );
        assert_eq!(
            backend.index_remote_studies_url(),
            "http://localhost:7474/db/data/ext/studyJsons/graphdb/indexRemoteStudies"
        );
    }

    #[test]
    fn test_raw_url_ignores_trailing_slash() {
        let remote = RemoteConfig {
            commits_url: String::new(),
            raw_base_url: "https://example.org/raw/".to_string(),
        };
        assert_eq!(remote.raw_url("abc123", "42"), "https://example.org/raw/abc123/42");
        assert_eq!(remote.raw_url("abc123", ""), "https://example.org/raw/abc123/");
    }

    #[test]
    fn test_default_has_no_timeout() {
        let config = Config::default();
        assert!(config.http.timeout.is_none());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
    }
}
