//! Configuration management for hubctl.
//!
//! Configuration is loaded from a YAML file merged with `HUBCTL_`-prefixed
//! environment variables (nested fields use `__`, e.g.
//! `HUBCTL_MEDIA__CLOUDINARY__API_KEY`). Every field has a default so the
//! service starts with an empty config file; `Config::load` validates the
//! result before the application boots.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use hubctl::config::{Args, Config};
//!
//! let args = Args::parse();
//! let config = Config::load(&args).expect("invalid configuration");
//! println!("binding to {}", config.bind_address());
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "HUBCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment
/// variables. All fields have sensible defaults defined in the `Default`
/// implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Convenience override: the common DATABASE_URL environment variable.
    /// Takes precedence over `database.url` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// CORS settings for the admin frontend
    pub cors: CorsConfig,
    /// Upload constraints enforced before the media bridge is invoked
    pub uploads: UploadsConfig,
    /// Media host configuration (Cloudinary, or the dummy store)
    pub media: MediaConfig,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            uploads: UploadsConfig::default(),
            media: MediaConfig::default(),
            enable_otel_export: false,
        }
    }
}

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL for the hubctl database
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Seconds to wait for a connection from the pool before giving up
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/hubctl".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

/// CORS configuration for the admin frontend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins allowed to call the management API
    pub allowed_origins: Vec<CorsOrigin>,
    /// Whether to allow credentials (cookies) in cross-origin requests
    pub allow_credentials: bool,
    /// Max age for preflight caching, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: None,
        }
    }
}

/// A single allowed CORS origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://admin.example.com`)
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

/// Upload constraints applied at the API boundary.
///
/// The media bridge itself trusts its caller; these limits are checked in the
/// upload handlers before a payload reaches it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsConfig {
    /// Maximum accepted payload size in bytes (default 2 MiB)
    pub max_file_size: u64,
    /// Content types accepted for upload
    pub allowed_content_types: Vec<String>,
    /// Destination category used for sponsor logos bridged during sponsor
    /// creation
    pub sponsor_logo_category: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_file_size: 2 * 1024 * 1024,
            allowed_content_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
                "image/svg+xml".to_string(),
            ],
            sponsor_logo_category: "sponsor-logos".to_string(),
        }
    }
}

/// Media host configuration.
///
/// Supports different hosts via an enum. Credentials should be set via
/// environment variables:
/// - `HUBCTL_MEDIA__CLOUDINARY__CLOUD_NAME`
/// - `HUBCTL_MEDIA__CLOUDINARY__API_KEY`
/// - `HUBCTL_MEDIA__CLOUDINARY__API_SECRET`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaConfig {
    /// Cloudinary-hosted media storage
    Cloudinary(CloudinaryConfig),
    /// Dummy media store for development and tests
    Dummy(DummyMediaConfig),
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig::Dummy(DummyMediaConfig::default())
    }
}

/// Cloudinary credentials and endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CloudinaryConfig {
    /// Account cloud name (first path segment of the upload endpoint)
    pub cloud_name: String,
    /// API key sent with every upload
    pub api_key: String,
    /// API secret used to sign upload parameters; never sent on the wire
    pub api_secret: String,
    /// Upload API base URL; override for testing against a simulated host
    #[serde(default = "default_cloudinary_api_base")]
    pub api_base: Url,
}

fn default_cloudinary_api_base() -> Url {
    Url::parse("https://api.cloudinary.com").expect("static URL is valid")
}

/// Dummy media store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DummyMediaConfig {
    /// Base URL under which fake references are fabricated
    pub base_url: Url,
    /// When true, every upload fails with a simulated host rejection
    pub fail_uploads: bool,
}

impl Default for DummyMediaConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://media.invalid/").expect("static URL is valid"),
            fail_uploads: false,
        }
    }
}

/// Check that a destination category is a usable slug: non-empty, at most 64
/// characters, lowercase alphanumerics and dashes only.
pub fn validate_category(category: &str) -> Result<(), Error> {
    if category.is_empty() {
        return Err(Error::BadRequest {
            message: "category must not be empty".to_string(),
        });
    }
    if category.len() > 64 {
        return Err(Error::BadRequest {
            message: "category must be at most 64 characters".to_string(),
        });
    }
    if !category.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(Error::BadRequest {
            message: format!("category '{category}' may only contain lowercase letters, digits, and dashes"),
        });
    }
    Ok(())
}

impl Config {
    /// Load and validate configuration from the file and environment.
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL convenience override
        if let Some(database_url) = config.database_url.take() {
            config.database.url = database_url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("HUBCTL_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    fn validate(&self) -> Result<(), Error> {
        if self.port == 0 {
            return Err(Error::BadRequest {
                message: "Config validation: port must be non-zero".to_string(),
            });
        }
        if self.database.url.is_empty() {
            return Err(Error::BadRequest {
                message: "Config validation: database.url must not be empty".to_string(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(Error::BadRequest {
                message: "Config validation: database.max_connections must be non-zero".to_string(),
            });
        }
        if self.uploads.max_file_size == 0 {
            return Err(Error::BadRequest {
                message: "Config validation: uploads.max_file_size must be non-zero".to_string(),
            });
        }
        if self.uploads.allowed_content_types.is_empty() {
            return Err(Error::BadRequest {
                message: "Config validation: uploads.allowed_content_types must not be empty".to_string(),
            });
        }
        validate_category(&self.uploads.sponsor_logo_category).map_err(|e| Error::BadRequest {
            message: format!("Config validation: uploads.sponsor_logo_category: {e}"),
        })?;

        if let MediaConfig::Cloudinary(cloudinary) = &self.media {
            if cloudinary.cloud_name.is_empty() || cloudinary.api_key.is_empty() || cloudinary.api_secret.is_empty() {
                return Err(Error::BadRequest {
                    message: "Config validation: cloudinary cloud_name, api_key, and api_secret are required".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_from_minimal_config() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "host: 0.0.0.0\n")?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 8080);
            assert_eq!(config.uploads.max_file_size, 2 * 1024 * 1024);
            assert!(matches!(config.media, MediaConfig::Dummy(_)));
            assert!(!config.enable_otel_export);

            Ok(())
        });
    }

    #[test]
    fn test_cloudinary_config_with_env_credentials() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
media:
  cloudinary:
    cloud_name: community-hub
    api_key: from-file
    api_secret: placeholder
"#,
            )?;

            jail.set_env("HUBCTL_MEDIA__CLOUDINARY__API_SECRET", "from-env");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            match config.media {
                MediaConfig::Cloudinary(cloudinary) => {
                    assert_eq!(cloudinary.cloud_name, "community-hub");
                    assert_eq!(cloudinary.api_key, "from-file");
                    assert_eq!(cloudinary.api_secret, "from-env");
                    assert_eq!(cloudinary.api_base.as_str(), "https://api.cloudinary.com/");
                }
                other => panic!("expected cloudinary config, got {other:?}"),
            }

            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
host: 0.0.0.0
port: 3000
"#,
            )?;

            jail.set_env("HUBCTL_HOST", "127.0.0.1");
            jail.set_env("HUBCTL_PORT", "8081");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8081);
            assert_eq!(config.bind_address(), "127.0.0.1:8081");

            Ok(())
        });
    }

    #[test]
    fn test_database_url_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
database:
  url: postgres://file-host/hubctl
"#,
            )?;

            jail.set_env("DATABASE_URL", "postgres://env-host/hubctl");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            let config = Config::load(&args)?;

            assert_eq!(config.database.url, "postgres://env-host/hubctl");

            Ok(())
        });
    }

    #[test]
    fn test_zero_max_file_size_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
uploads:
  max_file_size: 0
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            assert!(Config::load(&args).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_cloudinary_without_credentials_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
media:
  cloudinary:
    cloud_name: community-hub
    api_key: ""
    api_secret: ""
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            assert!(Config::load(&args).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
hosst: 0.0.0.0
"#,
            )?;

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };

            assert!(Config::load(&args).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_category_slug_validation() {
        assert!(validate_category("project-logos").is_ok());
        assert!(validate_category("a1-b2").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category("Has-Capitals").is_err());
        assert!(validate_category("has spaces").is_err());
        assert!(validate_category(&"x".repeat(65)).is_err());
    }
}
