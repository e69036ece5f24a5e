use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Base URL prepended to object paths when building public download links
    pub links_prefix: String,
    pub region: Option<String>,
    pub secure: bool,
}

impl MinioConfig {
    /// Load MinIO configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MINIO_ENDPOINT: MinIO server endpoint (e.g., "localhost:9000")
    /// - MINIO_ACCESS_KEY: Access key for MinIO
    /// - MINIO_SECRET_KEY: Secret key for MinIO
    /// - MINIO_BUCKET_NAME: Default bucket name
    /// - MINIO_LINKS_PREFIX: Public base URL for stored objects
    /// - MINIO_REGION: Optional region (defaults to "us-east-1")
    /// - MINIO_SECURE: Whether to use HTTPS (defaults to false)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MinIO configuration from environment variables");

        let endpoint = env::var("MINIO_ENDPOINT").map_err(|_| {
            error!("MINIO_ENDPOINT environment variable not found");
            ConfigError::MissingEnvVar("MINIO_ENDPOINT".to_string())
        })?;
        debug!("MinIO endpoint: {}", endpoint);

        let access_key = env::var("MINIO_ACCESS_KEY").map_err(|_| {
            error!("MINIO_ACCESS_KEY environment variable not found");
            ConfigError::MissingEnvVar("MINIO_ACCESS_KEY".to_string())
        })?;
        debug!("MinIO access key loaded (length: {} chars)", access_key.len());

        let secret_key = env::var("MINIO_SECRET_KEY").map_err(|_| {
            error!("MINIO_SECRET_KEY environment variable not found");
            ConfigError::MissingEnvVar("MINIO_SECRET_KEY".to_string())
        })?;
        debug!("MinIO secret key loaded (length: {} chars)", secret_key.len());

        let bucket_name = env::var("MINIO_BUCKET_NAME").map_err(|_| {
            error!("MINIO_BUCKET_NAME environment variable not found");
            ConfigError::MissingEnvVar("MINIO_BUCKET_NAME".to_string())
        })?;
        debug!("MinIO bucket name: {}", bucket_name);

        let region = env::var("MINIO_REGION").ok().or_else(|| {
            warn!("MINIO_REGION not set, using default: us-east-1");
            Some("us-east-1".to_string())
        });

        let secure = env::var("MINIO_SECURE")
            .unwrap_or_else(|_| {
                warn!("MINIO_SECURE not set, defaulting to false (HTTP)");
                "false".to_string()
            })
            .parse()
            .unwrap_or_else(|_| {
                warn!("Invalid MINIO_SECURE value, defaulting to false");
                false
            });
        debug!("MinIO secure connection: {}", secure);

        let links_prefix = env::var("MINIO_LINKS_PREFIX").unwrap_or_else(|_| {
            warn!("MINIO_LINKS_PREFIX not set, using default");
            "http://127.0.0.1:9000".to_string()
        });
        debug!("MinIO links prefix: {}", links_prefix);

        let config = Self {
            endpoint,
            access_key,
            secret_key,
            bucket_name,
            links_prefix,
            region,
            secure,
        };

        info!("MinIO configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            error!("MinIO endpoint is empty");
            return Err(ConfigError::InvalidConfig(
                "Endpoint cannot be empty".to_string(),
            ));
        }

        if self.access_key.is_empty() {
            error!("MinIO access key is empty");
            return Err(ConfigError::InvalidConfig(
                "Access key cannot be empty".to_string(),
            ));
        }

        if self.secret_key.is_empty() {
            error!("MinIO secret key is empty");
            return Err(ConfigError::InvalidConfig(
                "Secret key cannot be empty".to_string(),
            ));
        }

        if self.bucket_name.is_empty() {
            error!("MinIO bucket name is empty");
            return Err(ConfigError::InvalidConfig(
                "Bucket name cannot be empty".to_string(),
            ));
        }

        if self.bucket_name.contains(|c: char| c.is_uppercase() || c == '_') {
            return Err(ConfigError::InvalidConfig(
                "Bucket name must be lowercase without underscores".to_string(),
            ));
        }

        Ok(())
    }

    /// Full endpoint URL including scheme
    pub fn get_endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    /// Create MinioConfig for testing
    pub fn from_test_env() -> Self {
        MinioConfig {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "quickchat-test".to_string(),
            links_prefix: "http://localhost:9000".to_string(),
            region: Some("us-east-1".to_string()),
            secure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = MinioConfig::from_test_env();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_fields() {
        let mut config = MinioConfig::from_test_env();
        config.endpoint = "".to_string();
        assert!(config.validate().is_err());

        let mut config = MinioConfig::from_test_env();
        config.bucket_name = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bucket_name_format() {
        let mut config = MinioConfig::from_test_env();
        config.bucket_name = "Bad_Bucket".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url_scheme() {
        let mut config = MinioConfig::from_test_env();
        assert_eq!(config.get_endpoint_url(), "http://localhost:9000");
        config.secure = true;
        assert_eq!(config.get_endpoint_url(), "https://localhost:9000");
    }
}
