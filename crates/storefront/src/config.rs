//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL of the storefront (payment back-urls)
//! - `CARRIER_API_URL` - Carrier rate-quote endpoint for correo shipping
//! - `PAYMENT_API_URL` - Payment gateway base URL
//! - `PAYMENT_ACCESS_TOKEN` - Payment gateway access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CARRIER_API_KEY` - Bearer token for the carrier API
//! - `PAYMENT_WEBHOOK_SECRET` - HMAC secret for callback signature checks
//! - `ORDER_WEBHOOK_URL` - Workflow webhook notified of new orders
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` /
//!   `SMTP_FROM` - Order confirmation email (all five together)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` / `SENTRY_SAMPLE_RATE` /
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "xxx", "todo", "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the storefront
    pub base_url: String,
    /// Carrier rate API configuration
    pub carrier: CarrierConfig,
    /// Payment gateway configuration
    pub payments: PaymentConfig,
    /// Workflow webhook notified of new orders (optional)
    pub order_webhook_url: Option<String>,
    /// Order confirmation email configuration (optional)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Carrier rate API configuration.
#[derive(Clone)]
pub struct CarrierConfig {
    /// Rate-quote endpoint URL.
    pub api_url: String,
    /// Optional bearer token.
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for CarrierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Payment gateway configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Gateway base URL.
    pub api_url: String,
    /// Gateway access token.
    pub access_token: SecretString,
    /// HMAC secret for verifying callback signatures (optional).
    pub webhook_secret: Option<SecretString>,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if a secret looks like a placeholder value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let carrier = CarrierConfig::from_env()?;
        let payments = PaymentConfig::from_env()?;
        let order_webhook_url = get_optional_env("ORDER_WEBHOOK_URL");
        let email = EmailConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            carrier,
            payments,
            order_webhook_url,
            email,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CarrierConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_required_env("CARRIER_API_URL")?,
            api_key: get_optional_env("CARRIER_API_KEY").map(SecretString::from),
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: get_env_or_default("PAYMENT_API_URL", "https://api.mercadopago.com"),
            access_token: get_validated_secret("PAYMENT_ACCESS_TOKEN")?,
            webhook_secret: get_optional_env("PAYMENT_WEBHOOK_SECRET").map(SecretString::from),
        })
    }
}

impl EmailConfig {
    /// Load SMTP configuration from environment.
    ///
    /// Returns `None` when no SMTP variable is set (confirmation emails
    /// disabled); errors when the set is incomplete.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = get_optional_env("SMTP_HOST");
        let username = get_optional_env("SMTP_USERNAME");
        let password = get_optional_env("SMTP_PASSWORD");
        let from = get_optional_env("SMTP_FROM");

        match (host, username, password, from) {
            (Some(smtp_host), Some(smtp_username), Some(password), Some(from_address)) => {
                let smtp_port = get_env_or_default("SMTP_PORT", "587")
                    .parse::<u16>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string())
                    })?;
                Ok(Some(Self {
                    smtp_host,
                    smtp_port,
                    smtp_username,
                    smtp_password: SecretString::from(password),
                    from_address,
                }))
            }
            (None, None, None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "SMTP_*".to_string(),
                "SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and SMTP_FROM must be set together"
                    .to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject secrets that look like unedited placeholders.
fn validate_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_rejects_placeholder() {
        let result = validate_secret("your-access-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_accepts_real_looking_token() {
        assert!(validate_secret("APP_USR-3821704-092313-af8a", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_payment_config_debug_redacts_secrets() {
        let config = PaymentConfig {
            api_url: "https://api.mercadopago.com".to_string(),
            access_token: SecretString::from("super-secret-token"),
            webhook_secret: Some(SecretString::from("another-secret")),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("api.mercadopago.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
        assert!(!debug_output.contains("another-secret"));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "pedidos@crafteo.com.ar".to_string(),
            smtp_password: SecretString::from("smtp-password"),
            from_address: "pedidos@crafteo.com.ar".to_string(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("smtp-password"));
    }
}
