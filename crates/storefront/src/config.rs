//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PUBLIC_TOKEN` - Storefront API public access token
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//! - `FEATURED_COLLECTION_HANDLE` - Collection shown in the home page hero
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-10)
//! - `SHOPIFY_STOREFRONT_ENDPOINT` - Full GraphQL endpoint URL (overrides store + version)
//! - `PUBLIC_STORE_DOMAIN` - Customer-facing store domain (default: `SHOPIFY_STORE`)
//! - `SITE_NAME` - Brand name used in page titles (default: Highland HQ)
//! - `RECOMMENDED_COLLECTION_HANDLE` - Target of the "See More" link (default: featured)
//! - `SITE_ANNOUNCEMENT_TEXT` - Announcement bar text
//! - `HEADER_MENU_HANDLE` - Shopify menu for the header (default: main-menu)
//! - `FOOTER_MENU_HANDLE` - Shopify menu for the footer (default: footer)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Brand and merchandising settings
    pub site: SiteConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-10)
    pub api_version: String,
    /// Storefront API public access token (safe to expose in browser)
    pub storefront_public_token: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
    /// Explicit GraphQL endpoint, used instead of `store` + `api_version`
    pub endpoint: Option<String>,
    /// Customer-facing domain; menu links on this domain are made relative
    pub public_store_domain: String,
}

impl ShopifyStorefrontConfig {
    /// The Storefront GraphQL endpoint URL.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}/api/{}/graphql.json",
                self.store, self.api_version
            )
        })
    }
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_public_token", &self.storefront_public_token)
            .field("storefront_private_token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("public_store_domain", &self.public_store_domain)
            .finish()
    }
}

/// Brand and merchandising settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Brand name, used as the page title prefix
    pub name: String,
    /// Collection featured in the home page hero
    pub featured_collection_handle: String,
    /// Collection linked from the recommended products "See More" button
    pub recommended_collection_handle: String,
    /// Optional announcement bar text
    pub announcement: Option<String>,
    /// Shopify menu handle for the header navigation
    pub header_menu_handle: String,
    /// Shopify menu handle for the footer navigation
    pub footer_menu_handle: String,
}

impl SiteConfig {
    /// Build a page title in the form `"<site> | <page>"`.
    #[must_use]
    pub fn page_title(&self, page: &str) -> String {
        if page.is_empty() {
            self.name.clone()
        } else {
            format!("{} | {page}", self.name)
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

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

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let site = SiteConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            shopify,
            site,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store = get_required_env("SHOPIFY_STORE")?;
        let public_store_domain =
            get_optional_env("PUBLIC_STORE_DOMAIN").unwrap_or_else(|| store.clone());

        Ok(Self {
            store,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-10"),
            storefront_public_token: get_required_env("SHOPIFY_STOREFRONT_PUBLIC_TOKEN")?,
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
            endpoint: get_optional_env("SHOPIFY_STOREFRONT_ENDPOINT"),
            public_store_domain,
        })
    }
}

impl SiteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let featured_collection_handle = get_required_env("FEATURED_COLLECTION_HANDLE")?;
        let recommended_collection_handle = get_optional_env("RECOMMENDED_COLLECTION_HANDLE")
            .unwrap_or_else(|| featured_collection_handle.clone());

        Ok(Self {
            name: get_env_or_default("SITE_NAME", "Highland HQ"),
            featured_collection_handle,
            recommended_collection_handle,
            announcement: get_optional_env("SITE_ANNOUNCEMENT_TEXT")
                .filter(|text| !text.trim().is_empty()),
            header_menu_handle: get_env_or_default("HEADER_MENU_HANDLE", "main-menu"),
            footer_menu_handle: get_env_or_default("FOOTER_MENU_HANDLE", "footer"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `[0.0, 1.0]`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    parse_rate(&value).map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))
}

fn parse_rate(value: &str) -> Result<f32, String> {
    let rate = value.trim().parse::<f32>().map_err(|e| e.to_string())?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("must be between 0.0 and 1.0 (got {rate})"))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API tokens are random hex/base64; low entropy means a typed-in value
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token generated by Shopify."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify_config() -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store: "highland-hq.myshopify.com".to_string(),
            api_version: "2024-10".to_string(),
            storefront_public_token: "public_token_value".to_string(),
            storefront_private_token: SecretString::from("super_secret_private_token"),
            endpoint: None,
            public_store_domain: "highlandhq.com".to_string(),
        }
    }

    fn site_config() -> SiteConfig {
        SiteConfig {
            name: "Highland HQ".to_string(),
            featured_collection_handle: "august-collection".to_string(),
            recommended_collection_handle: "august-collection".to_string(),
            announcement: None,
            header_menu_handle: "main-menu".to_string(),
            footer_menu_handle: "footer".to_string(),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("shpat_9f3Kq2LmZx81Vb7Rt0Yw", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_rate() {
        assert!((parse_rate("0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_rate("1.5").is_err());
        assert!(parse_rate("often").is_err());
    }

    #[test]
    fn test_graphql_endpoint() {
        let mut config = shopify_config();
        assert_eq!(
            config.graphql_endpoint(),
            "https://highland-hq.myshopify.com/api/2024-10/graphql.json"
        );

        config.endpoint = Some("http://127.0.0.1:4000/graphql.json".to_string());
        assert_eq!(config.graphql_endpoint(), "http://127.0.0.1:4000/graphql.json");
    }

    #[test]
    fn test_page_title() {
        let site = site_config();
        assert_eq!(site.page_title("Home"), "Highland HQ | Home");
        assert_eq!(site.page_title(""), "Highland HQ");
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            shopify: shopify_config(),
            site: site_config(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_shopify_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify_config());

        assert!(debug_output.contains("highland-hq.myshopify.com"));
        assert!(debug_output.contains("public_token_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_token"));
    }
}
